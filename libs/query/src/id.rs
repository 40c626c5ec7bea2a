//! Identifier resolution for `/:id` path parameters.
//!
//! Collections were seeded both by the driver (native ObjectIds) and by
//! imports that stored string identifiers verbatim, so a path identifier may
//! refer to either. Resolution never fails: an identifier that matches
//! nothing simply yields no document.

use bson::oid::ObjectId;

use crate::Filter;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Whether `raw` is a native identifier: exactly 24 hexadecimal characters.
pub fn is_native_id(raw: &str) -> bool {
    raw.len() == 24 && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Resolves `raw` against the `_id` field.
pub fn resolve(raw: &str) -> Filter {
    resolve_on(ID_FIELD, raw)
}

/// Resolves `raw` against `field`.
///
/// A native-looking identifier produces a disjunction of the ObjectId and the
/// verbatim string; anything else produces string equality only.
pub fn resolve_on(field: &str, raw: &str) -> Filter {
    let verbatim = Filter::eq(field, raw);
    if !is_native_id(raw) {
        return verbatim;
    }
    match ObjectId::parse_str(raw) {
        Ok(oid) => Filter::or([Filter::eq(field, oid), verbatim]),
        Err(_) => verbatim,
    }
}
