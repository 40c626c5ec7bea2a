//! Filter expressions over document fields.
//!
//! A [`Filter`] is built by the resolver and the search builder, rewritten by
//! the shape adapter, and finally compiled to a MongoDB filter document with
//! [`Filter::to_document`].

use bson::{doc, Bson, Document};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document (compiles to `{}`).
    All,
    /// Matches no document (compiles to `{"$expr": false}`).
    Nothing,
    Field(Predicate),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub path: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive literal substring match anywhere in a string value.
    Contains(String),
    /// Exact BSON equality. `ObjectId("…")` and the string `"…"` are distinct.
    Equals(Bson),
    /// The value is an embedded document.
    IsDocument,
}

/// Checks that `path` is a usable dotted field path.
///
/// Paths come from static search specs and configuration, never from request
/// keys, but a malformed path would silently turn into an operator or an
/// unreachable field, so it is rejected up front.
pub fn validate_field_path(path: &str) -> Result<()> {
    let invalid = |reason| {
        Err(Error::InvalidFieldPath {
            path: path.to_string(),
            reason,
        })
    };

    if path.is_empty() {
        return invalid("path is empty");
    }
    if path.starts_with('$') {
        return invalid("path must not start with '$'");
    }
    if path.split('.').any(str::is_empty) {
        return invalid("path contains an empty segment");
    }
    if path.contains('\0') {
        return invalid("path contains a NUL byte");
    }
    Ok(())
}

impl Filter {
    pub fn contains(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Field(Predicate {
            path: path.into(),
            condition: Condition::Contains(text.into()),
        })
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Field(Predicate {
            path: path.into(),
            condition: Condition::Equals(value.into()),
        })
    }

    pub fn is_document(path: impl Into<String>) -> Self {
        Self::Field(Predicate {
            path: path.into(),
            condition: Condition::IsDocument,
        })
    }

    /// Conjunction of `filters`.
    ///
    /// `All` members are dropped and any `Nothing` member collapses the whole
    /// conjunction. An empty conjunction is `All`; a single member is returned
    /// unwrapped.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        let mut parts = Vec::new();
        for filter in filters {
            match filter {
                Self::All => {}
                Self::Nothing => return Self::Nothing,
                Self::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Self::All,
            1 => parts.remove(0),
            _ => Self::And(parts),
        }
    }

    /// Disjunction of `filters`.
    ///
    /// `Nothing` members are dropped and any `All` member collapses the whole
    /// disjunction. An empty disjunction is `Nothing`; a single member is
    /// returned unwrapped.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        let mut parts = Vec::new();
        for filter in filters {
            match filter {
                Self::Nothing => {}
                Self::All => return Self::All,
                Self::Or(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Self::Nothing,
            1 => parts.remove(0),
            _ => Self::Or(parts),
        }
    }

    /// Rewrites every field path to live under `prefix`.
    ///
    /// Used to address the elements of an array field (`subject` becomes
    /// `data.subject`) and to bind array-filter identifiers (`rec._id`).
    pub fn prefixed(&self, prefix: &str) -> Self {
        match self {
            Self::All => Self::All,
            Self::Nothing => Self::Nothing,
            Self::Field(p) => Self::Field(Predicate {
                path: format!("{prefix}.{}", p.path),
                condition: p.condition.clone(),
            }),
            Self::And(parts) => Self::And(parts.iter().map(|f| f.prefixed(prefix)).collect()),
            Self::Or(parts) => Self::Or(parts.iter().map(|f| f.prefixed(prefix)).collect()),
        }
    }

    /// Field paths referenced by this filter, in order of appearance.
    pub fn paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::All | Self::Nothing => {}
            Self::Field(p) => out.push(&p.path),
            Self::And(parts) | Self::Or(parts) => {
                for part in parts {
                    part.collect_paths(out);
                }
            }
        }
    }

    /// Compiles into a MongoDB filter document.
    pub fn to_document(&self) -> Document {
        match self {
            Self::All => Document::new(),
            Self::Nothing => doc! { "$expr": false },
            Self::Field(p) => p.to_document(),
            Self::And(parts) => doc! {
                "$and": parts.iter().map(|f| Bson::Document(f.to_document())).collect::<Vec<_>>()
            },
            Self::Or(parts) => doc! {
                "$or": parts.iter().map(|f| Bson::Document(f.to_document())).collect::<Vec<_>>()
            },
        }
    }
}

impl Predicate {
    fn to_document(&self) -> Document {
        let operator = match &self.condition {
            // User text is escaped so that it is matched literally; the
            // driver receives a plain case-insensitive pattern.
            Condition::Contains(text) => doc! {
                "$regex": regex::escape(text),
                "$options": "i",
            },
            Condition::Equals(value) => doc! { "$eq": value.clone() },
            Condition::IsDocument => doc! { "$type": "object" },
        };
        let mut out = Document::new();
        out.insert(self.path.clone(), operator);
        out
    }
}
