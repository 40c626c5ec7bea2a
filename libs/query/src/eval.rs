//! In-memory evaluation of filters and plans.
//!
//! Mirrors the MongoDB semantics the compiled documents rely on: dotted paths
//! traverse embedded documents, a path that reaches an array matches when any
//! element matches, string matching is a case-insensitive literal substring,
//! and equality is exact BSON equality. Used by the in-memory store and by
//! tests that check shape equivalence without a server.

use bson::{oid::ObjectId, Bson, Document};

use crate::{
    filter::{Condition, Predicate},
    DeletePlan, Filter, InsertPlan, ReadPlan, Stage, UpdatePlan, ID_FIELD,
};

/// Result of applying an update plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

impl Filter {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Nothing => false,
            Self::Field(p) => p.matches(doc),
            Self::And(parts) => parts.iter().all(|f| f.matches(doc)),
            Self::Or(parts) => parts.iter().any(|f| f.matches(doc)),
        }
    }
}

impl Predicate {
    fn matches(&self, doc: &Document) -> bool {
        let segments: Vec<&str> = self.path.split('.').collect();
        let mut candidates = Vec::new();
        lookup(doc, &segments, &mut candidates);
        candidates
            .into_iter()
            .any(|value| condition_holds(&self.condition, value))
    }
}

fn lookup<'a>(doc: &'a Document, segments: &[&str], out: &mut Vec<&'a Bson>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if let Some(value) = doc.get(*head) {
        descend(value, rest, out);
    }
}

fn descend<'a>(value: &'a Bson, rest: &[&str], out: &mut Vec<&'a Bson>) {
    if rest.is_empty() {
        out.push(value);
        return;
    }
    match value {
        Bson::Document(inner) => lookup(inner, rest, out),
        Bson::Array(items) => {
            for item in items {
                if let Bson::Document(inner) = item {
                    lookup(inner, rest, out);
                }
            }
        }
        _ => {}
    }
}

fn condition_holds(condition: &Condition, value: &Bson) -> bool {
    match (condition, value) {
        (Condition::Contains(needle), Bson::String(haystack)) => {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        (Condition::Contains(_), Bson::Array(items)) => {
            items.iter().any(|item| condition_holds(condition, item))
        }
        (Condition::Contains(_), _) => false,
        (Condition::Equals(expected), Bson::Array(items)) => {
            value == expected || items.iter().any(|item| item == expected)
        }
        (Condition::Equals(expected), _) => value == expected,
        (Condition::IsDocument, Bson::Document(_)) => true,
        (Condition::IsDocument, _) => false,
    }
}

impl Stage {
    fn apply(&self, rows: Vec<Document>) -> Vec<Document> {
        match self {
            Self::Unwind(field) => rows
                .into_iter()
                .flat_map(|row| unwind(row, field))
                .collect(),
            Self::Match(filter) => rows.into_iter().filter(|row| filter.matches(row)).collect(),
            Self::ReplaceRoot(field) => rows
                .into_iter()
                .filter_map(|row| match row.get(field) {
                    Some(Bson::Document(inner)) => Some(inner.clone()),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// One row per array element; rows whose field is missing, null or an empty
/// array are dropped, and a non-array value passes through unchanged.
fn unwind(row: Document, field: &str) -> Vec<Document> {
    match row.get(field).cloned() {
        Some(Bson::Array(items)) => items
            .into_iter()
            .map(|item| {
                let mut out = row.clone();
                out.insert(field, item);
                out
            })
            .collect(),
        Some(Bson::Null) | None => Vec::new(),
        Some(_) => vec![row],
    }
}

impl ReadPlan {
    /// Runs the plan over `docs`, preserving input order.
    pub fn execute(&self, docs: &[Document]) -> Vec<Document> {
        match self {
            Self::Find(filter) => docs.iter().filter(|d| filter.matches(d)).cloned().collect(),
            Self::Aggregate(stages) => stages
                .iter()
                .fold(docs.to_vec(), |rows, stage| stage.apply(rows)),
        }
    }
}

impl InsertPlan {
    /// Stores the record into `docs` and returns its identifier.
    pub fn apply(&self, docs: &mut Vec<Document>) -> Bson {
        match self {
            Self::Insert(record) => {
                let mut record = record.clone();
                let id = ensure_id(&mut record);
                docs.push(record);
                id
            }
            Self::Push { field, record } => {
                let mut record = record.clone();
                let id = ensure_id(&mut record);
                match docs.first_mut() {
                    Some(wrapper) => match wrapper.get_mut(field) {
                        Some(Bson::Array(items)) => items.push(Bson::Document(record)),
                        _ => {
                            wrapper.insert(field.clone(), vec![Bson::Document(record)]);
                        }
                    },
                    None => {
                        let mut wrapper = Document::new();
                        wrapper.insert(ID_FIELD, ObjectId::new());
                        wrapper.insert(field.clone(), vec![Bson::Document(record)]);
                        docs.push(wrapper);
                    }
                }
                id
            }
        }
    }
}

fn ensure_id(record: &mut Document) -> Bson {
    if let Some(id) = record.get(ID_FIELD) {
        return id.clone();
    }
    let id = Bson::ObjectId(ObjectId::new());
    record.insert(ID_FIELD, id.clone());
    id
}

impl UpdatePlan {
    /// Applies the update to the first matching document of `docs`.
    pub fn apply(&self, docs: &mut [Document]) -> UpdateCounts {
        match self {
            Self::Set { filter, changes } => {
                let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) else {
                    return UpdateCounts::default();
                };
                UpdateCounts {
                    matched: 1,
                    modified: u64::from(set_fields(doc, changes)),
                }
            }
            Self::SetElement {
                field,
                filter,
                changes,
            } => {
                let wrapper_filter = filter.prefixed(field);
                let Some(wrapper) = docs.iter_mut().find(|d| wrapper_filter.matches(d)) else {
                    return UpdateCounts::default();
                };
                let mut modified = false;
                if let Some(Bson::Array(items)) = wrapper.get_mut(field) {
                    for item in items.iter_mut() {
                        if let Bson::Document(element) = item {
                            if filter.matches(element) {
                                modified |= set_fields(element, changes);
                            }
                        }
                    }
                }
                UpdateCounts {
                    matched: 1,
                    modified: u64::from(modified),
                }
            }
        }
    }
}

fn set_fields(doc: &mut Document, changes: &Document) -> bool {
    let mut changed = false;
    for (key, value) in changes {
        if doc.get(key) != Some(value) {
            doc.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

impl DeletePlan {
    /// Removes the matching record from `docs`; returns how many documents
    /// were deleted or, for nested collections, modified.
    pub fn apply(&self, docs: &mut Vec<Document>) -> u64 {
        match self {
            Self::Delete(filter) => match docs.iter().position(|d| filter.matches(d)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            Self::Pull { field, filter } => {
                let wrapper_filter = filter.prefixed(field);
                let Some(wrapper) = docs.iter_mut().find(|d| wrapper_filter.matches(d)) else {
                    return 0;
                };
                let Some(Bson::Array(items)) = wrapper.get_mut(field) else {
                    return 0;
                };
                let before = items.len();
                items.retain(|item| match item {
                    Bson::Document(element) => !filter.matches(element),
                    _ => true,
                });
                u64::from(items.len() != before)
            }
        }
    }
}
