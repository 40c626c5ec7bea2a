//! Storage-shape adaptation.
//!
//! A collection either stores one logical record per document ([`Shape::Flat`])
//! or wraps many records in an array field of a few documents
//! ([`Shape::NestedArray`]). The shape is declared per collection; callers hand
//! the adapter a filter written against record fields and get back a plan that
//! produces the same records whatever the physical layout.

use bson::{doc, oid::ObjectId, Bson, Document};

use crate::{filter::validate_field_path, Error, Filter, Result, ID_FIELD};

/// Identifier bound to array elements in nested updates (`data.$[rec]`).
const ELEMENT_BINDING: &str = "rec";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Shape {
    #[default]
    Flat,
    NestedArray { field: String },
}

impl Shape {
    pub fn nested(field: impl Into<String>) -> Result<Self> {
        let field = field.into();
        validate_field_path(&field)?;
        if field.contains('.') {
            return Err(Error::InvalidFieldPath {
                path: field,
                reason: "array field must be a top-level field",
            });
        }
        Ok(Self::NestedArray { field })
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Self::NestedArray { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Unwind(String),
    Match(Filter),
    ReplaceRoot(String),
}

impl Stage {
    pub fn to_document(&self) -> Document {
        match self {
            Self::Unwind(field) => doc! { "$unwind": format!("${field}") },
            Self::Match(filter) => doc! { "$match": filter.to_document() },
            Self::ReplaceRoot(field) => doc! { "$replaceRoot": { "newRoot": format!("${field}") } },
        }
    }
}

/// How to read matching records.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadPlan {
    /// `find` with the filter as-is.
    Find(Filter),
    /// `aggregate` with the given stages.
    Aggregate(Vec<Stage>),
}

impl ReadPlan {
    pub fn pipeline(&self) -> Vec<Document> {
        match self {
            Self::Find(filter) => vec![doc! { "$match": filter.to_document() }],
            Self::Aggregate(stages) => stages.iter().map(Stage::to_document).collect(),
        }
    }
}

/// How to store a new record.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertPlan {
    /// `insertOne` of the record.
    Insert(Document),
    /// `$push` of the record onto the array field of a wrapper document,
    /// creating the wrapper when the collection is empty.
    Push { field: String, record: Document },
}

impl InsertPlan {
    /// Identifier of the record, when already known before insertion.
    pub fn record_id(&self) -> Option<&Bson> {
        match self {
            Self::Insert(doc) => doc.get(ID_FIELD),
            Self::Push { record, .. } => record.get(ID_FIELD),
        }
    }

    /// Query selecting the wrapper document for a `Push`.
    pub fn query(&self) -> Document {
        Document::new()
    }

    /// Update document for a `Push`.
    pub fn update(&self) -> Option<Document> {
        match self {
            Self::Insert(_) => None,
            Self::Push { field, record } => {
                let mut push = Document::new();
                push.insert(field.clone(), record.clone());
                Some(doc! { "$push": push })
            }
        }
    }
}

/// How to change fields of the record matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePlan {
    /// `updateOne(filter, {$set: changes})`.
    Set { filter: Filter, changes: Document },
    /// `updateOne` on the wrapper holding a matching element, setting
    /// `field.$[rec].<key>` for every element matched by the array filter.
    SetElement {
        field: String,
        filter: Filter,
        changes: Document,
    },
}

impl UpdatePlan {
    pub fn query(&self) -> Document {
        match self {
            Self::Set { filter, .. } => filter.to_document(),
            Self::SetElement { field, filter, .. } => filter.prefixed(field).to_document(),
        }
    }

    pub fn update(&self) -> Document {
        match self {
            Self::Set { changes, .. } => doc! { "$set": changes.clone() },
            Self::SetElement { field, changes, .. } => {
                let mut set = Document::new();
                for (key, value) in changes {
                    set.insert(format!("{field}.$[{ELEMENT_BINDING}].{key}"), value.clone());
                }
                doc! { "$set": set }
            }
        }
    }

    pub fn array_filters(&self) -> Option<Vec<Document>> {
        match self {
            Self::Set { .. } => None,
            Self::SetElement { filter, .. } => {
                Some(vec![filter.prefixed(ELEMENT_BINDING).to_document()])
            }
        }
    }

    pub fn changes(&self) -> &Document {
        match self {
            Self::Set { changes, .. } | Self::SetElement { changes, .. } => changes,
        }
    }
}

/// How to remove the record matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletePlan {
    /// `deleteOne(filter)`.
    Delete(Filter),
    /// `updateOne` pulling matching elements out of the wrapper's array.
    Pull { field: String, filter: Filter },
}

impl DeletePlan {
    pub fn query(&self) -> Document {
        match self {
            Self::Delete(filter) => filter.to_document(),
            Self::Pull { field, filter } => filter.prefixed(field).to_document(),
        }
    }

    pub fn update(&self) -> Option<Document> {
        match self {
            Self::Delete(_) => None,
            Self::Pull { field, filter } => {
                let mut pull = Document::new();
                pull.insert(field.clone(), filter.to_document());
                Some(doc! { "$pull": pull })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeAdapter {
    shape: Shape,
}

impl ShapeAdapter {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Plans a read of the records matching `filter`.
    ///
    /// Nested collections are unwound to one row per array element, rows whose
    /// element is not a document are dropped, the filter is applied to the
    /// element fields, and the element itself becomes the output record.
    pub fn read(&self, filter: Filter) -> ReadPlan {
        match &self.shape {
            Shape::Flat => ReadPlan::Find(filter),
            Shape::NestedArray { field } => ReadPlan::Aggregate(vec![
                Stage::Unwind(field.clone()),
                Stage::Match(Filter::and([
                    Filter::is_document(field.clone()),
                    filter.prefixed(field),
                ])),
                Stage::ReplaceRoot(field.clone()),
            ]),
        }
    }

    /// Plans the insertion of `record`.
    ///
    /// Records pushed into a nested collection get an ObjectId `_id` when they
    /// carry none, so they stay addressable by the identifier resolver.
    pub fn insert(&self, mut record: Document) -> InsertPlan {
        match &self.shape {
            Shape::Flat => InsertPlan::Insert(record),
            Shape::NestedArray { field } => {
                if !record.contains_key(ID_FIELD) {
                    record.insert(ID_FIELD, ObjectId::new());
                }
                InsertPlan::Push {
                    field: field.clone(),
                    record,
                }
            }
        }
    }

    /// Plans setting `changes` on the record matching `filter`.
    ///
    /// `_id` is never rewritten and is dropped from `changes`. Keys must be
    /// plain field names: operators and dotted paths are rejected.
    pub fn update(&self, filter: Filter, changes: Document) -> Result<UpdatePlan> {
        let changes = sanitize_changes(changes)?;
        Ok(match &self.shape {
            Shape::Flat => UpdatePlan::Set { filter, changes },
            Shape::NestedArray { field } => UpdatePlan::SetElement {
                field: field.clone(),
                filter,
                changes,
            },
        })
    }

    /// Plans the removal of the record matching `filter`.
    pub fn delete(&self, filter: Filter) -> DeletePlan {
        match &self.shape {
            Shape::Flat => DeletePlan::Delete(filter),
            Shape::NestedArray { field } => DeletePlan::Pull {
                field: field.clone(),
                filter,
            },
        }
    }
}

fn sanitize_changes(changes: Document) -> Result<Document> {
    let mut out = Document::new();
    for (key, value) in changes {
        if key == ID_FIELD {
            continue;
        }
        let reason = if key.is_empty() {
            Some("field name is empty")
        } else if key.starts_with('$') {
            Some("field name must not start with '$'")
        } else if key.contains('.') {
            Some("field name must not contain '.'")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(Error::InvalidChange { field: key, reason });
        }
        out.insert(key, value);
    }
    if out.is_empty() {
        return Err(Error::EmptyChangeSet);
    }
    Ok(out)
}
