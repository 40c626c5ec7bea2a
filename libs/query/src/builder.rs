//! Search filter construction from optional request fields.
//!
//! A [`SearchSpec`] declares which fields of a collection are searchable, how
//! each one matches, and how the supplied predicates combine. Request input is
//! a set of `(name, value)` pairs; only declared fields with a non-empty value
//! become predicates.

use std::collections::BTreeMap;

use crate::{filter::validate_field_path, Filter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-insensitive substring match.
    Contains,
    /// Exact string equality.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every supplied predicate must hold.
    And,
    /// At least one supplied predicate must hold.
    Or,
}

/// What a search with no supplied fields returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptySearch {
    MatchAll,
    MatchNone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    fields: Vec<FieldRule>,
    combinator: Combinator,
    on_empty: EmptySearch,
}

impl SearchSpec {
    /// Creates a spec with no fields.
    ///
    /// The empty-search behaviour follows the combinator: an empty conjunction
    /// matches everything, an empty disjunction matches nothing. Override it
    /// with [`SearchSpec::on_empty`].
    pub fn new(combinator: Combinator) -> Self {
        let on_empty = match combinator {
            Combinator::And => EmptySearch::MatchAll,
            Combinator::Or => EmptySearch::MatchNone,
        };
        Self {
            fields: Vec::new(),
            combinator,
            on_empty,
        }
    }

    pub fn field(mut self, name: impl Into<String>, kind: MatchKind) -> Result<Self> {
        let name = name.into();
        validate_field_path(&name)?;
        if let Some(rule) = self.fields.iter_mut().find(|r| r.name == name) {
            rule.kind = kind;
        } else {
            self.fields.push(FieldRule { name, kind });
        }
        Ok(self)
    }

    pub fn contains(self, name: impl Into<String>) -> Result<Self> {
        self.field(name, MatchKind::Contains)
    }

    pub fn exact(self, name: impl Into<String>) -> Result<Self> {
        self.field(name, MatchKind::Exact)
    }

    pub fn on_empty(mut self, on_empty: EmptySearch) -> Self {
        self.on_empty = on_empty;
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn empty_search(&self) -> EmptySearch {
        self.on_empty
    }

    /// Keeps the declared fields that are present with a non-empty value.
    ///
    /// When a name is supplied more than once the last value wins. Undeclared
    /// names are dropped.
    pub fn supplied<'a>(
        &self,
        input: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<(&FieldRule, &'a str)> {
        let values: BTreeMap<&str, &str> = input.into_iter().collect();
        self.fields
            .iter()
            .filter_map(|rule| match values.get(rule.name.as_str()) {
                Some(value) if !value.is_empty() => Some((rule, *value)),
                _ => None,
            })
            .collect()
    }

    /// Builds the filter for `input`.
    pub fn build<'a>(&self, input: impl IntoIterator<Item = (&'a str, &'a str)>) -> Filter {
        let predicates: Vec<Filter> = self
            .supplied(input)
            .into_iter()
            .map(|(rule, value)| match rule.kind {
                MatchKind::Contains => Filter::contains(rule.name.clone(), value),
                MatchKind::Exact => Filter::eq(rule.name.clone(), value),
            })
            .collect();

        if predicates.is_empty() {
            return match self.on_empty {
                EmptySearch::MatchAll => Filter::All,
                EmptySearch::MatchNone => Filter::Nothing,
            };
        }

        match self.combinator {
            Combinator::And => Filter::and(predicates),
            Combinator::Or => Filter::or(predicates),
        }
    }
}
