//! Households: unions of exactly two parents, optionally with children.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::person::PersonKey;

/// Sequential id of a committed household.
///
/// Assigned at commit time as the number of households committed before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(usize);

impl HouseholdId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the household in commit order.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// A household under construction, before it is committed to a family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseholdDraft {
    /// Parents collected so far; committing requires exactly two.
    pub parents: Vec<PersonKey>,
    /// Children in input order.
    pub children: Vec<PersonKey>,
}

impl HouseholdDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft with the given parent pair and no children.
    pub fn couple(a: PersonKey, b: PersonKey) -> Self {
        Self {
            parents: vec![a, b],
            children: Vec::new(),
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: PersonKey) -> Self {
        self.children.push(child);
        self
    }

    /// True when neither parents nor children were collected.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }
}

/// A committed household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub(crate) id: HouseholdId,
    pub(crate) parents: [PersonKey; 2],
    pub(crate) children: Vec<PersonKey>,
}

impl Household {
    /// Commit-order id.
    pub fn id(&self) -> HouseholdId {
        self.id
    }

    /// The parent pair, in the order it was recorded.
    pub fn parents(&self) -> [PersonKey; 2] {
        self.parents
    }

    /// Children, in insertion (or birthday) order.
    pub fn children(&self) -> &[PersonKey] {
        &self.children
    }

    /// The other parent of the union.
    pub fn spouse_of(&self, person: PersonKey) -> PersonKey {
        if self.parents[0] == person {
            self.parents[1]
        } else {
            self.parents[0]
        }
    }

    /// Whether the parents are exactly `a` and `b`, in either order.
    pub fn has_parents(&self, a: PersonKey, b: PersonKey) -> bool {
        self.parents == [a, b] || self.parents == [b, a]
    }
}
