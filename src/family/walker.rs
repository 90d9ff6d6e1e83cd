//! Generation traversal.
//!
//! A generation is an ordered batch of persons at the same tree depth.
//! Descending walks follow household children; ascending walks follow the
//! recorded `father`/`mother` attributes.

use crate::types::PersonKey;
use super::{Family, FamilyError};

impl Family {
    /// Takes generation N, returns generation N+1.
    ///
    /// For each person that follows descendants, appends the children of
    /// each of their households, in household order then child order.
    /// Children are not deduplicated: a child recorded under two households
    /// shows up twice.
    pub fn next_generation(&self, current: &[PersonKey]) -> Vec<PersonKey> {
        current
            .iter()
            .map(|&key| self.person(key))
            .filter(|p| p.follows_descendants())
            .flat_map(|p| p.households())
            .flat_map(|&h| self.household(h).children().iter().copied())
            .collect()
    }

    /// Takes a generation, returns the previous one.
    ///
    /// Each person contributes their recorded father then mother, when
    /// present.
    pub fn prev_generation(&self, current: &[PersonKey]) -> Result<Vec<PersonKey>, FamilyError> {
        let mut prev = Vec::with_capacity(current.len() * 2);
        for &key in current {
            prev.extend(self.recorded_parents(key)?);
        }
        Ok(prev)
    }
}
