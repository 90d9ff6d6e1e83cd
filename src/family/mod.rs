//! The genealogy index.
//!
//! [`Family`] owns every person and household of one genealogy. Persons live
//! in insertion order and are addressed by [`PersonKey`]; households are
//! append-only and addressed by their commit-order [`HouseholdId`].
//!
//! ## Invariants
//!
//! - Every committed household has exactly two parents, both present
//! - Each parent's household list contains that household exactly once
//! - Household ids are `0..N` in commit order, never reused

pub mod walker;

use std::collections::HashMap;

use crate::types::{Household, HouseholdDraft, HouseholdId, Person, PersonKey};

/// Error type for genealogy index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FamilyError {
    /// A household was committed with a parent count other than two.
    #[error("Invalid household: number of parents is {count}, expected 2")]
    InvalidHousehold {
        /// Parents present in the rejected draft.
        count: usize,
    },
    /// No person matches the requested id or name.
    #[error("Person {0} not found")]
    PersonNotFound(String),
}

/// All persons and households of one genealogy.
#[derive(Debug, Clone, Default)]
pub struct Family {
    /// Persons in insertion order.
    everybody: Vec<Person>,
    /// Person id -> key.
    index: HashMap<String, PersonKey>,
    /// Committed households, indexed by id.
    households: Vec<Household>,
}

impl Family {
    /// Create an empty family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person, or merge their attributes into an existing person with
    /// the same id.
    ///
    /// On merge, new attribute values overwrite old ones and the existing
    /// key is returned, so parent and household links stay valid.
    pub fn add_person(&mut self, person: Person) -> PersonKey {
        if let Some(&key) = self.index.get(&person.id) {
            self.everybody[key.index()].attrs.extend(person.attrs);
            return key;
        }

        let key = PersonKey::new(self.everybody.len());
        self.index.insert(person.id.clone(), key);
        self.everybody.push(person);
        key
    }

    /// Commit a household.
    ///
    /// Fails unless the draft has exactly two parents. Children listed in
    /// the draft get the parent pair recorded as their parents.
    pub fn add_household(&mut self, draft: HouseholdDraft) -> Result<HouseholdId, FamilyError> {
        let parents: [PersonKey; 2] = draft
            .parents
            .as_slice()
            .try_into()
            .map_err(|_| FamilyError::InvalidHousehold {
                count: draft.parents.len(),
            })?;

        let id = HouseholdId::new(self.households.len());
        self.households.push(Household {
            id,
            parents,
            children: Vec::new(),
        });

        for parent in parents {
            let unions = &mut self.everybody[parent.index()].households;
            if !unions.contains(&id) {
                unions.push(id);
            }
        }
        for child in draft.children {
            self.add_child(id, child);
        }

        tracing::trace!(household = %id, "Committed household");
        Ok(id)
    }

    /// Append a child to a committed household.
    pub fn add_child(&mut self, household: HouseholdId, child: PersonKey) {
        let h = &mut self.households[household.index()];
        h.children.push(child);
        self.everybody[child.index()].parents = h.parents.to_vec();
    }

    /// Find a person by id, falling back to an exact display-name match.
    pub fn find_person(&self, key: &str) -> Result<PersonKey, FamilyError> {
        if let Some(&found) = self.index.get(key) {
            return Ok(found);
        }
        self.everybody
            .iter()
            .position(|p| p.name == key)
            .map(PersonKey::new)
            .ok_or_else(|| FamilyError::PersonNotFound(key.to_string()))
    }

    /// The first person, in insertion order, with no recorded parents.
    ///
    /// This is a weak heuristic: it does not prefer the ancestor with the
    /// most descendants.
    pub fn find_first_ancestor(&self) -> Option<PersonKey> {
        self.everybody
            .iter()
            .position(|p| p.parents.is_empty())
            .map(PersonKey::new)
    }

    /// Key of the person with this exact id.
    pub fn key_of(&self, id: &str) -> Option<PersonKey> {
        self.index.get(id).copied()
    }

    /// Get a person.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this family.
    pub fn person(&self, key: PersonKey) -> &Person {
        &self.everybody[key.index()]
    }

    /// Get a household.
    ///
    /// # Panics
    ///
    /// Panics if the id was not issued by this family.
    pub fn household(&self, id: HouseholdId) -> &Household {
        &self.households[id.index()]
    }

    /// All persons with their keys, in insertion order.
    pub fn persons(&self) -> impl Iterator<Item = (PersonKey, &Person)> {
        self.everybody
            .iter()
            .enumerate()
            .map(|(i, p)| (PersonKey::new(i), p))
    }

    /// All committed households, in commit order.
    pub fn households(&self) -> &[Household] {
        &self.households
    }

    /// Households whose parents are `a` and `b`, in either order.
    pub fn households_with_parents(
        &self,
        a: PersonKey,
        b: PersonKey,
    ) -> impl Iterator<Item = &Household> {
        self.households.iter().filter(move |h| h.has_parents(a, b))
    }

    /// Resolve the `father` and `mother` attributes, in that order.
    ///
    /// Absent or empty attributes contribute nothing; an id that is not in
    /// the index is an error.
    pub fn recorded_parents(&self, key: PersonKey) -> Result<Vec<PersonKey>, FamilyError> {
        let person = self.person(key);
        [person.father_id(), person.mother_id()]
            .into_iter()
            .flatten()
            .map(|id| {
                self.key_of(id)
                    .ok_or_else(|| FamilyError::PersonNotFound(id.to_string()))
            })
            .collect()
    }

    /// Sort a household's children by birthday, if every child has one.
    pub fn sort_children_by_birthday(&mut self, household: HouseholdId) {
        let Self {
            everybody,
            households,
            ..
        } = self;
        let children = &mut households[household.index()].children;
        if children
            .iter()
            .all(|c| everybody[c.index()].birthday().is_some())
        {
            children.sort_by(|a, b| {
                everybody[a.index()]
                    .birthday()
                    .cmp(&everybody[b.index()].birthday())
            });
        }
    }

    /// Stop (or resume) expanding this person's children when descending.
    pub fn set_follow_descendants(&mut self, key: PersonKey, follow: bool) {
        self.everybody[key.index()].follow_descendants = follow;
    }

    /// Number of persons.
    pub fn num_persons(&self) -> usize {
        self.everybody.len()
    }

    /// Number of committed households.
    pub fn num_households(&self) -> usize {
        self.households.len()
    }
}
