//! Core entity types for the genealogy index.

pub mod person;
pub mod household;

pub use person::{Person, PersonKey, PersonError, Record, Sex, sanitize_id};
pub use household::{Household, HouseholdDraft, HouseholdId};
