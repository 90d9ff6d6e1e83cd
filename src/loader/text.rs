//! Indented text genealogies.
//!
//! ```text
//! # Comments start with '#'
//! Louis XIII (M, birthday=1601-09-27)
//! Anne d'Autriche (F, birthday=1601-09-22)
//! 	Louis XIV (M, birthday=1638-09-05)
//! 	Philippe (M, birthday=1640-09-21, id=PhilippeOrleans)
//!
//! Louis XIV (M, birthday=1638-09-05)
//! Marie-Thérèse d'Autriche (F)
//! 	Louis de France (M, birthday=1661-11-01)
//! ```
//!
//! Unindented lines are parents, tab-indented lines are their children and
//! a blank line closes the household. A person mentioned again under the
//! same id is merged with the earlier entry.

use crate::family::Family;
use crate::types::{HouseholdDraft, Person};

use super::LoadError;

/// Parse indented text and add its persons and households to `family`.
pub fn populate_text(family: &mut Family, input: &str) -> Result<(), LoadError> {
    let mut draft = HouseholdDraft::new();
    let mut last_line = 0;

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        last_line = line_no;
        let line = raw.trim_end();

        if line.is_empty() {
            commit(family, &mut draft, line_no)?;
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let (desc, is_child) = match line.strip_prefix('\t') {
            Some(rest) => (rest, true),
            None => (line, false),
        };
        let person = Person::from_line(desc).map_err(|source| LoadError::Person {
            line: line_no,
            source,
        })?;
        let key = family.add_person(person);
        if is_child {
            draft.children.push(key);
        } else {
            draft.parents.push(key);
        }
    }
    commit(family, &mut draft, last_line)?;

    tracing::debug!(
        persons = family.num_persons(),
        households = family.num_households(),
        "Loaded text genealogy"
    );
    Ok(())
}

/// Commit the pending household, if any, and start a fresh one.
fn commit(family: &mut Family, draft: &mut HouseholdDraft, line: usize) -> Result<(), LoadError> {
    let draft = std::mem::take(draft);
    if draft.is_empty() {
        return Ok(());
    }
    let id = family
        .add_household(draft)
        .map_err(|source| LoadError::Household { line, source })?;
    family.sort_children_by_birthday(id);
    Ok(())
}
