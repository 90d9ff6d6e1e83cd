//! CSV genealogies.
//!
//! ```text
//! id,name,surname,sex,spouse,father,mother
//! LouisXIII,Louis,XIII,M,AnneAutriche,,
//! AnneAutriche,Anne,d'Autriche,F,LouisXIII,,
//! LouisXIV,Louis,XIV,M,,LouisXIII,AnneAutriche
//! ```
//!
//! A union is created on the row of the second spouse, so the partner named
//! in `spouse` must already be known. Children join every household of their
//! father and mother.

use std::io::Read;

use crate::family::{Family, FamilyError};
use crate::types::{HouseholdDraft, HouseholdId, Person, Record};

use super::validation::{check_records, field};
use super::LoadError;

/// Read CSV rows into records keyed by lowercased column name.
///
/// Short rows are padded with empty cells.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, csv::Error> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = csv
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), row.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Validate the rows, then add their persons and households to `family`.
pub fn populate_records(family: &mut Family, records: &[Record]) -> Result<(), LoadError> {
    check_records(records)?;

    for (row, record) in records.iter().enumerate() {
        let person = Person::from_record(record)
            .map_err(|source| LoadError::Record { row, source })?;
        let key = family.add_person(person);

        let spouse = field(record, "spouse");
        if let Some(spouse) = family.key_of(spouse) {
            family.add_household(HouseholdDraft::couple(spouse, key))?;
        }

        let (father, mother) = (field(record, "father"), field(record, "mother"));
        if !father.is_empty() && !mother.is_empty() {
            let father = family
                .key_of(father)
                .ok_or_else(|| FamilyError::PersonNotFound(father.to_string()))?;
            let mother = family
                .key_of(mother)
                .ok_or_else(|| FamilyError::PersonNotFound(mother.to_string()))?;
            let households: Vec<HouseholdId> = family
                .households_with_parents(father, mother)
                .map(|h| h.id())
                .collect();
            for household in households {
                family.add_child(household, key);
            }
        }
    }

    tracing::debug!(
        persons = family.num_persons(),
        households = family.num_households(),
        "Loaded tabular genealogy"
    );
    Ok(())
}
