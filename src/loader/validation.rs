//! Sanity checks on tabular genealogies.
//!
//! Checks run in a fixed order and the first failing one is reported.
//! Row numbers are zero-based data rows (the header is not counted).

use std::collections::HashSet;

use crate::types::Record;

/// Accepted values of the `sex` column.
pub const KNOWN_SEX_CODES: [&str; 4] = ["F", "M", "O", ""];

/// Error type for tabular sanity checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Some ids occur on more than one row.
    #[error("Indices {ids:?} are repeated at rows {rows:?}")]
    DuplicateIds {
        /// Duplicated ids, in first-occurrence order.
        ids: Vec<String>,
        /// Every row holding one of them.
        rows: Vec<usize>,
    },

    /// Some persons list themselves as spouse.
    #[error("{ids:?} at rows {rows:?} marry themselves")]
    SelfMarried {
        /// Offending ids.
        ids: Vec<String>,
        /// Their rows.
        rows: Vec<usize>,
    },

    /// A spouse link is not reciprocated.
    #[error("{row}-th element {id} lists {spouse:?} as their spouse, yet {claimed_by:?} claim they are their spouses")]
    SpouseMismatch {
        /// Row of the person.
        row: usize,
        /// Their id.
        id: String,
        /// The spouse they list (possibly empty).
        spouse: String,
        /// Ids of the rows listing this person as spouse.
        claimed_by: Vec<String>,
    },

    /// A father appears on a later row than his child.
    #[error("{row}-th element with id {id} introduced before their father {father}")]
    FatherIntroducedLate {
        /// Row of the child.
        row: usize,
        /// Id of the child.
        id: String,
        /// Id of the father.
        father: String,
    },

    /// A mother appears on a later row than her child.
    #[error("{row}-th element with id {id} introduced before their mother {mother}")]
    MotherIntroducedLate {
        /// Row of the child.
        row: usize,
        /// Id of the child.
        id: String,
        /// Id of the mother.
        mother: String,
    },

    /// Some sex values are not one of [`KNOWN_SEX_CODES`].
    #[error("{ids:?} at rows {rows:?} have unknown sex {values:?}")]
    UnknownSex {
        /// Offending ids, deduplicated.
        ids: Vec<String>,
        /// Their rows.
        rows: Vec<usize>,
        /// Offending values, deduplicated.
        values: Vec<String>,
    },
}

/// Run every check over the rows, in order.
pub fn check_records(records: &[Record]) -> Result<(), ValidationError> {
    check_duplicate_ids(records)?;
    check_self_married(records)?;
    check_spouses_reciprocate(records)?;
    check_parents_introduced_first(records)?;
    check_sex_codes(records)
}

/// Cell value, with absent columns read as empty.
pub(crate) fn field<'r>(record: &'r Record, column: &str) -> &'r str {
    record.get(column).map(String::as_str).unwrap_or("")
}

fn check_duplicate_ids(records: &[Record]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let repeated: HashSet<&str> = records
        .iter()
        .map(|r| field(r, "id"))
        .filter(|id| !seen.insert(*id))
        .collect();
    if repeated.is_empty() {
        return Ok(());
    }

    let mut ids: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let id = field(record, "id");
        if repeated.contains(id) {
            rows.push(row);
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
    }
    Err(ValidationError::DuplicateIds { ids, rows })
}

fn check_self_married(records: &[Record]) -> Result<(), ValidationError> {
    let (ids, rows): (Vec<String>, Vec<usize>) = records
        .iter()
        .enumerate()
        .filter(|(_, r)| field(r, "id") == field(r, "spouse"))
        .map(|(row, r)| (field(r, "id").to_string(), row))
        .unzip();
    if ids.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::SelfMarried { ids, rows })
    }
}

fn check_spouses_reciprocate(records: &[Record]) -> Result<(), ValidationError> {
    for (row, record) in records.iter().enumerate() {
        let id = field(record, "id");
        let spouse = field(record, "spouse");
        let claimed_by: Vec<String> = records
            .iter()
            .filter(|other| field(other, "spouse") == id)
            .map(|other| field(other, "id").to_string())
            .collect();

        let reciprocated = if spouse.is_empty() {
            claimed_by.is_empty()
        } else {
            claimed_by.len() == 1 && claimed_by[0] == spouse
        };
        if !reciprocated {
            return Err(ValidationError::SpouseMismatch {
                row,
                id: id.to_string(),
                spouse: spouse.to_string(),
                claimed_by,
            });
        }
    }
    Ok(())
}

fn check_parents_introduced_first(records: &[Record]) -> Result<(), ValidationError> {
    let introduced_before = |row: usize, parent: &str| {
        records[..row].iter().any(|r| field(r, "id") == parent)
    };

    for (row, record) in records.iter().enumerate() {
        let father = field(record, "father");
        if !father.is_empty() && !introduced_before(row, father) {
            return Err(ValidationError::FatherIntroducedLate {
                row,
                id: field(record, "id").to_string(),
                father: father.to_string(),
            });
        }
    }
    for (row, record) in records.iter().enumerate() {
        let mother = field(record, "mother");
        if !mother.is_empty() && !introduced_before(row, mother) {
            return Err(ValidationError::MotherIntroducedLate {
                row,
                id: field(record, "id").to_string(),
                mother: mother.to_string(),
            });
        }
    }
    Ok(())
}

fn check_sex_codes(records: &[Record]) -> Result<(), ValidationError> {
    let mut ids: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    let mut values: Vec<String> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let sex = field(record, "sex");
        if KNOWN_SEX_CODES.contains(&sex) {
            continue;
        }
        rows.push(row);
        let id = field(record, "id");
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
        if !values.iter().any(|seen| seen == sex) {
            values.push(sex.to_string());
        }
    }

    if rows.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnknownSex { ids, rows, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, &str)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn person(id: &str, sex: &str, spouse: &str, father: &str, mother: &str) -> Record {
        row(&[
            ("id", id),
            ("name", id),
            ("sex", sex),
            ("spouse", spouse),
            ("father", father),
            ("mother", mother),
        ])
    }

    fn valid() -> Vec<Record> {
        vec![
            person("A", "M", "B", "", ""),
            person("B", "F", "A", "", ""),
            person("C", "", "", "A", "B"),
        ]
    }

    #[test]
    fn test_valid_records_pass() {
        assert_eq!(check_records(&valid()), Ok(()));
        assert_eq!(check_records(&[]), Ok(()));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut records = valid();
        records.push(person("X", "", "", "", ""));
        records.push(person("C", "", "", "", ""));
        records.push(person("X", "", "", "", ""));

        assert_eq!(
            check_records(&records),
            Err(ValidationError::DuplicateIds {
                ids: vec!["C".into(), "X".into()],
                rows: vec![2, 3, 4, 5],
            })
        );
    }

    #[test]
    fn test_self_married() {
        let records = vec![person("A", "", "A", "", "")];
        let err = check_records(&records).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SelfMarried {
                ids: vec!["A".into()],
                rows: vec![0],
            }
        );
        assert_eq!(err.to_string(), "[\"A\"] at rows [0] marry themselves");
    }

    #[test]
    fn test_unreciprocated_spouse() {
        let mut records = valid();
        records[1] = person("B", "F", "", "", "");
        assert_eq!(
            check_records(&records),
            Err(ValidationError::SpouseMismatch {
                row: 0,
                id: "A".into(),
                spouse: "B".into(),
                claimed_by: vec![],
            })
        );
    }

    #[test]
    fn test_parents_introduced_late() {
        let records = vec![
            person("C", "", "", "A", ""),
            person("A", "", "", "", ""),
        ];
        assert_eq!(
            check_records(&records),
            Err(ValidationError::FatherIntroducedLate {
                row: 0,
                id: "C".into(),
                father: "A".into(),
            })
        );

        let records = vec![person("C", "", "", "", "B"), person("B", "", "", "", "")];
        assert!(matches!(
            check_records(&records),
            Err(ValidationError::MotherIntroducedLate { row: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_sex() {
        let records = vec![
            person("A", "U", "", "", ""),
            person("B", "F", "", "", ""),
            person("C", "U", "", "", ""),
            person("D", "male", "", "", ""),
        ];
        assert_eq!(
            check_records(&records),
            Err(ValidationError::UnknownSex {
                ids: vec!["A".into(), "C".into(), "D".into()],
                rows: vec![0, 2, 3],
                values: vec!["U".into(), "male".into()],
            })
        );
    }

    #[test]
    fn test_missing_columns_read_as_empty() {
        let records = vec![row(&[("id", "A"), ("name", "Anna")])];
        assert_eq!(check_records(&records), Ok(()));
    }
}
