//! Populating a [`Family`] from input files.
//!
//! Two formats are understood:
//!
//! - indented text ([`text`]): parents on unindented lines, children on
//!   tab-indented lines, households separated by blank lines;
//! - CSV ([`tabular`]): one person per row, with `spouse`, `father` and
//!   `mother` columns holding ids, checked by [`validation`] first.

pub mod tabular;
pub mod text;
pub mod validation;

use std::fs::File;
use std::path::Path;

use crate::family::{Family, FamilyError};
use crate::types::PersonError;

pub use tabular::{populate_records, read_records};
pub use text::populate_text;
pub use validation::{check_records, ValidationError};

/// Error type for loading a genealogy.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV input is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV input failed a sanity check.
    #[error("Invalid genealogy: {0}")]
    Validation(#[from] ValidationError),

    /// A person could not be built.
    #[error("Line {line}: {source}")]
    Person {
        /// 1-based input line.
        line: usize,
        /// Underlying error.
        #[source]
        source: PersonError,
    },

    /// A tabular row could not be turned into a person.
    #[error("Row {row}: {source}")]
    Record {
        /// 0-based data row, as in validation errors.
        row: usize,
        /// Underlying error.
        #[source]
        source: PersonError,
    },

    /// A household could not be committed.
    #[error("Line {line}: {source}")]
    Household {
        /// 1-based input line where the household ended.
        line: usize,
        /// Underlying error.
        #[source]
        source: FamilyError,
    },

    /// A relationship references an unknown person.
    #[error(transparent)]
    Family(#[from] FamilyError),
}

/// Populate `family` from a file, picking the format from the extension.
///
/// `.csv` files go through the tabular loader; anything else is read as
/// indented text.
pub fn load_path(family: &mut Family, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    tracing::debug!(path = %path.display(), csv = is_csv, "Loading genealogy");

    if is_csv {
        let records = read_records(File::open(path)?)?;
        populate_records(family, &records)
    } else {
        populate_text(family, &std::fs::read_to_string(path)?)
    }
}
