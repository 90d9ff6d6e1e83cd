//! Person records for the genealogy index.
//!
//! A [`Person`] is built either from one line of the indented text format
//! ([`Person::from_line`]) or from one tabular row ([`Person::from_record`]).
//! Both produce the same shape; only the validation rules differ.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::canonical::stable_hash;
use super::household::HouseholdId;

/// One tabular row: lowercased column name to cell value.
pub type Record = BTreeMap<String, String>;

/// Columns that must be present in a tabular row.
pub const MANDATORY_FIELDS: [&str; 2] = ["id", "name"];

/// Columns a tabular row may carry besides the mandatory ones.
pub const OPTIONAL_FIELDS: [&str; 10] = [
    "surname",
    "sex",
    "birthplace",
    "birthday",
    "deathplace",
    "deathday",
    "spouse",
    "mother",
    "father",
    "notes",
];

/// Index of a person inside a [`Family`](crate::Family).
///
/// Keys are handed out in insertion order, so ordering keys orders persons
/// by the time they were first added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonKey(usize);

impl PersonKey {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the person in insertion order.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Recorded sex of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// `M`
    Male,
    /// `F`
    Female,
    /// `O`
    Other,
}

impl Sex {
    /// Parse the single-letter code used by both input formats.
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            "O" => Some(Self::Other),
            _ => None,
        }
    }

    /// Single-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error when a person cannot be built from its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonError {
    /// A tabular row carries a column that is not a known person field.
    #[error("Unknown argument {key} when creating person from {record}")]
    UnknownAttribute {
        /// The offending column.
        key: String,
        /// The whole row, rendered for diagnostics.
        record: String,
    },
    /// A mandatory field is absent or empty.
    #[error("Missing mandatory argument {field} when creating person from {record}")]
    MissingField {
        /// The missing field.
        field: &'static str,
        /// The input, rendered for diagnostics.
        record: String,
    },
    /// The text line holds nothing but whitespace.
    #[error("Empty person description")]
    EmptyDescription,
}

/// A member of the family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique, graph-safe identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form attributes (sex, birthday, father, spouse, notes...).
    pub attrs: BTreeMap<String, String>,
    pub(crate) parents: Vec<PersonKey>,
    pub(crate) households: Vec<HouseholdId>,
    pub(crate) follow_descendants: bool,
}

impl Person {
    /// Create a person with an explicit id and no attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attrs: BTreeMap::new(),
            parents: Vec::new(),
            households: Vec::new(),
            follow_descendants: true,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Parse one line of the indented text format.
    ///
    /// ```text
    /// Louis XIV (M, birthday=1638-09-05, id=LouisXIV)
    /// ```
    ///
    /// Inside the parentheses, `key=value` pairs become attributes and a bare
    /// word is taken as the sex. Without an explicit `id`, the id is the name
    /// stripped of everything but ASCII letters and digits; the `unique` flag
    /// appends a three-digit suffix derived from the whole line.
    pub fn from_line(desc: &str) -> Result<Self, PersonError> {
        let desc = desc.trim();
        if desc.is_empty() {
            return Err(PersonError::EmptyDescription);
        }

        let mut attrs = BTreeMap::new();
        let name = match (desc.find('('), desc.rfind(')')) {
            (Some(open), Some(close)) if open < close => {
                for piece in desc[open + 1..close].split(',') {
                    let piece = piece.trim();
                    if piece.is_empty() {
                        continue;
                    }
                    match piece.split_once('=') {
                        Some((k, v)) => {
                            attrs.insert(k.trim().to_string(), v.trim().to_string());
                        }
                        None => {
                            attrs.insert("sex".to_string(), piece.to_string());
                        }
                    }
                }
                desc[..open].trim()
            }
            _ => desc,
        };

        if name.is_empty() {
            return Err(PersonError::MissingField {
                field: "name",
                record: desc.to_string(),
            });
        }

        let unique = attrs.remove("unique").is_some();
        let mut id = match attrs.remove("id") {
            Some(id) if !id.is_empty() => id,
            _ => sanitize_id(name),
        };
        if id.is_empty() {
            return Err(PersonError::MissingField {
                field: "id",
                record: desc.to_string(),
            });
        }
        if unique {
            id.push_str(&(100 + stable_hash(desc.as_bytes()) % 900).to_string());
        }

        let mut person = Self::new(id, name);
        person.attrs = attrs;
        Ok(person)
    }

    /// Build a person from one tabular row.
    ///
    /// Every column must be one of [`MANDATORY_FIELDS`] or [`OPTIONAL_FIELDS`];
    /// `id` and `name` must be present. Empty cells are kept as empty
    /// attributes.
    pub fn from_record(record: &Record) -> Result<Self, PersonError> {
        if let Some(key) = record.keys().find(|k| {
            !MANDATORY_FIELDS.contains(&k.as_str()) && !OPTIONAL_FIELDS.contains(&k.as_str())
        }) {
            return Err(PersonError::UnknownAttribute {
                key: key.clone(),
                record: render_record(record),
            });
        }
        for field in MANDATORY_FIELDS {
            if !record.contains_key(field) {
                return Err(PersonError::MissingField {
                    field,
                    record: render_record(record),
                });
            }
        }

        let mut attrs = record.clone();
        let id = attrs.remove("id").unwrap_or_default();
        let name = attrs.remove("name").unwrap_or_default();

        let mut person = Self::new(id, name);
        person.attrs = attrs;
        Ok(person)
    }

    /// Attribute value, treating empty strings as absent.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Recorded sex, if it is one of the known codes.
    pub fn sex(&self) -> Option<Sex> {
        self.attr("sex").and_then(Sex::from_code)
    }

    /// Birthday as written in the input.
    pub fn birthday(&self) -> Option<&str> {
        self.attr("birthday")
    }

    /// Id of the recorded spouse.
    pub fn spouse_id(&self) -> Option<&str> {
        self.attr("spouse")
    }

    /// Id of the recorded father.
    pub fn father_id(&self) -> Option<&str> {
        self.attr("father")
    }

    /// Id of the recorded mother.
    pub fn mother_id(&self) -> Option<&str> {
        self.attr("mother")
    }

    /// Parents linked through a household.
    pub fn parents(&self) -> &[PersonKey] {
        &self.parents
    }

    /// Households this person is a parent in, in commit order.
    pub fn households(&self) -> &[HouseholdId] {
        &self.households
    }

    /// Whether the descending walk expands this person's children.
    pub fn follows_descendants(&self) -> bool {
        self.follow_descendants
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Keep only ASCII letters and digits, so the result is a valid DOT id.
pub fn sanitize_id(name: &str) -> String {
    static NON_ID: OnceLock<regex_lite::Regex> = OnceLock::new();
    let re = NON_ID.get_or_init(|| {
        regex_lite::Regex::new(r"[^0-9A-Za-z]").expect("id character class is valid")
    });
    re.replace_all(name, "").into_owned()
}

fn render_record(record: &Record) -> String {
    let fields: Vec<String> = record.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", fields.join(", "))
}
