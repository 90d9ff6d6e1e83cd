//! RenderStyle: how person boxes and spacer nodes are declared.
//!
//! Loaded from JSON; every field has a default, so a partial file only
//! overrides what it names:
//!
//! ```json
//! { "sex_colors": { "M": "lightblue", "F": "pink" }, "notes_max_chars": 40 }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_STYLE_VERSION;

/// Error when loading a style file.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// The file could not be read.
    #[error("Cannot read style file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid style document.
    #[error("Invalid style document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rendering parameters for the DOT header.
///
/// ## Parameters
///
/// - `person_shape`: Graphviz shape of person boxes
/// - `sex_colors`: Fill color per sex code (`M`, `F`, `O`)
/// - `default_color`: Fill color when the sex is unset or unknown
/// - `notes_max_chars`: Notes longer than this are truncated in labels
/// - `spacer_size`: Height and width of the invisible union and spacer nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Style version identifier.
    pub version: String,
    /// Shape of person boxes.
    pub person_shape: String,
    /// Fill color per sex code.
    pub sex_colors: BTreeMap<String, String>,
    /// Fallback fill color.
    pub default_color: String,
    /// Maximum characters of notes shown in a label.
    pub notes_max_chars: usize,
    /// Size of union and spacer nodes.
    pub spacer_size: f32,
}

impl RenderStyle {
    /// Parse a (possibly partial) JSON style document.
    pub fn from_json_str(json: &str) -> Result<Self, StyleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON style document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Fill color for a sex code.
    pub fn color_for(&self, sex: Option<&str>) -> &str {
        sex.and_then(|s| self.sex_colors.get(s))
            .map(String::as_str)
            .unwrap_or(self.default_color.as_str())
    }

    /// Compute a hash of the style parameters.
    pub fn params_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        let sex_colors = [("M", "azure2"), ("F", "bisque"), ("O", "green")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            version: DEFAULT_STYLE_VERSION.to_string(),
            person_shape: "box".to_string(),
            sex_colors,
            default_color: "white".to_string(),
            notes_max_chars: 60,
            spacer_size: 0.01,
        }
    }
}
