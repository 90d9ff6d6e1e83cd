//! # family-tree-kernel
//!
//! Generation-by-generation family tree layout emitting Graphviz DOT.
//!
//! The kernel answers one question:
//!
//! > Given a genealogy and a starting person, how should each generation be
//! > ordered and connected so that `dot` draws a readable tree?
//!
//! ## Core Contract
//!
//! 1. Spouses sit next to each other, joined through a union node
//! 2. Children hang below their parents' union, centred on a spacer bar
//! 3. Siblings and households keep a stable left-to-right order
//!
//! ## Architecture
//!
//! ```text
//! Input (text / CSV) → loader → Family ─→ Generation Walker
//!                                  ↓              ↓
//!                             TreeLayout ← one generation at a time
//!                                  ↓
//!                    header + directives + footer → DOT
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same family + same roots + same style → byte-identical DOT
//! - Persons are declared in insertion order
//! - Households are numbered in commit order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod family;
pub mod layout;
pub mod loader;
pub mod policy;
pub mod types;

// Re-exports
pub use types::{
    sanitize_id, Household, HouseholdDraft, HouseholdId, Person, PersonError, PersonKey, Record,
    Sex,
};
pub use family::{Family, FamilyError};
pub use layout::{output_tree, Directive, DotDocument, DrawnSet, LayoutError, NodeRef, TreeLayout};
pub use loader::{load_path, populate_records, populate_text, read_records, LoadError, ValidationError};
pub use policy::{RenderStyle, StyleError};
pub use canonical::{canonical_hash, canonical_hash_hex, stable_hash, to_canonical_bytes};

/// Default render style version identifier.
pub const DEFAULT_STYLE_VERSION: &str = "render_style_v1";
