//! Rendering policy definitions.

pub mod style;

pub use style::{RenderStyle, StyleError};
