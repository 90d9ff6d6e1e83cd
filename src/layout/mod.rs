//! Family tree layout and DOT rendering.
//!
//! ## Architecture
//!
//! ```text
//! Family → TreeLayout (per generation) → Directives ─┐
//!              ↓                                      ├→ DotDocument
//!          DrawnSet → header (person boxes) ──────────┘
//! ```

pub mod directive;
pub mod dot;
pub mod engine;

use std::fmt;

use crate::family::Family;
use crate::policy::RenderStyle;
use crate::types::PersonKey;

pub use directive::{Directive, NodeRef};
pub use engine::{DrawnSet, LayoutError, TreeLayout};

/// A complete DOT document: header, body, footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotDocument {
    lines: Vec<String>,
    drawn: DrawnSet,
}

impl DotDocument {
    /// All output lines, without trailing newlines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Persons declared in the header.
    pub fn drawn(&self) -> &DrawnSet {
        &self.drawn
    }
}

impl fmt::Display for DotDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Lay out the descending tree of `ancestor` and/or the ascending tree of
/// `descendants`, wrapped in one shared header and footer.
pub fn output_tree(
    family: &Family,
    ancestor: Option<PersonKey>,
    descendants: &[PersonKey],
    style: &RenderStyle,
) -> Result<DotDocument, LayoutError> {
    let mut layout = TreeLayout::new(family);
    let mut body = Vec::new();

    if let Some(ancestor) = ancestor {
        body.extend(layout.output_descending_tree(ancestor)?);
    }
    if !descendants.is_empty() {
        body.push(Directive::Comment("start ascending tree".to_string()));
        body.extend(layout.output_ascending_tree(descendants)?);
    }

    let drawn = layout.into_drawn();
    let mut lines = dot::header(family, &drawn, style);
    lines.extend(body.iter().map(ToString::to_string));
    lines.push(dot::footer());

    tracing::debug!(
        lines = lines.len(),
        drawn = drawn.len(),
        "Rendered family tree"
    );

    Ok(DotDocument { lines, drawn })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HouseholdDraft, Person};

    #[test]
    fn test_output_tree_wraps_body() {
        let mut family = Family::new();
        let a = family.add_person(Person::new("A", "A"));
        let b = family.add_person(Person::new("B", "B"));
        family.add_household(HouseholdDraft::couple(a, b)).unwrap();

        let doc = output_tree(&family, Some(a), &[], &RenderStyle::default()).unwrap();
        let lines = doc.lines();
        assert_eq!(lines[0], "digraph {");
        assert_eq!(lines.last().map(String::as_str), Some("}"));
        assert!(lines.contains(&"\t\tA -> h0 -> B;".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("//")));
        assert!(doc.to_string().ends_with("}\n"));
    }

    #[test]
    fn test_output_tree_marks_ascending_part() {
        let mut family = Family::new();
        let x = family.add_person(Person::new("X", "X"));

        let doc = output_tree(&family, None, &[x], &RenderStyle::default()).unwrap();
        assert!(doc.lines().contains(&"//start ascending tree".to_string()));
        assert!(doc.drawn().contains(x));
    }

    #[test]
    fn test_output_tree_without_roots_is_empty_graph() {
        let mut family = Family::new();
        family.add_person(Person::new("X", "X"));

        let doc = output_tree(&family, None, &[], &RenderStyle::default()).unwrap();
        assert!(doc.drawn().is_empty());
        assert_eq!(
            doc.lines(),
            &[
                "digraph {",
                "\tnode [shape=box];",
                "\tedge [dir=none];",
                "",
                "\tnode[shape=circle,label=\"\",height=0.01,width=0.01]",
                "",
                "}",
            ]
        );
    }
}
