//! Layout directives: one DOT line each.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::HouseholdId;

/// A node of the drawing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRef {
    /// A person box, by person id.
    Person(String),
    /// The union node of a household (`h3`).
    Union(HouseholdId),
    /// A spacer below a household (`h3_1`).
    Spacer(HouseholdId, usize),
}

impl NodeRef {
    /// Node for a person id.
    pub fn person(id: impl Into<String>) -> Self {
        Self::Person(id.into())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person(id) => f.write_str(id),
            Self::Union(h) => write!(f, "{h}"),
            Self::Spacer(h, i) => write!(f, "{h}_{i}"),
        }
    }
}

/// One line of layout output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Opens a same-rank cluster.
    RankOpen,
    /// Closes the current cluster.
    RankClose,
    /// Invisible edge keeping left-to-right order stable.
    Invisible {
        /// Source node.
        from: NodeRef,
        /// Target node.
        to: NodeRef,
    },
    /// Visible `left -> hN -> right` through a union node.
    Union {
        /// Node drawn left of the union.
        left: NodeRef,
        /// The union.
        household: HouseholdId,
        /// Node drawn right of the union.
        right: NodeRef,
    },
    /// Horizontal bar of `count` spacers below a household.
    SpacerChain {
        /// The household the spacers hang from.
        household: HouseholdId,
        /// Number of spacers, always odd.
        count: usize,
    },
    /// Plain visible edge.
    Edge {
        /// Source node.
        from: NodeRef,
        /// Target node.
        to: NodeRef,
    },
    /// `//` comment line.
    Comment(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankOpen => f.write_str("\t{ rank=same;"),
            Self::RankClose => f.write_str("\t}"),
            Self::Invisible { from, to } => write!(f, "\t\t{from} -> {to} [style=invis];"),
            Self::Union {
                left,
                household,
                right,
            } => write!(f, "\t\t{left} -> {household} -> {right};"),
            Self::SpacerChain { household, count } => {
                let spacers: Vec<String> = (0..*count)
                    .map(|i| NodeRef::Spacer(*household, i).to_string())
                    .collect();
                write!(f, "\t\t{};", spacers.join(" -> "))
            }
            Self::Edge { from, to } => write!(f, "\t\t{from} -> {to};"),
            Self::Comment(text) => write!(f, "//{text}"),
        }
    }
}
