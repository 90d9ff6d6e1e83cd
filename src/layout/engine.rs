//! Generation-by-generation layout.
//!
//! [`TreeLayout`] turns one generation at a time into DOT directives:
//!
//! ```text
//! { rank=same;   persons, spouses through union nodes, ordering edges }
//! { rank=same;   spacer bars below every household with children      }
//!   union -> centre spacer, spacer -> child
//! ```
//!
//! ## Placement
//!
//! A person's households split into a left half `[0, l/2)` and a right half
//! `[l/2, l)`. With one household the union sits on the right
//! (`person -> hN -> spouse`); with two, one spouse sits on each side.
//! More than two unions cannot be laid out.
//!
//! ## Determinism
//!
//! The layout reads the [`Family`] without mutating it. Which persons were
//! drawn is tracked in a [`DrawnSet`] owned by the run, so laying out the
//! same family twice yields identical output.

use std::collections::BTreeSet;

use crate::family::{Family, FamilyError};
use crate::types::{HouseholdId, PersonKey};
use super::directive::{Directive, NodeRef};

/// Error type for layout operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A person has more than two unions.
    #[error("Person \"{name}\" has {count} spouses: drawing more than 2 spouses is not implemented")]
    TooManyUnions {
        /// Display name of the person.
        name: String,
        /// Number of households they parent.
        count: usize,
    },
    /// Siblings could not be linked because the parents never formed a household.
    #[error("No household found with parents {father} and {mother}")]
    MissingParentHousehold {
        /// Father id.
        father: String,
        /// Mother id.
        mother: String,
    },
    /// Genealogy lookup failed.
    #[error(transparent)]
    Family(#[from] FamilyError),
}

/// Persons connected by a layout run, iterated in family insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawnSet(BTreeSet<PersonKey>);

impl DrawnSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a person as drawn. Returns false if already drawn.
    pub fn insert(&mut self, key: PersonKey) -> bool {
        self.0.insert(key)
    }

    /// Check whether a person was drawn.
    pub fn contains(&self, key: PersonKey) -> bool {
        self.0.contains(&key)
    }

    /// Drawn persons in family insertion order, not drawing order.
    pub fn iter(&self) -> impl Iterator<Item = PersonKey> + '_ {
        self.0.iter().copied()
    }

    /// Number of drawn persons.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nobody was drawn.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lays out a family one generation at a time.
pub struct TreeLayout<'a> {
    family: &'a Family,
    drawn: DrawnSet,
}

impl<'a> TreeLayout<'a> {
    /// Create a layout run with nobody drawn yet.
    pub fn new(family: &'a Family) -> Self {
        Self {
            family,
            drawn: DrawnSet::new(),
        }
    }

    /// Persons drawn so far.
    pub fn drawn(&self) -> &DrawnSet {
        &self.drawn
    }

    /// Finish the run, keeping the drawn set for the header.
    pub fn into_drawn(self) -> DrawnSet {
        self.drawn
    }

    /// Lay out the whole descending tree from an ancestor.
    pub fn output_descending_tree(&mut self, ancestor: PersonKey) -> Result<Vec<Directive>, LayoutError> {
        let mut gen = vec![ancestor];
        let mut directives = Vec::new();
        while !gen.is_empty() {
            directives.extend(self.display_generation(&gen, false)?);
            gen = self.family.next_generation(&gen);
        }
        Ok(directives)
    }

    /// Lay out the whole ascending tree from one or more descendants.
    ///
    /// The descendants' own generation is laid out like a descending one;
    /// every generation above it also links each person's siblings.
    pub fn output_ascending_tree(&mut self, descendants: &[PersonKey]) -> Result<Vec<Directive>, LayoutError> {
        let mut gen = descendants.to_vec();
        let mut directives = Vec::new();
        let mut ascending = false;
        while !gen.is_empty() {
            directives.extend(self.display_generation(&gen, ascending)?);
            gen = self.family.prev_generation(&gen)?;
            ascending = true;
        }
        Ok(directives)
    }

    /// Lay out one generation.
    ///
    /// Emits a same-rank cluster with the persons and their unions, a
    /// same-rank cluster of spacer bars below households with children, and
    /// the edges from each union through its spacers to the children.
    pub fn display_generation(&mut self, gen: &[PersonKey], ascending: bool) -> Result<Vec<Directive>, LayoutError> {
        let family = self.family;
        let mut gen = gen.to_vec();
        if ascending {
            gen.sort_by(|a, b| family.person(*a).birthday().cmp(&family.person(*b).birthday()));
        }
        let rank = placed_in_rank(family, &gen);

        tracing::debug!(
            persons = gen.len(),
            placed = rank.len(),
            ascending,
            "Laying out generation"
        );

        let mut out = vec![Directive::RankOpen];
        self.place_persons(&rank, ascending, &mut out)?;

        if out.len() != 1 {
            out.push(Directive::RankClose);
            out.push(Directive::RankOpen);
        }
        self.place_spacers(&rank, &mut out);
        out.push(Directive::RankClose);
        self.connect_children(&rank, &mut out);

        Ok(out)
    }

    /// First rank: persons side by side, spouses through union nodes.
    fn place_persons(&mut self, rank: &[PersonKey], ascending: bool, out: &mut Vec<Directive>) -> Result<(), LayoutError> {
        let family = self.family;
        let mut prev: Option<NodeRef> = None;

        for &key in rank {
            let person = family.person(key);
            let unions = person.households();
            let l = unions.len();
            if l > 2 {
                tracing::error!(person = %person.id, unions = l, "Too many unions to lay out");
                return Err(LayoutError::TooManyUnions {
                    name: person.name.clone(),
                    count: l,
                });
            }
            self.drawn.insert(key);
            let node = NodeRef::person(&person.id);

            if let Some(anchor) = &prev {
                // With two unions the first spouse is drawn left of the person.
                let target = if l <= 1 {
                    node.clone()
                } else {
                    let spouse = family.household(unions[0]).spouse_of(key);
                    NodeRef::person(&family.person(spouse).id)
                };
                if *anchor != target {
                    out.push(Directive::Invisible {
                        from: anchor.clone(),
                        to: target,
                    });
                }
            }

            if l == 0 {
                prev = Some(node);
                continue;
            }

            let (left, right) = unions.split_at(l / 2);
            for &h in left {
                let spouse = family.household(h).spouse_of(key);
                if self.drawn.insert(spouse) {
                    out.push(Directive::Union {
                        left: NodeRef::person(&family.person(spouse).id),
                        household: h,
                        right: node.clone(),
                    });
                }
            }
            for &h in right {
                let spouse = family.household(h).spouse_of(key);
                if self.drawn.insert(spouse) {
                    let spouse_node = NodeRef::person(&family.person(spouse).id);
                    out.push(Directive::Union {
                        left: node.clone(),
                        household: h,
                        right: spouse_node.clone(),
                    });
                    prev = Some(spouse_node);
                }
            }

            if ascending {
                self.link_siblings(key, prev.as_ref().unwrap_or(&node), out)?;
            }
        }
        Ok(())
    }

    /// Chain a person's siblings to the right of `anchor` with invisible edges.
    fn link_siblings(&self, key: PersonKey, anchor: &NodeRef, out: &mut Vec<Directive>) -> Result<(), LayoutError> {
        let family = self.family;
        let person = family.person(key);
        let (Some(father_id), Some(mother_id)) = (person.father_id(), person.mother_id()) else {
            return Ok(());
        };
        let father = family
            .key_of(father_id)
            .ok_or_else(|| FamilyError::PersonNotFound(father_id.to_string()))?;
        let mother = family
            .key_of(mother_id)
            .ok_or_else(|| FamilyError::PersonNotFound(mother_id.to_string()))?;

        let Some(household) = family.households_with_parents(father, mother).next() else {
            tracing::error!(father = father_id, mother = mother_id, "Parents never formed a household");
            return Err(LayoutError::MissingParentHousehold {
                father: father_id.to_string(),
                mother: mother_id.to_string(),
            });
        };

        let mut from = anchor.clone();
        for &sibling in household.children() {
            let to = NodeRef::person(&family.person(sibling).id);
            if sibling == key || to == *anchor {
                continue;
            }
            out.push(Directive::Invisible {
                from: from.clone(),
                to: to.clone(),
            });
            from = to;
        }
        Ok(())
    }

    /// Second rank: one spacer bar per household with children.
    fn place_spacers(&self, rank: &[PersonKey], out: &mut Vec<Directive>) {
        let mut prev: Option<(HouseholdId, usize)> = None;
        for (h, children) in self.households_with_children(rank) {
            if let Some((prev_h, last)) = prev {
                out.push(Directive::Invisible {
                    from: NodeRef::Spacer(prev_h, last),
                    to: NodeRef::Spacer(h, 0),
                });
            }
            let count = spacer_count(children.len());
            out.push(Directive::SpacerChain { household: h, count });
            prev = Some((h, count - 1));
        }
    }

    /// Union to centre spacer, then each spacer to its child.
    fn connect_children(&mut self, rank: &[PersonKey], out: &mut Vec<Directive>) {
        let family = self.family;
        for (h, children) in self.households_with_children(rank) {
            let n = children.len();
            out.push(Directive::Edge {
                from: NodeRef::Union(h),
                to: NodeRef::Spacer(h, n / 2),
            });
            let mut slot = 0;
            for &child in children {
                self.drawn.insert(child);
                out.push(Directive::Edge {
                    from: NodeRef::Spacer(h, slot),
                    to: NodeRef::person(&family.person(child).id),
                });
                slot += 1;
                if n % 2 == 0 && slot == n / 2 {
                    slot += 1;
                }
            }
        }
    }

    /// Households of the placed persons that have at least one child, each
    /// once, in first-seen order.
    fn households_with_children(&self, rank: &[PersonKey]) -> Vec<(HouseholdId, &'a [PersonKey])> {
        let family = self.family;
        let mut seen = BTreeSet::new();
        rank.iter()
            .flat_map(move |&key| family.person(key).households())
            .filter(|&&h| seen.insert(h))
            .map(move |&h| (h, family.household(h).children()))
            .filter(|(_, children)| !children.is_empty())
            .collect()
    }
}

/// Persons of a generation that get their own place in the rank.
///
/// A person recorded as the `spouse` of someone earlier in the generation
/// is skipped: they are drawn next to that person.
fn placed_in_rank(family: &Family, gen: &[PersonKey]) -> Vec<PersonKey> {
    gen.iter()
        .enumerate()
        .filter(|&(i, &key)| {
            let id = family.person(key).id.as_str();
            !gen[..i]
                .iter()
                .any(|&earlier| family.person(earlier).spouse_id() == Some(id))
        })
        .map(|(_, &key)| key)
        .collect()
}

/// Spacers below a household: one per child, plus one when even so the
/// bar has a centre.
fn spacer_count(children: usize) -> usize {
    if children % 2 == 0 {
        children + 1
    } else {
        children
    }
}
