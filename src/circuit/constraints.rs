//! Inequality constraints derived from group co-membership

use super::EncodingMap;
use crate::puzzle::{Grid, GroupKind};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// One all-different obligation between an unknown cell and either another
/// unknown cell or an already-known value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Two search variables sharing a group must take different values.
    /// Stored with `a < b`.
    VariableNotEqual { a: usize, b: usize },
    /// A search variable must avoid a value already present in one of its
    /// groups.
    NotEqualConstant { variable: usize, value: u8 },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::VariableNotEqual { a, b } => write!(f, "v{} != v{}", a, b),
            Constraint::NotEqualConstant { variable, value } => {
                write!(f, "v{} != {}", variable, value)
            }
        }
    }
}

/// The deduplicated constraint list for one puzzle, in derivation order
/// (rows, then columns, then blocks, groups ascending).
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Walk every group once and collect its pairwise obligations. A pair of
    /// cells sharing both a row and a block yields a single constraint, and
    /// a known value repeated across a variable's groups yields a single
    /// constant constraint. Complete groups contribute nothing.
    pub fn derive(grid: &Grid, map: &EncodingMap) -> Self {
        let mut constraints = Vec::new();
        let mut seen: HashSet<Constraint> = HashSet::new();
        let mut push = |constraints: &mut Vec<Constraint>, constraint: Constraint| {
            if seen.insert(constraint) {
                constraints.push(constraint);
            }
        };

        for kind in GroupKind::ALL {
            for group in 0..grid.size {
                let mut unknowns = Vec::new();
                let mut knowns = Vec::new();
                for (row, col) in grid.group_positions(kind, group) {
                    match map.variable_for(row, col) {
                        Some(variable) => unknowns.push(variable),
                        None => {
                            let value = grid.get(row, col);
                            if value != 0 {
                                knowns.push(value);
                            }
                        }
                    }
                }

                for (&a, &b) in unknowns.iter().tuple_combinations() {
                    let (a, b) = if a < b { (a, b) } else { (b, a) };
                    push(&mut constraints, Constraint::VariableNotEqual { a, b });
                }
                for &variable in &unknowns {
                    for &value in &knowns {
                        push(
                            &mut constraints,
                            Constraint::NotEqualConstant { variable, value },
                        );
                    }
                }
            }
        }

        Self { constraints }
    }

    /// Build a set directly from a list, normalizing pair order and
    /// dropping duplicates.
    pub fn from_constraints(raw: impl IntoIterator<Item = Constraint>) -> Self {
        let mut constraints = Vec::new();
        let mut seen = HashSet::new();
        for constraint in raw {
            let normalized = match constraint {
                Constraint::VariableNotEqual { a, b } if a > b => {
                    Constraint::VariableNotEqual { a: b, b: a }
                }
                other => other,
            };
            if seen.insert(normalized) {
                constraints.push(normalized);
            }
        }
        Self { constraints }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Classical check of a full assignment, values in variable order.
    /// The compiled oracle marks exactly the assignments this accepts.
    pub fn is_satisfied_by(&self, values: &[u8]) -> bool {
        self.constraints.iter().all(|constraint| match *constraint {
            Constraint::VariableNotEqual { a, b } => values[a] != values[b],
            Constraint::NotEqualConstant { variable, value } => values[variable] != value,
        })
    }

    pub fn statistics(&self) -> ConstraintStatistics {
        let variable_pairs = self
            .constraints
            .iter()
            .filter(|c| matches!(c, Constraint::VariableNotEqual { .. }))
            .count();
        ConstraintStatistics {
            variable_pairs,
            constant_pairs: self.constraints.len() - variable_pairs,
            total: self.constraints.len(),
        }
    }
}

/// Breakdown of a constraint set for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintStatistics {
    pub variable_pairs: usize,
    pub constant_pairs: usize,
    pub total: usize,
}

impl fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} constraints ({} variable pairs, {} constant exclusions)",
            self.total, self.variable_pairs, self.constant_pairs
        )
    }
}
