//! Aligned string pair produced by a traceback

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Cost, Move, GAP};

/// Two equal-length aligned strings, padded with gap markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    /// Sequence A (matrix row) with gaps
    pub top: String,
    /// Sequence B (matrix column) with gaps
    pub bottom: String,
    /// Cost of the terminal cell
    pub cost: Cost,
}

/// Operation counts over an aligned pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    /// Residues of B opposite a gap in A
    pub insertions: u32,
    /// Residues of A opposite a gap in B
    pub deletions: u32,
}

impl AlignmentStats {
    /// Identity as a percentage of alignment columns.
    pub fn identity(&self) -> f32 {
        let total = self.columns();
        if total == 0 {
            return 0.0;
        }
        (self.matches as f32 / total as f32) * 100.0
    }

    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.insertions + self.deletions
    }

    pub fn edit_distance(&self) -> u32 {
        self.mismatches + self.insertions + self.deletions
    }
}

impl AlignedPair {
    pub fn new(top: String, bottom: String, cost: Cost) -> Self {
        debug_assert_eq!(top.chars().count(), bottom.chars().count());
        Self { top, bottom, cost }
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.top.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    fn columns(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.top.chars().zip(self.bottom.chars())
    }

    fn column_move(a: char, b: char) -> Move {
        let gap = char::from(GAP);
        if b == gap {
            Move::Top
        } else if a == gap {
            Move::Left
        } else {
            Move::Diagonal
        }
    }

    /// Sequence A with gap markers removed.
    pub fn ungapped_top(&self) -> String {
        self.top.chars().filter(|&c| c != char::from(GAP)).collect()
    }

    /// Sequence B with gap markers removed.
    pub fn ungapped_bottom(&self) -> String {
        self.bottom.chars().filter(|&c| c != char::from(GAP)).collect()
    }

    /// Sum of per-column step costs. Equals `cost` for any traced pair.
    pub fn path_cost(&self) -> Cost {
        self.columns()
            .map(|(a, b)| {
                let step = Self::column_move(a, b);
                step.step_cost(a as u8, b as u8)
            })
            .sum()
    }

    pub fn stats(&self) -> AlignmentStats {
        let mut stats = AlignmentStats::default();
        for (a, b) in self.columns() {
            match Self::column_move(a, b) {
                Move::Top => stats.deletions += 1,
                Move::Left => stats.insertions += 1,
                _ if a == b => stats.matches += 1,
                _ => stats.mismatches += 1,
            }
        }
        stats
    }

    /// `|` for a match, `*` for a substitution, space opposite a gap.
    pub fn midline(&self) -> String {
        self.columns()
            .map(|(a, b)| match Self::column_move(a, b) {
                Move::Diagonal if a == b => '|',
                Move::Diagonal => '*',
                _ => ' ',
            })
            .collect()
    }
}

impl fmt::Display for AlignedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.top)?;
        writeln!(f, "{}", self.midline())?;
        write!(f, "{}", self.bottom)
    }
}
