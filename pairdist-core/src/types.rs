use serde::{Deserialize, Serialize};

/// Alignment cost. Lower is better.
pub type Cost = i32;

/// Cost of inserting or deleting a single residue.
pub const INDEL_COST: Cost = 5;
/// Cost of aligning two different residues.
pub const SUB_COST: Cost = 1;
/// Cost of aligning two identical residues (a bonus).
pub const MATCH_COST: Cost = -3;

/// Placeholder occupying row/column 0 of the DP table (the empty prefix).
pub const SENTINEL: u8 = b'0';
/// Symbol written into an aligned string opposite an indel.
pub const GAP: u8 = b'-';

/// Residues must not include [`GAP`]; aligned output would be ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub data: Vec<u8>,
    pub description: Option<String>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// The decision taken at one cell of the alignment matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Cell (0, 0), no predecessor.
    Origin,
    /// From (i-1, j): residue of A against a gap.
    Top,
    /// From (i, j-1): gap against a residue of B.
    Left,
    /// From (i-1, j-1): match or substitution.
    Diagonal,
}

impl Move {
    /// Cost contributed by this single step when `a` and `b` are the residues at the cell.
    pub fn step_cost(&self, a: u8, b: u8) -> Cost {
        match self {
            Move::Origin => 0,
            Move::Top | Move::Left => INDEL_COST,
            Move::Diagonal => diagonal_cost(a, b),
        }
    }

    /// Residues written into the two aligned strings for this step.
    pub fn emit(&self, a: u8, b: u8) -> (u8, u8) {
        match self {
            Move::Origin => (SENTINEL, SENTINEL),
            Move::Top => (a, GAP),
            Move::Left => (GAP, b),
            Move::Diagonal => (a, b),
        }
    }

    /// Distance back to the predecessor cell in a row-major table `columns` wide.
    pub fn back_offset(&self, columns: usize) -> usize {
        match self {
            Move::Origin => 0,
            Move::Top => columns,
            Move::Left => 1,
            Move::Diagonal => columns + 1,
        }
    }
}

#[inline(always)]
pub fn diagonal_cost(a: u8, b: u8) -> Cost {
    if a == b {
        MATCH_COST
    } else {
        SUB_COST
    }
}

/// Preference order among predecessors of equal cost. Diagonal is always last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// top, then left, then diagonal
    #[default]
    TopFirst,
    /// left, then top, then diagonal
    LeftFirst,
}

/// Pick the cheapest of the three candidates. The first candidate in `order`
/// wins ties; a later candidate replaces it only when strictly cheaper.
#[inline(always)]
pub fn choose(top: Cost, left: Cost, diag: Cost, order: TieBreak) -> (Move, Cost) {
    let mut best = match order {
        TieBreak::TopFirst => (Move::Top, top),
        TieBreak::LeftFirst => (Move::Left, left),
    };
    let second = match order {
        TieBreak::TopFirst => (Move::Left, left),
        TieBreak::LeftFirst => (Move::Top, top),
    };
    if second.1 < best.1 {
        best = second;
    }
    if diag < best.1 {
        best = (Move::Diagonal, diag);
    }
    best
}
