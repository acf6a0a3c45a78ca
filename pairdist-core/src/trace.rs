//! Single-pair alignment with traceback
//!
//! Runs the same recurrence as [`crate::score`] but keeps one [`DecisionNode`]
//! per visited cell. Nodes live in a dense row-major arena and refer to their
//! predecessor by index, so the whole path history stays reachable without
//! reference cycles. Peak memory is `(capped |A| + 1) * (capped |B| + 1)` nodes,
//! which is why the traceback cap is much smaller than the scoring cap.

use crate::aligned::AlignedPair;
use crate::config::EngineConfig;
use crate::error::{check_index, AlignResult};
use crate::score::capped;
use crate::types::{choose, diagonal_cost, Cost, Move, Sequence, INDEL_COST, SENTINEL};

/// One cell of the traceback table. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionNode {
    predecessor: Option<usize>,
    emitted_a: u8,
    emitted_b: u8,
    cost: Cost,
    step: Move,
}

impl DecisionNode {
    fn origin() -> Self {
        Self {
            predecessor: None,
            emitted_a: SENTINEL,
            emitted_b: SENTINEL,
            cost: 0,
            step: Move::Origin,
        }
    }

    fn new(step: Move, predecessor: usize, a: u8, b: u8, cost: Cost) -> Self {
        let (emitted_a, emitted_b) = step.emit(a, b);
        Self {
            predecessor: Some(predecessor),
            emitted_a,
            emitted_b,
            cost,
            step,
        }
    }

    /// Arena index of the optimal predecessor, `None` for the origin.
    pub fn predecessor(&self) -> Option<usize> {
        self.predecessor
    }

    pub fn emitted_a(&self) -> u8 {
        self.emitted_a
    }

    pub fn emitted_b(&self) -> u8 {
        self.emitted_b
    }

    /// Cumulative cost from the origin up to and including this cell.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn step(&self) -> Move {
        self.step
    }

    pub fn is_origin(&self) -> bool {
        self.predecessor.is_none()
    }
}

/// The retained node graph of one traceback call.
#[derive(Debug, Clone)]
pub struct Trace {
    nodes: Vec<DecisionNode>,
    terminal: usize,
    rows: usize,
    columns: usize,
}

impl Trace {
    fn origin_only() -> Self {
        Self {
            nodes: vec![DecisionNode::origin()],
            terminal: 0,
            rows: 1,
            columns: 1,
        }
    }

    /// Node for the bottom-right cell of the capped table.
    pub fn terminal(&self) -> &DecisionNode {
        &self.nodes[self.terminal]
    }

    pub fn cost(&self) -> Cost {
        self.terminal().cost
    }

    /// Number of nodes retained by this trace.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Table dimensions including the sentinel row and column.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Walk from the terminal node back to the origin, both included.
    pub fn path(&self) -> PathIter<'_> {
        PathIter {
            nodes: &self.nodes,
            next: Some(self.terminal),
        }
    }

    /// Reconstruct the two aligned strings in input order.
    pub fn aligned(&self) -> AlignedPair {
        let mut steps: Vec<&DecisionNode> = self.path().filter(|n| !n.is_origin()).collect();
        steps.reverse();

        let top = steps.iter().map(|n| char::from(n.emitted_a)).collect();
        let bottom = steps.iter().map(|n| char::from(n.emitted_b)).collect();
        AlignedPair::new(top, bottom, self.cost())
    }
}

pub struct PathIter<'a> {
    nodes: &'a [DecisionNode],
    next: Option<usize>,
}

impl<'a> Iterator for PathIter<'a> {
    type Item = &'a DecisionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.next?];
        self.next = node.predecessor;
        Some(node)
    }
}

/// Reconstructs the optimal alignment of one selected pair.
#[derive(Debug, Clone, Default)]
pub struct AlignmentTraceEngine {
    config: EngineConfig,
}

impl AlignmentTraceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Align `a` (matrix row `row`) with `b` (matrix column `column`).
    ///
    /// Self-cells yield an origin-only trace of cost 0. Both sequences are
    /// truncated to `trace_cap` residues. Nothing is cached.
    pub fn trace(&self, a: &Sequence, b: &Sequence, row: usize, column: usize) -> Trace {
        if row == column {
            return Trace::origin_only();
        }

        let cap = self.config.trace_cap;
        if a.len() > cap || b.len() > cap {
            log::debug!(
                "Truncating traced pair ({}, {}) to {} residues",
                row,
                column,
                cap
            );
        }
        let a = capped(a.as_bytes(), cap);
        let b = capped(b.as_bytes(), cap);

        let rows = a.len() + 1;
        let columns = b.len() + 1;
        let mut nodes: Vec<DecisionNode> = Vec::with_capacity(rows * columns);

        nodes.push(DecisionNode::origin());
        for j in 1..columns {
            let cost = nodes[j - 1].cost + INDEL_COST;
            nodes.push(DecisionNode::new(Move::Left, j - 1, SENTINEL, b[j - 1], cost));
        }

        for i in 1..rows {
            let ra = a[i - 1];
            let above = (i - 1) * columns;
            let here = i * columns;

            let cost = nodes[above].cost + INDEL_COST;
            nodes.push(DecisionNode::new(Move::Top, above, ra, SENTINEL, cost));

            for j in 1..columns {
                let rb = b[j - 1];
                let top = nodes[above + j].cost + INDEL_COST;
                let left = nodes[here + j - 1].cost + INDEL_COST;
                let diag = nodes[above + j - 1].cost + diagonal_cost(ra, rb);

                let (step, cost) = choose(top, left, diag, self.config.tie_break);
                let predecessor = here + j - step.back_offset(columns);
                nodes.push(DecisionNode::new(step, predecessor, ra, rb, cost));
            }
        }

        log::debug!(
            "Traced pair ({}, {}) over {}x{} cells, cost {}",
            row,
            column,
            rows,
            columns,
            nodes[rows * columns - 1].cost
        );

        Trace {
            terminal: nodes.len() - 1,
            nodes,
            rows,
            columns,
        }
    }

    /// Bounds-checked variant of [`trace`](Self::trace) over a sequence list.
    pub fn trace_indexed(
        &self,
        sequences: &[Sequence],
        row: usize,
        column: usize,
    ) -> AlignResult<Trace> {
        check_index(row, sequences.len())?;
        check_index(column, sequences.len())?;
        Ok(self.trace(&sequences[row], &sequences[column], row, column))
    }
}
