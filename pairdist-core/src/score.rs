//! Cost-only global alignment scoring
//!
//! Fills one cell of the all-pairs matrix at a time. The dynamic program keeps
//! two rows of the cost table, so working memory is linear in the shorter
//! (capped) sequence. Results are memoized per unordered index pair.
//!
//! Sequences longer than `EngineConfig::score_cap` are compared on their first
//! `score_cap` residues only. No error is raised for over-length input.

use crate::cache::SymmetricCostCache;
use crate::config::EngineConfig;
use crate::error::{check_index, AlignResult};
use crate::types::{choose, diagonal_cost, Cost, Sequence, TieBreak, INDEL_COST};

/// Truncate `seq` to at most `cap` residues.
#[inline]
pub fn capped(seq: &[u8], cap: usize) -> &[u8] {
    &seq[..seq.len().min(cap)]
}

/// Global alignment cost of `a` against `b` after truncating both to `cap`.
///
/// Row and column 0 stand for the empty prefix (the sentinel position), so
/// cost(0, j) = j * indel and cost(i, 0) = i * indel. Each inner cell takes the
/// cheapest of top, left and diagonal in `tie_break` order.
pub fn alignment_cost(a: &[u8], b: &[u8], cap: usize, tie_break: TieBreak) -> Cost {
    let a = capped(a, cap);
    let b = capped(b, cap);

    // The cost is symmetric in its arguments; iterate over the longer one so the
    // retained rows span the shorter.
    let (rows, cols) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let width = cols.len() + 1;
    let mut previous: Vec<Cost> = (0..width).map(|j| j as Cost * INDEL_COST).collect();
    let mut current: Vec<Cost> = vec![0; width];

    for (i, &ra) in rows.iter().enumerate() {
        current[0] = (i as Cost + 1) * INDEL_COST;
        for j in 1..width {
            let top = previous[j] + INDEL_COST;
            let left = current[j - 1] + INDEL_COST;
            let diag = previous[j - 1] + diagonal_cost(ra, cols[j - 1]);
            current[j] = choose(top, left, diag, tie_break).1;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[width - 1]
}

/// Scores ordered (row, column) cells of the distance matrix.
#[derive(Debug, Clone, Default)]
pub struct ScoreMatrixEngine {
    config: EngineConfig,
    cache: SymmetricCostCache,
    computed: u64,
}

impl ScoreMatrixEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cache: SymmetricCostCache::new(),
            computed: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &SymmetricCostCache {
        &self.cache
    }

    /// Number of dynamic programs actually run since construction or the last reset.
    pub fn computed(&self) -> u64 {
        self.computed
    }

    /// Drop all memoized costs.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.computed = 0;
    }

    /// Cost of aligning `a` (matrix row `row`) with `b` (matrix column `column`).
    ///
    /// Self-cells return 0 without consulting the cache. Otherwise a cached cost
    /// is returned when present; a miss runs the DP and stores the result for
    /// both orderings of the pair.
    pub fn align(&mut self, a: &Sequence, b: &Sequence, row: usize, column: usize) -> Cost {
        if row == column {
            return 0;
        }

        if let Some(cost) = self.cache.lookup(row, column) {
            log::trace!("Cache hit for pair ({}, {}): {}", row, column, cost);
            return cost;
        }

        let cap = self.config.score_cap;
        if a.len() > cap || b.len() > cap {
            log::debug!(
                "Truncating pair ({}, {}) to {} residues (lengths {} and {})",
                row,
                column,
                cap,
                a.len(),
                b.len()
            );
        }

        let cost = alignment_cost(a.as_bytes(), b.as_bytes(), cap, self.config.tie_break);
        self.computed += 1;
        self.cache.insert(row, column, cost);
        self.cache.insert(column, row, cost);
        log::debug!("Scored pair ({}, {}) = {}", row, column, cost);
        cost
    }

    /// Bounds-checked variant of [`align`](Self::align) over a sequence list.
    pub fn align_indexed(
        &mut self,
        sequences: &[Sequence],
        row: usize,
        column: usize,
    ) -> AlignResult<Cost> {
        check_index(row, sequences.len())?;
        check_index(column, sequences.len())?;
        Ok(self.align(&sequences[row], &sequences[column], row, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignError;
    use crate::types::{MATCH_COST, SUB_COST};

    fn seq(id: &str, data: &str) -> Sequence {
        Sequence::new(id, data)
    }

    #[test]
    fn test_self_cell_is_zero_and_uncached() {
        let mut engine = ScoreMatrixEngine::default();
        let s = seq("a", "ACGTTT");
        assert_eq!(engine.align(&s, &s, 3, 3), 0);
        assert!(engine.cache().is_empty());
        assert_eq!(engine.computed(), 0);
    }

    #[test]
    fn test_indel_run_against_empty() {
        assert_eq!(alignment_cost(b"AAAA", b"", 5000, TieBreak::TopFirst), 4 * INDEL_COST);
        assert_eq!(alignment_cost(b"", b"AAAA", 5000, TieBreak::TopFirst), 20);
        assert_eq!(alignment_cost(b"", b"", 5000, TieBreak::TopFirst), 0);
    }

    #[test]
    fn test_exact_match_collapses_cost() {
        let mut engine = ScoreMatrixEngine::default();
        let cost = engine.align(&seq("a", "ACGT"), &seq("b", "ACGT"), 0, 1);
        assert_eq!(cost, 4 * MATCH_COST);
        assert_eq!(cost, -12);
    }

    #[test]
    fn test_single_substitution() {
        // Three matches and one substitution beat any indel path.
        let cost = alignment_cost(b"ACGT", b"ACCT", 5000, TieBreak::TopFirst);
        assert_eq!(cost, 3 * MATCH_COST + SUB_COST);
    }

    #[test]
    fn test_single_deletion() {
        let cost = alignment_cost(b"ACGT", b"ACT", 5000, TieBreak::TopFirst);
        assert_eq!(cost, 3 * MATCH_COST + INDEL_COST);
    }

    #[test]
    fn test_cost_is_independent_of_tie_break() {
        let pairs: [(&[u8], &[u8]); 3] = [
            (b"GATTACA", b"GCATGCU"),
            (b"AAAAAA", b"AAA"),
            (b"ACGTACGTTT", b"TTTACGACG"),
        ];
        for (a, b) in pairs {
            assert_eq!(
                alignment_cost(a, b, 5000, TieBreak::TopFirst),
                alignment_cost(a, b, 5000, TieBreak::LeftFirst)
            );
        }
    }

    #[test]
    fn test_cache_hit_returns_same_cost_and_skips_dp() {
        let mut engine = ScoreMatrixEngine::default();
        let a = seq("a", "GATTACA");
        let b = seq("b", "GCATGCU");

        let first = engine.align(&a, &b, 0, 1);
        let second = engine.align(&a, &b, 0, 1);
        let mirrored = engine.align(&b, &a, 1, 0);

        assert_eq!(first, second);
        assert_eq!(first, mirrored);
        assert_eq!(engine.computed(), 1);
        assert_eq!(engine.cache().get(1, 0), Some(first));
        assert_eq!(engine.cache().stats().hits, 2);
    }

    #[test]
    fn test_mirrored_cell_first_populates_both_orderings() {
        let mut engine = ScoreMatrixEngine::default();
        let a = seq("a", "GATTACA");
        let b = seq("b", "GCATGCU");

        let mirrored = engine.align(&b, &a, 4, 2);
        assert_eq!(engine.cache().get(2, 4), Some(mirrored));
        assert_eq!(engine.align(&a, &b, 2, 4), mirrored);
        assert_eq!(engine.computed(), 1);
        assert_eq!(engine.cache().stats().hits, 1);
    }

    #[test]
    fn test_truncation_ignores_tail() {
        let base = "ACGT".repeat(10);
        let longer = format!("{}GGGG", base);
        let partner = "ACGA".repeat(9);
        assert_eq!(
            alignment_cost(base.as_bytes(), partner.as_bytes(), 40, TieBreak::TopFirst),
            alignment_cost(longer.as_bytes(), partner.as_bytes(), 40, TieBreak::TopFirst)
        );
    }

    #[test]
    fn test_reset_clears_cache() {
        let mut engine = ScoreMatrixEngine::default();
        engine.align(&seq("a", "AC"), &seq("b", "AG"), 0, 1);
        assert_eq!(engine.cache().len(), 1);
        engine.reset();
        assert!(engine.cache().is_empty());
        assert_eq!(engine.computed(), 0);
    }

    #[test]
    fn test_align_indexed_rejects_out_of_range() {
        let mut engine = ScoreMatrixEngine::default();
        let sequences = vec![seq("a", "AC"), seq("b", "AG")];
        assert!(engine.align_indexed(&sequences, 0, 1).is_ok());
        assert!(matches!(
            engine.align_indexed(&sequences, 0, 2),
            Err(AlignError::IndexOutOfRange { index: 2, count: 2 })
        ));
        assert!(matches!(
            engine.align_indexed(&sequences, 5, 0),
            Err(AlignError::IndexOutOfRange { index: 5, count: 2 })
        ));
    }
}
