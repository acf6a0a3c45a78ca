//! All-pairs matrix fill and cell selection
//!
//! The orchestrator reads sequences from a [`SequenceProvider`], scores every
//! ordered (row, column) cell and writes it to a [`DisplaySurface`]. Selecting a
//! cell reruns that one pair through the traceback engine.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aligned::AlignedPair;
use crate::cache::{ConcurrentCostCache, PairKey};
use crate::config::EngineConfig;
use crate::error::{AlignError, AlignResult};
use crate::score::{alignment_cost, ScoreMatrixEngine};
use crate::trace::{AlignmentTraceEngine, Trace};
use crate::types::{Cost, Sequence};

/// Ordered, fixed-size list of sequences. Read-only to the engines.
pub trait SequenceProvider {
    fn sequences(&self) -> &[Sequence];

    fn count(&self) -> usize {
        self.sequences().len()
    }
}

impl SequenceProvider for [Sequence] {
    fn sequences(&self) -> &[Sequence] {
        self
    }
}

impl SequenceProvider for Vec<Sequence> {
    fn sequences(&self) -> &[Sequence] {
        self
    }
}

/// Receives computed costs, e.g. a grid view.
pub trait DisplaySurface {
    fn set_cell(&mut self, column: usize, row: usize, cost: Cost) -> AlignResult<()>;
}

/// Progress reporting and cooperative cancellation for a fill.
///
/// `is_cancelled` is polled between pair computations; a running DP is never
/// interrupted.
#[allow(unused_variables)]
pub trait FillObserver {
    fn on_cell(&mut self, completed: usize, total: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

impl FillObserver for () {}

/// Shared flag for cancelling a fill from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl FillObserver for CancelToken {
    fn is_cancelled(&self) -> bool {
        CancelToken::is_cancelled(self)
    }
}

/// Dense N x N cost matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    size: usize,
    costs: Vec<Cost>,
}

impl DistanceMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            costs: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, column: usize) -> Option<Cost> {
        if row < self.size && column < self.size {
            Some(self.costs[row * self.size + column])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cost]> + '_ {
        // chunks(0) panics, so an empty matrix yields no rows instead
        self.costs.chunks(self.size.max(1)).take(self.size)
    }

    /// True when every cell equals its mirror across the diagonal.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|row| {
            (row + 1..self.size).all(|column| self.get(row, column) == self.get(column, row))
        })
    }
}

impl DisplaySurface for DistanceMatrix {
    fn set_cell(&mut self, column: usize, row: usize, cost: Cost) -> AlignResult<()> {
        if row >= self.size || column >= self.size {
            return Err(AlignError::surface(format!(
                "cell ({}, {}) outside {}x{} matrix",
                row, column, self.size, self.size
            )));
        }
        self.costs[row * self.size + column] = cost;
        Ok(())
    }
}

/// Outcome of one matrix fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillSummary {
    /// Cells written to the surface
    pub cells: usize,
    /// Dynamic programs run
    pub computed: u64,
    /// Cells answered from the cache
    pub cache_hits: u64,
    pub elapsed: Duration,
}

/// Drives the scoring engine over the whole matrix and answers cell selections.
///
/// The cost cache is keyed by sequence index, so it only lives for one fill:
/// every fill starts empty and a different provider never sees stale costs.
#[derive(Debug)]
pub struct MatrixOrchestrator {
    scorer: ScoreMatrixEngine,
    tracer: AlignmentTraceEngine,
}

impl MatrixOrchestrator {
    pub fn new(config: EngineConfig) -> AlignResult<Self> {
        config.validate()?;
        Ok(Self {
            scorer: ScoreMatrixEngine::new(config.clone()),
            tracer: AlignmentTraceEngine::new(config),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.scorer.config()
    }

    pub fn scorer(&self) -> &ScoreMatrixEngine {
        &self.scorer
    }

    /// Fill sequentially or on the rayon pool, as `EngineConfig::parallel` selects.
    pub fn run<P, S, O>(
        &mut self,
        provider: &P,
        surface: &mut S,
        observer: &mut O,
    ) -> AlignResult<FillSummary>
    where
        P: SequenceProvider + Sync + ?Sized,
        S: DisplaySurface + ?Sized,
        O: FillObserver + Sync + ?Sized,
    {
        if self.config().parallel {
            self.fill_parallel(provider, surface, observer)
        } else {
            self.fill(provider, surface, observer)
        }
    }

    /// Score every ordered cell in row-major order on the calling thread.
    pub fn fill<P, S, O>(
        &mut self,
        provider: &P,
        surface: &mut S,
        observer: &mut O,
    ) -> AlignResult<FillSummary>
    where
        P: SequenceProvider + ?Sized,
        S: DisplaySurface + ?Sized,
        O: FillObserver + ?Sized,
    {
        let sequences = provider.sequences();
        let n = sequences.len();
        let total = n * n;
        log::info!("Filling {}x{} distance matrix", n, n);

        let start = Instant::now();
        self.scorer.reset();

        let mut completed = 0;
        for row in 0..n {
            for column in 0..n {
                if observer.is_cancelled() {
                    log::info!("Matrix fill cancelled after {} of {} cells", completed, total);
                    return Err(AlignError::Cancelled { completed, total });
                }
                let cost = self
                    .scorer
                    .align(&sequences[row], &sequences[column], row, column);
                surface.set_cell(column, row, cost)?;
                completed += 1;
                observer.on_cell(completed, total);
            }
        }

        let summary = FillSummary {
            cells: completed,
            computed: self.scorer.computed(),
            cache_hits: self.scorer.cache().stats().hits,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Done. {} cells, {} alignments computed, time taken: {:?}",
            summary.cells,
            summary.computed,
            summary.elapsed
        );
        Ok(summary)
    }

    /// Score rows on the rayon pool, then write the surface in row-major order.
    ///
    /// Each unordered pair is computed once across all workers. Cancellation is
    /// checked before each row starts; progress is reported while writing.
    pub fn fill_parallel<P, S, O>(
        &self,
        provider: &P,
        surface: &mut S,
        observer: &mut O,
    ) -> AlignResult<FillSummary>
    where
        P: SequenceProvider + Sync + ?Sized,
        S: DisplaySurface + ?Sized,
        O: FillObserver + Sync + ?Sized,
    {
        let sequences = provider.sequences();
        let n = sequences.len();
        let total = n * n;
        let cap = self.config().score_cap;
        let tie_break = self.config().tie_break;
        log::info!(
            "Filling {}x{} distance matrix on {} threads",
            n,
            n,
            rayon::current_num_threads()
        );

        let start = Instant::now();
        let cache = ConcurrentCostCache::new();
        let watcher: &O = observer;

        let rows: Vec<Option<Vec<Cost>>> = (0..n)
            .into_par_iter()
            .map(|row| {
                if watcher.is_cancelled() {
                    return None;
                }
                let costs = (0..n)
                    .map(|column| match PairKey::new(row, column) {
                        None => 0,
                        Some(key) => {
                            cache
                                .get_or_compute(key, || {
                                    alignment_cost(
                                        sequences[row].as_bytes(),
                                        sequences[column].as_bytes(),
                                        cap,
                                        tie_break,
                                    )
                                })
                                .0
                        }
                    })
                    .collect();
                Some(costs)
            })
            .collect();

        if rows.iter().any(Option::is_none) {
            let completed = rows.iter().flatten().count() * n;
            log::info!("Matrix fill cancelled after {} of {} cells", completed, total);
            return Err(AlignError::Cancelled { completed, total });
        }

        let mut completed = 0;
        for (row, costs) in rows.into_iter().flatten().enumerate() {
            for (column, cost) in costs.into_iter().enumerate() {
                surface.set_cell(column, row, cost)?;
                completed += 1;
                observer.on_cell(completed, total);
            }
        }

        let stats = cache.stats();
        let summary = FillSummary {
            cells: total,
            computed: stats.misses,
            cache_hits: stats.hits,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Done. {} cells, {} alignments computed, time taken: {:?}",
            summary.cells,
            summary.computed,
            summary.elapsed
        );
        Ok(summary)
    }

    /// Trace the pair behind a selected cell.
    pub fn trace<P>(&self, provider: &P, row: usize, column: usize) -> AlignResult<Trace>
    where
        P: SequenceProvider + ?Sized,
    {
        self.tracer.trace_indexed(provider.sequences(), row, column)
    }

    /// Respond to a cell selection with the two aligned strings.
    pub fn select<P>(&self, provider: &P, row: usize, column: usize) -> AlignResult<AlignedPair>
    where
        P: SequenceProvider + ?Sized,
    {
        let aligned = self.trace(provider, row, column)?.aligned();
        log::debug!("Selected cell ({}, {}) with cost {}", row, column, aligned.cost);
        Ok(aligned)
    }
}
