//! pairdist Core Library
//!
//! All-pairs alignment cost matrix, memoized per unordered pair, plus
//! single-pair traceback for a selected cell.

pub mod types;
pub mod error;
pub mod config;
pub mod cache;
pub mod score;
pub mod trace;
pub mod aligned;
pub mod matrix;
pub mod fasta;

// Re-export commonly used types and functions
pub use aligned::{AlignedPair, AlignmentStats};
pub use cache::{CacheStats, ConcurrentCostCache, PairKey, SymmetricCostCache};
pub use config::EngineConfig;
pub use error::{AlignError, AlignResult};
pub use fasta::FastaProvider;
pub use matrix::{
    CancelToken, DisplaySurface, DistanceMatrix, FillObserver, FillSummary, MatrixOrchestrator,
    SequenceProvider,
};
pub use score::{alignment_cost, ScoreMatrixEngine};
pub use trace::{AlignmentTraceEngine, DecisionNode, Trace};
pub use types::{Cost, Move, Sequence, TieBreak};

/// Version information for the pairdist core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
