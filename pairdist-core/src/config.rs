//! Engine configuration
//!
//! Truncation caps and tie-break order are fixed per engine instance. The cost
//! constants live in [`crate::types`] and are not configurable.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, AlignResult};
use crate::types::TieBreak;

/// Residues compared per sequence by the cost-only engine.
pub const DEFAULT_SCORE_CAP: usize = 5000;
/// Residues compared per sequence by the traceback engine.
pub const DEFAULT_TRACE_CAP: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Characters beyond this many are ignored when scoring a pair
    pub score_cap: usize,
    /// Characters beyond this many are ignored when tracing a pair
    pub trace_cap: usize,
    /// Preference among equal-cost predecessors, shared by both engines
    pub tie_break: TieBreak,
    /// Fill the matrix on the rayon pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_cap: DEFAULT_SCORE_CAP,
            trace_cap: DEFAULT_TRACE_CAP,
            tie_break: TieBreak::default(),
            parallel: false,
        }
    }
}

impl EngineConfig {
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_caps(mut self, score_cap: usize, trace_cap: usize) -> Self {
        self.score_cap = score_cap;
        self.trace_cap = trace_cap;
        self
    }

    pub fn validate(&self) -> AlignResult<()> {
        if self.score_cap == 0 {
            return Err(AlignError::invalid_config("score_cap must be positive"));
        }
        if self.trace_cap == 0 {
            return Err(AlignError::invalid_config("trace_cap must be positive"));
        }
        Ok(())
    }
}
