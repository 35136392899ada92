use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreakError {
    #[error("Malformed element stream at index {index}: {reason}.")]
    Structural { index: usize, reason: &'static str },
    #[error("Generic breaking error: {0}")]
    Generic(String),
}

pub mod active_set;
pub mod candidate;
pub mod driver;
pub mod evaluator;
pub mod flow;
pub mod policy;
pub mod progress;
pub mod sync;

pub use self::active_set::ActiveSet;
pub use self::candidate::{Candidate, CandidateArena, CandidateId, Fitness};
pub use self::driver::{BreakOutcome, PartBoundary, StreamDriver};
pub use self::evaluator::{Alternative, BreakEvaluator, INFINITE_RATIO, adjustment_ratio};
pub use self::flow::{FlowBreaker, FlowItem, FlowOutcome, Paragraph};
pub use self::policy::{CapacityTable, ClassKey, LevelPolicy, LinePolicy, PagePolicy};
pub use self::progress::Progress;
pub use self::sync::{StreamSynchronizer, SyncBlock, SyncOptions, combined_elements};

#[cfg(test)]
mod evaluator_test;
