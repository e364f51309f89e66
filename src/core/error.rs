use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur while building or solving a matching request
///
/// Every variant is scoped to the request that produced it; the skill filter
/// is never touched by the matching path.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Allocation failed for {context}: {source}")]
    Allocation {
        context: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("Node out of range: {kind} index {index} (count {count})")]
    NodeOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error("Invalid edge weight: {0} (must be at most 100)")]
    InvalidWeight(u8),

    #[error("Matrix size overflow: {rows}x{cols}")]
    SizeOverflow { rows: usize, cols: usize },

    #[error("Assignment solver invariant broken: {0}")]
    SolverInvariant(&'static str),
}

impl MatchError {
    pub(crate) fn allocation(context: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| MatchError::Allocation { context, source }
    }
}
