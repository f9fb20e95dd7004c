//! TraversalError: unified error type for lazygraph public APIs
//!
//! Every fallible operation of a strategy returns this type. Errors are fatal for
//! the run that produced them: the strategy is left exhausted and must be
//! restarted with `start_from`. Vertex values are rendered with `Debug` into the
//! payload so the error stays independent of the vertex type.

use static_assertions::assert_impl_all;
use thiserror::Error;

/// Unified error type for traversal operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraversalError {
    /// A pull was attempted before `start_from` was called.
    #[error("traversal has not been started: call start_from first")]
    NotStarted,
    /// An operation is not valid in the current state or with the chosen options.
    #[error("invalid usage: {0}")]
    InvalidUsage(&'static str),
    /// An acyclic order was requested but the graph contains a cycle.
    #[error("graph contains a cycle: {cycle}")]
    CycleDetected {
        /// The closed walk from a start vertex back to the repeated vertex.
        cycle: String,
    },
    /// More vertices would be expanded than the calculation limit allows.
    #[error("calculation limit of {limit} expanded vertices exceeded")]
    CalculationLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A distance sum reached the configured infinity or overflowed the weight type.
    #[error("distance overflow: {0}")]
    DistanceOverflow(String),
    /// A weight below zero was offered where non-negative weights are required.
    #[error("negative edge weight {0} (weights must be non-negative)")]
    NegativeWeight(String),
    /// A requested vertex was not reached before the traversal was exhausted.
    #[error("vertex not found: {0}")]
    VertexNotFound(String),
    /// No path has been stored for the vertex.
    #[error("no path stored for vertex {0}")]
    NoPath(String),
    /// Bidirectional search finished without the two sides meeting.
    #[error("no path from the start vertices to the goal vertices")]
    NoMeeting,
    /// A container failed its self-check.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl TraversalError {
    /// `true` for errors caused by calling the API wrongly rather than by the graph.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::NotStarted | Self::InvalidUsage(_))
    }
}

assert_impl_all!(TraversalError: Send, Sync, Clone, std::error::Error);
