//! Error types surfaced by graph construction and partitioning.

use thiserror::Error;

/// The adjacency handed to the partitioner violates the graph invariants.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphStructureError {
    /// A vertex id was negative.
    #[error("vertex id {id} is negative")]
    NegativeVertex {
        /// The offending raw id.
        id: i64,
    },
    /// An edge endpoint is not smaller than the vertex count.
    #[error("vertex id {id} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending id.
        id: u64,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// An edge connects a vertex to itself.
    #[error("self-loop on vertex {vertex}")]
    SelfLoop {
        /// The vertex carrying the loop.
        vertex: u32,
    },
    /// A neighbour appears twice in one adjacency list.
    #[error("edge {src} -> {dst} is listed more than once")]
    DuplicateEdge {
        /// Vertex whose list repeats the neighbour.
        src: u32,
        /// The repeated neighbour.
        dst: u32,
    },
    /// `src` lists `dst` as a neighbour but not the other way round.
    #[error("edge {src} -> {dst} has no reverse entry")]
    AsymmetricAdjacency {
        /// Vertex whose list contains the edge.
        src: u32,
        /// Vertex missing the reverse entry.
        dst: u32,
    },
}

/// An error returned by [`crate::run_partitioning`] before any cut is attempted.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PartitionError {
    /// Margin percentage must lie in `0..=100`.
    #[error("margin must be between 0 and 100 percent (got {got})")]
    InvalidMargin {
        /// The rejected margin.
        got: u32,
    },
    /// The graph failed validation.
    #[error(transparent)]
    Structure(#[from] GraphStructureError),
}
