use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot taken after one successful cut.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PartitionRecord {
    pub(crate) cut_number: u32,
    pub(crate) total_components: u32,
    pub(crate) margin_percent: u32,
    pub(crate) component_vertices: BTreeMap<u32, Vec<u32>>,
    pub(crate) balanced: bool,
    pub(crate) split_component: u32,
    pub(crate) sizes: (usize, usize),
    pub(crate) removed_edges: Vec<(u32, u32)>,
}

impl PartitionRecord {
    /// 1-based index of the cut.
    pub fn cut_number(&self) -> u32 {
        self.cut_number
    }

    pub fn total_components(&self) -> u32 {
        self.total_components
    }

    pub fn margin_percent(&self) -> u32 {
        self.margin_percent
    }

    /// Vertices of every component after the cut, keyed by component id.
    pub fn component_vertices(&self) -> &BTreeMap<u32, Vec<u32>> {
        &self.component_vertices
    }

    /// Always true: only cuts that met the margin are recorded.
    pub fn balanced(&self) -> bool {
        self.balanced
    }

    /// Id the split component had before the cut.
    pub fn split_component(&self) -> u32 {
        self.split_component
    }

    /// Sizes of the grown and remainder sides.
    pub fn sizes(&self) -> (usize, usize) {
        self.sizes
    }

    /// Edges deleted by this cut, each as `(lower, higher)` and sorted.
    pub fn removed_edges(&self) -> &[(u32, u32)] {
        &self.removed_edges
    }
}

/// Everything a partitioning run produced.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PartitioningOutcome {
    pub(crate) records: Vec<PartitionRecord>,
    pub(crate) cuts_requested: u32,
    pub(crate) original_adjacency: Vec<Vec<u32>>,
    pub(crate) final_adjacency: Vec<Vec<u32>>,
}

impl PartitioningOutcome {
    /// One record per successful cut, in cut order.
    pub fn records(&self) -> &[PartitionRecord] {
        &self.records
    }

    /// Adjacency before the first cut.
    pub fn original_adjacency(&self) -> &[Vec<u32>] {
        &self.original_adjacency
    }

    /// Adjacency after the last successful cut.
    pub fn final_adjacency(&self) -> &[Vec<u32>] {
        &self.final_adjacency
    }

    pub fn cuts_requested(&self) -> u32 {
        self.cuts_requested
    }

    pub fn successful_cuts(&self) -> u32 {
        self.records.len() as u32
    }

    /// Whether every requested cut succeeded.
    pub fn is_complete(&self) -> bool {
        self.successful_cuts() == self.cuts_requested
    }

    /// Total number of edges deleted across all cuts.
    pub fn cut_edge_count(&self) -> usize {
        self.records.iter().map(|r| r.removed_edges.len()).sum()
    }

    /// Adjacency of one component after the last cut, restricted to its own vertices.
    pub fn component_adjacency(&self, component: u32) -> Option<BTreeMap<u32, Vec<u32>>> {
        let vertices = self.records.last()?.component_vertices.get(&component)?;
        Some(
            vertices
                .iter()
                .map(|&vx| (vx, self.final_adjacency[vx as usize].clone()))
                .collect(),
        )
    }
}
