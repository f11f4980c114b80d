// Repeated balanced bisection of undirected graphs.
//
// Every cut picks a connected component, seeds it at its graph center, grows one side
// farthest-first, repairs the other side's connectivity and migrates vertices until both
// sides fit inside the requested margin. The split is committed by deleting the edges
// between the two sides.

mod balance;
mod bisection;
mod components;
mod driver;
mod eccentricity;
mod error;
pub mod io;
mod result;

pub use balance::allowed_margin;
pub use bisection::Bisection;
pub use driver::{run_partitioning, DriverState, PartitionDriver, PartitioningConfig};
pub use eccentricity::CenterSearch;
pub use error::{GraphStructureError, PartitionError};
pub use result::{PartitionRecord, PartitioningOutcome};

/// Side of an in-progress bisection a vertex belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Group {
    /// Not part of the bisection currently being attempted.
    #[default]
    Unassigned,
    /// Grown from the component center.
    Grown,
    /// Everything the growth did not reach.
    Remainder,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct GraphVertex {
    pub(crate) neighbours: Vec<u32>,
    pub(crate) component: u32,
    pub(crate) group: Group,
}

/// An undirected, unweighted graph over the dense vertex ids `0..vertex_count`.
///
/// Adjacency is kept symmetric and free of duplicates and self-loops. Vertices are never
/// removed; partitioning only deletes edges.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub(crate) vertices: Vec<GraphVertex>,
    pub(crate) component_count: u32,
}

impl Graph {
    /// Creates a graph with `vertex_count` isolated vertices, each its own component.
    pub fn new(vertex_count: usize) -> Self {
        let vertices = (0..vertex_count as u32)
            .map(|vx| GraphVertex {
                component: vx,
                ..GraphVertex::default()
            })
            .collect();
        Self {
            vertices,
            component_count: vertex_count as u32,
        }
    }

    /// Builds a graph from an edge list and labels its components. Repeated edges collapse
    /// into one.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self, GraphStructureError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut graph = Self::new(vertex_count);
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        graph.label_components();
        Ok(graph)
    }

    /// Converts an id read from an external source into a vertex of this graph.
    pub fn vertex_id(&self, raw: i64) -> Result<u32, GraphStructureError> {
        if raw < 0 {
            return Err(GraphStructureError::NegativeVertex { id: raw });
        }
        self.check_vertex(raw as u64)?;
        Ok(raw as u32)
    }

    fn check_vertex(&self, id: u64) -> Result<(), GraphStructureError> {
        if id >= self.vertices.len() as u64 {
            return Err(GraphStructureError::VertexOutOfRange {
                id,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(|v| v.neighbours.len()).sum::<usize>() / 2
    }

    #[inline]
    pub fn neighbours(&self, vx: u32) -> &[u32] {
        &self.vertices[vx as usize].neighbours
    }

    /// Component id of `vx` as of the last labeling.
    #[inline]
    pub fn component(&self, vx: u32) -> u32 {
        self.vertices[vx as usize].component
    }

    /// Number of components found by the last labeling.
    #[inline]
    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    #[inline]
    pub fn group(&self, vx: u32) -> Group {
        self.vertices[vx as usize].group
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.neighbours(a).contains(&b)
    }

    /// Inserts the undirected edge `a - b`. Inserting an existing edge is a no-op.
    ///
    /// Component ids keep their last labeling until [`Graph::label_components`] runs again.
    pub fn add_edge(&mut self, a: u32, b: u32) -> Result<(), GraphStructureError> {
        self.check_vertex(a as u64)?;
        self.check_vertex(b as u64)?;
        if a == b {
            return Err(GraphStructureError::SelfLoop { vertex: a });
        }
        if !self.has_edge(a, b) {
            self.vertices[a as usize].neighbours.push(b);
            self.vertices[b as usize].neighbours.push(a);
        }
        Ok(())
    }

    /// Deletes the undirected edge `a - b`, returning whether it existed.
    pub fn remove_edge(&mut self, a: u32, b: u32) -> bool {
        let Some(pos) = self.neighbours(a).iter().position(|&n| n == b) else {
            return false;
        };
        self.vertices[a as usize].neighbours.swap_remove(pos);
        if let Some(pos) = self.neighbours(b).iter().position(|&n| n == a) {
            self.vertices[b as usize].neighbours.swap_remove(pos);
        }
        true
    }

    /// Copy of the adjacency lists, each sorted ascending.
    pub fn adjacency(&self) -> Vec<Vec<u32>> {
        self.vertices
            .iter()
            .map(|v| {
                let mut list = v.neighbours.clone();
                list.sort_unstable();
                list
            })
            .collect()
    }

    /// Checks every adjacency invariant: ids in range, no self-loops, no duplicates, symmetry.
    pub fn validate(&self) -> Result<(), GraphStructureError> {
        for (src, v) in self.vertices.iter().enumerate() {
            let src = src as u32;
            let mut seen = v.neighbours.clone();
            seen.sort_unstable();
            for pair in seen.windows(2) {
                if pair[0] == pair[1] {
                    return Err(GraphStructureError::DuplicateEdge { src, dst: pair[0] });
                }
            }
            for &dst in v.neighbours.iter() {
                self.check_vertex(dst as u64)?;
                if dst == src {
                    return Err(GraphStructureError::SelfLoop { vertex: src });
                }
                if !self.has_edge(dst, src) {
                    return Err(GraphStructureError::AsymmetricAdjacency { src, dst });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn set_group(&mut self, vx: u32, group: Group) {
        self.vertices[vx as usize].group = group;
    }

    pub(crate) fn reset_groups(&mut self) {
        for v in self.vertices.iter_mut() {
            v.group = Group::Unassigned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_is_symmetric_and_idempotent() {
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(1, 0).unwrap();
        graph.add_edge(1, 2).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.adjacency(), vec![vec![1], vec![0, 2], vec![1]]);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_edges() {
        let mut graph = Graph::new(3);
        assert_eq!(
            graph.add_edge(0, 3),
            Err(GraphStructureError::VertexOutOfRange { id: 3, vertex_count: 3 })
        );
        assert_eq!(graph.add_edge(2, 2), Err(GraphStructureError::SelfLoop { vertex: 2 }));
        assert_eq!(graph.vertex_id(-1), Err(GraphStructureError::NegativeVertex { id: -1 }));
        assert_eq!(graph.vertex_id(2), Ok(2));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_edge_deletes_both_directions() {
        let mut graph = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
        assert!(graph.remove_edge(2, 1));
        assert!(!graph.remove_edge(1, 2));
        assert!(!graph.has_edge(1, 2));
        assert!(!graph.has_edge(2, 1));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn validate_detects_asymmetry() {
        let mut graph = Graph::new(2);
        graph.vertices[0].neighbours.push(1);
        assert_eq!(
            graph.validate(),
            Err(GraphStructureError::AsymmetricAdjacency { src: 0, dst: 1 })
        );

        graph.vertices[1].neighbours.push(0);
        graph.vertices[1].neighbours.push(0);
        assert_eq!(graph.validate(), Err(GraphStructureError::DuplicateEdge { src: 1, dst: 0 }));
    }

    #[test]
    fn built_graphs_are_labeled() {
        let graph = Graph::new(3);
        assert_eq!(graph.component_count(), 3);
        assert_eq!(graph.component_sizes(), vec![1, 1, 1]);

        let graph = Graph::from_edges(4, [(0, 1), (2, 3)]).unwrap();
        assert_eq!(graph.component_count(), 2);
        assert_eq!(graph.component_sizes(), vec![2, 2]);
        assert_eq!(graph.find_center(0).unwrap().component_size(), 2);
        assert!(graph.find_center(2).is_none());
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = Graph::default();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.validate().is_ok());
    }
}
