use crate::{Graph, Group};
use std::collections::VecDeque;

const UNLABELED: u32 = u32::MAX;

impl Graph {
    /// Assigns every vertex the id of its connected component and returns the number of
    /// components. Ids are handed out as `0, 1, 2, ...` in the order components are first
    /// reached when scanning vertices by ascending id.
    pub fn label_components(&mut self) -> u32 {
        for v in self.vertices.iter_mut() {
            v.component = UNLABELED;
        }

        let mut component = 0u32;
        let mut queue = VecDeque::new();
        for start in 0..self.vertices.len() {
            if self.vertices[start].component != UNLABELED {
                continue;
            }

            self.vertices[start].component = component;
            queue.push_back(start as u32);
            while let Some(vx) = queue.pop_front() {
                for i in 0..self.vertices[vx as usize].neighbours.len() {
                    let n = self.vertices[vx as usize].neighbours[i];
                    if self.vertices[n as usize].component == UNLABELED {
                        self.vertices[n as usize].component = component;
                        queue.push_back(n);
                    }
                }
            }
            component += 1;
        }

        self.component_count = component;
        log::trace!("labeled {component} components");
        component
    }

    /// Number of vertices in every component, indexed by component id.
    pub fn component_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.component_count as usize];
        for v in self.vertices.iter() {
            sizes[v.component as usize] += 1;
        }
        sizes
    }

    /// Vertices of `component` in ascending order.
    pub fn component_vertices(&self, component: u32) -> Vec<u32> {
        (0..self.vertices.len() as u32)
            .filter(|&vx| self.vertices[vx as usize].component == component)
            .collect()
    }

    /// Splits `members` (all tagged `group`) into the connected pieces of the subgraph induced
    /// by `group`. Pieces are ordered by their first member in `members`.
    pub(crate) fn group_pieces(&self, members: &[u32], group: Group) -> Vec<Vec<u32>> {
        let mut visited = vec![false; self.vertices.len()];
        let mut pieces = Vec::new();
        let mut queue = VecDeque::new();

        for &start in members {
            if visited[start as usize] {
                continue;
            }
            visited[start as usize] = true;
            queue.push_back(start);

            let mut piece = Vec::new();
            while let Some(vx) = queue.pop_front() {
                piece.push(vx);
                for &n in self.neighbours(vx) {
                    if !visited[n as usize] && self.vertices[n as usize].group == group {
                        visited[n as usize] = true;
                        queue.push_back(n);
                    }
                }
            }
            pieces.push(piece);
        }
        pieces
    }

    /// Checks whether the vertices tagged `group` stay connected once `removed` is taken out.
    ///
    /// Only the same-group neighbours of `removed` need to reach each other, so the search
    /// stops as soon as all of them have been seen.
    pub(crate) fn group_connected_without(&self, removed: u32, group: Group) -> bool {
        let targets = self
            .neighbours(removed)
            .iter()
            .copied()
            .filter(|&n| self.vertices[n as usize].group == group)
            .collect::<Vec<_>>();

        // A vertex with at most one neighbour in its group cannot be a cut vertex.
        if targets.len() <= 1 {
            return true;
        }

        let mut is_target = vec![false; self.vertices.len()];
        targets.iter().for_each(|&n| is_target[n as usize] = true);

        let mut visited = vec![false; self.vertices.len()];
        visited[removed as usize] = true;
        visited[targets[0] as usize] = true;

        let mut remaining = targets.len() - 1;
        let mut queue = VecDeque::from([targets[0]]);
        while let Some(vx) = queue.pop_front() {
            for &n in self.neighbours(vx) {
                if !visited[n as usize] && self.vertices[n as usize].group == group {
                    visited[n as usize] = true;
                    queue.push_back(n);
                    if is_target[n as usize] {
                        remaining -= 1;
                        if remaining == 0 {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> Graph {
        Graph::from_edges(6, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap()
    }

    #[test]
    fn labels_components_in_discovery_order() {
        let mut graph = Graph::from_edges(6, [(0, 3), (1, 4), (4, 5)]).unwrap();
        assert_eq!(graph.label_components(), 3);

        let labels = (0..6).map(|vx| graph.component(vx)).collect::<Vec<_>>();
        assert_eq!(labels, vec![0, 1, 2, 0, 1, 1]);
        assert_eq!(graph.component_sizes(), vec![2, 3, 1]);
        assert_eq!(graph.component_vertices(1), vec![1, 4, 5]);
    }

    #[test]
    fn labeling_twice_is_stable() {
        let mut graph = two_triangles();
        graph.label_components();
        let first = (0..6).map(|vx| graph.component(vx)).collect::<Vec<_>>();
        graph.label_components();
        let second = (0..6).map(|vx| graph.component(vx)).collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let mut graph = Graph::new(0);
        assert_eq!(graph.label_components(), 0);
        assert!(graph.component_sizes().is_empty());
    }

    #[test]
    fn long_path_is_labeled_without_recursion() {
        let n = 200_000u32;
        let mut graph = Graph::from_edges(n as usize, (1..n).map(|vx| (vx - 1, vx))).unwrap();
        assert_eq!(graph.label_components(), 1);
        assert_eq!(graph.component(n - 1), 0);
    }

    #[test]
    fn group_pieces_follow_induced_edges() {
        let mut graph = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        for vx in [0, 2, 3] {
            graph.set_group(vx, Group::Remainder);
        }
        let pieces = graph.group_pieces(&[0, 2, 3], Group::Remainder);
        assert_eq!(pieces, vec![vec![0], vec![2, 3]]);
    }

    #[test]
    fn detects_cut_vertices_within_group() {
        let mut graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        for vx in 0..3 {
            graph.set_group(vx, Group::Grown);
        }
        // 0 - 1 - 2 inside the group, 3 belongs elsewhere.
        assert!(!graph.group_connected_without(1, Group::Grown));
        assert!(graph.group_connected_without(0, Group::Grown));

        graph.set_group(3, Group::Grown);
        assert!(graph.group_connected_without(1, Group::Grown));
    }
}
