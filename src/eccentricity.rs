use crate::Graph;
use std::collections::VecDeque;

const UNREACHED: u32 = u32::MAX;

/// Result of searching one component for its graph center.
///
/// Owns the per-vertex eccentricities computed along the way; bisection and balancing of
/// the same cut rank vertices by them.
#[derive(Clone, Debug)]
pub struct CenterSearch {
    /// Component that was searched.
    pub component: u32,
    /// Vertex of minimum eccentricity, lowest id on ties.
    pub center: u32,
    /// Eccentricity per vertex id. Vertices outside the component hold 0.
    eccentricities: Vec<u32>,
    size: usize,
}

impl CenterSearch {
    #[inline]
    pub fn eccentricity(&self, vx: u32) -> u32 {
        self.eccentricities[vx as usize]
    }

    /// Eccentricity of the center, i.e. the radius of the component.
    #[inline]
    pub fn radius(&self) -> u32 {
        self.eccentricity(self.center)
    }

    /// Number of vertices in the searched component.
    #[inline]
    pub fn component_size(&self) -> usize {
        self.size
    }
}

/// Reusable breadth first search buffers. `dist` is restored to `UNREACHED` after every run
/// so a search costs time proportional to the component, not the whole graph.
struct Frontier {
    dist: Vec<u32>,
    queue: VecDeque<u32>,
    touched: Vec<u32>,
}

impl Frontier {
    fn new(vertex_count: usize) -> Self {
        Self {
            dist: vec![UNREACHED; vertex_count],
            queue: VecDeque::new(),
            touched: Vec::new(),
        }
    }

    /// Runs a unit-weight search from `source` and returns the largest distance reached.
    fn eccentricity(&mut self, graph: &Graph, source: u32) -> u32 {
        for &vx in self.touched.iter() {
            self.dist[vx as usize] = UNREACHED;
        }
        self.touched.clear();
        self.queue.clear();

        self.dist[source as usize] = 0;
        self.touched.push(source);
        self.queue.push_back(source);

        let mut max_dist = 0;
        while let Some(vx) = self.queue.pop_front() {
            let d = self.dist[vx as usize];
            max_dist = max_dist.max(d);
            for &n in graph.neighbours(vx) {
                if self.dist[n as usize] == UNREACHED {
                    self.dist[n as usize] = d + 1;
                    self.touched.push(n);
                    self.queue.push_back(n);
                }
            }
        }
        max_dist
    }
}

impl Graph {
    /// Shortest unit-weight distances from `source`. Vertices in other components are `None`.
    pub fn distances_from(&self, source: u32) -> Vec<Option<u32>> {
        let mut frontier = Frontier::new(self.vertices.len());
        frontier.eccentricity(self, source);
        frontier
            .dist
            .into_iter()
            .map(|d| (d != UNREACHED).then_some(d))
            .collect()
    }

    /// Largest shortest-path distance from `source` to any vertex it can reach.
    pub fn eccentricity(&self, source: u32) -> u32 {
        Frontier::new(self.vertices.len()).eccentricity(self, source)
    }

    /// Finds the vertex of `component` with the smallest eccentricity, preferring the lowest
    /// id on ties. Returns `None` if the component has no vertices.
    pub fn find_center(&self, component: u32) -> Option<CenterSearch> {
        let mut frontier = Frontier::new(self.vertices.len());
        let mut eccentricities = vec![0; self.vertices.len()];
        let mut best: Option<(u32, u32)> = None;
        let mut size = 0;

        for vx in 0..self.vertices.len() as u32 {
            if self.vertices[vx as usize].component != component {
                continue;
            }
            size += 1;

            let ecc = frontier.eccentricity(self, vx);
            eccentricities[vx as usize] = ecc;
            if best.map_or(true, |(_, best_ecc)| ecc < best_ecc) {
                best = Some((vx, ecc));
            }
        }

        let (center, radius) = best?;
        log::trace!("component {component}: center {center} with eccentricity {radius}");
        Some(CenterSearch {
            component,
            center,
            eccentricities,
            size,
        })
    }
}
