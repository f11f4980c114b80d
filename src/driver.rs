use crate::{
    allowed_margin, Bisection, Graph, Group, PartitionError, PartitionRecord, PartitioningOutcome,
};
use std::collections::BTreeMap;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PartitioningConfig {
    /// How many cuts to attempt. Every cut splits one component in two.
    pub num_cuts: u32,
    /// Largest allowed size difference between the two sides of a cut, as a percentage of
    /// the size of the component being cut. Must be at most 100.
    pub margin_percent: u32,
}

impl Default for PartitioningConfig {
    fn default() -> Self {
        Self {
            num_cuts: 1,
            margin_percent: 10,
        }
    }
}

impl PartitioningConfig {
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.margin_percent > 100 {
            return Err(PartitionError::InvalidMargin {
                got: self.margin_percent,
            });
        }
        Ok(())
    }
}

/// Progress of a [`PartitionDriver`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DriverState {
    /// Nothing has been done yet.
    Idle,
    /// Looking for a component that can be cut for the given cut number.
    Splitting(u32),
    /// The given cut has been committed.
    Committed(u32),
    /// No component could be cut; earlier cuts stay committed.
    Failed,
}

/// Runs successive cuts over one graph, holding it exclusively for the whole run.
pub struct PartitionDriver<'g> {
    graph: &'g mut Graph,
    config: PartitioningConfig,
    state: DriverState,
    records: Vec<PartitionRecord>,
    original_adjacency: Vec<Vec<u32>>,
}

impl<'g> PartitionDriver<'g> {
    /// Validates the configuration and the graph. Nothing is mutated if either is rejected.
    pub fn new(graph: &'g mut Graph, config: PartitioningConfig) -> Result<Self, PartitionError> {
        config.validate()?;
        graph.validate()?;
        let original_adjacency = graph.adjacency();
        Ok(Self {
            graph,
            config,
            state: DriverState::Idle,
            records: Vec::new(),
            original_adjacency,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Records of the cuts committed so far.
    pub fn records(&self) -> &[PartitionRecord] {
        &self.records
    }

    pub fn is_finished(&self) -> bool {
        match self.state {
            DriverState::Failed => true,
            DriverState::Committed(cut) => cut >= self.config.num_cuts,
            _ => false,
        }
    }

    /// Performs one state transition and returns the new state.
    pub fn step(&mut self) -> DriverState {
        let next = match self.state {
            DriverState::Idle => {
                let components = self.graph.label_components();
                log::debug!(
                    "starting: {components} components, {} cuts at {}% margin",
                    self.config.num_cuts,
                    self.config.margin_percent
                );
                if self.config.num_cuts == 0 {
                    DriverState::Committed(0)
                } else {
                    DriverState::Splitting(1)
                }
            }
            DriverState::Splitting(cut) => match self.try_cut(cut) {
                Some(record) => {
                    self.records.push(record);
                    DriverState::Committed(cut)
                }
                None => {
                    log::debug!("cut {cut}: no component can be split within the margin");
                    DriverState::Failed
                }
            },
            DriverState::Committed(cut) if cut < self.config.num_cuts => {
                DriverState::Splitting(cut + 1)
            }
            state => state,
        };
        self.state = next;
        next
    }

    /// Steps until the quota is met or a cut fails.
    pub fn run(mut self) -> PartitioningOutcome {
        while !self.is_finished() {
            self.step();
        }

        log::info!(
            "partitioning finished after {} of {} cuts with {} components",
            self.records.len(),
            self.config.num_cuts,
            self.graph.component_count()
        );
        PartitioningOutcome {
            records: self.records,
            cuts_requested: self.config.num_cuts,
            original_adjacency: self.original_adjacency,
            final_adjacency: self.graph.adjacency(),
        }
    }

    /// Tries components by ascending id and commits the first one that splits.
    fn try_cut(&mut self, cut: u32) -> Option<PartitionRecord> {
        let sizes = self.graph.component_sizes();
        for (component, &size) in sizes.iter().enumerate() {
            let component = component as u32;
            if size < 2 {
                continue;
            }
            if let Some(bisection) = self.split(component) {
                return Some(self.commit(bisection, cut));
            }
            self.graph.reset_groups();
            log::debug!("cut {cut}: component {component} ({size} vertices) could not be balanced");
        }
        None
    }

    fn split(&mut self, component: u32) -> Option<Bisection> {
        let search = self.graph.find_center(component)?;
        let mut bisection = self.graph.bisect(&search)?;
        log::debug!(
            "component {component}: center {} (radius {}), grown {} / remainder {}",
            search.center,
            search.radius(),
            bisection.grown.len(),
            bisection.remainder.len()
        );

        self.graph.repair_remainder(&mut bisection);
        let allowed = allowed_margin(self.config.margin_percent, search.component_size());
        self.graph
            .balance(&mut bisection, &search, allowed)
            .then_some(bisection)
    }

    /// Moves the remainder side into a new component, deletes the edges between the sides
    /// and relabels.
    fn commit(&mut self, bisection: Bisection, cut: u32) -> PartitionRecord {
        let graph = &mut *self.graph;
        let new_component = graph.component_count;
        for &vx in bisection.remainder.iter() {
            graph.vertices[vx as usize].component = new_component;
        }

        let mut removed_edges = Vec::new();
        for &vx in bisection.grown.iter() {
            let crossing = graph
                .neighbours(vx)
                .iter()
                .copied()
                .filter(|&n| graph.group(n) == Group::Remainder)
                .collect::<Vec<_>>();
            for n in crossing {
                graph.remove_edge(vx, n);
                removed_edges.push((vx.min(n), vx.max(n)));
            }
        }
        removed_edges.sort_unstable();

        graph.reset_groups();
        let total_components = graph.label_components();
        debug_assert_eq!(total_components, new_component + 1);
        debug_assert!(graph.validate().is_ok());

        let mut component_vertices: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for vx in 0..graph.vertex_count() as u32 {
            component_vertices
                .entry(graph.component(vx))
                .or_default()
                .push(vx);
        }

        log::debug!(
            "cut {cut}: split component {} into {} + {} vertices, removed {} edges",
            bisection.component,
            bisection.grown.len(),
            bisection.remainder.len(),
            removed_edges.len()
        );
        PartitionRecord {
            cut_number: cut,
            total_components,
            margin_percent: self.config.margin_percent,
            component_vertices,
            balanced: true,
            split_component: bisection.component,
            sizes: (bisection.grown.len(), bisection.remainder.len()),
            removed_edges,
        }
    }
}

/// Validates the parameters and runs up to `num_cuts` balanced cuts over `graph`.
///
/// Running out of splittable components is not an error: the outcome then holds fewer
/// records than requested.
pub fn run_partitioning(
    graph: &mut Graph,
    num_cuts: u32,
    margin_percent: u32,
) -> Result<PartitioningOutcome, PartitionError> {
    let config = PartitioningConfig {
        num_cuts,
        margin_percent,
    };
    Ok(PartitionDriver::new(graph, config)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphStructureError;

    #[test]
    fn rejects_margin_above_hundred() {
        let mut graph = Graph::from_edges(2, [(0, 1)]).unwrap();
        let err = run_partitioning(&mut graph, 1, 101).unwrap_err();
        assert_eq!(err, PartitionError::InvalidMargin { got: 101 });
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn rejects_asymmetric_graph() {
        let mut graph = Graph::new(2);
        graph.vertices[1].neighbours.push(0);
        let err = run_partitioning(&mut graph, 1, 10).unwrap_err();
        assert_eq!(
            err,
            PartitionError::Structure(GraphStructureError::AsymmetricAdjacency { src: 1, dst: 0 })
        );
    }

    #[test]
    fn walks_through_states() {
        let mut graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let config = PartitioningConfig {
            num_cuts: 2,
            margin_percent: 0,
        };
        let mut driver = PartitionDriver::new(&mut graph, config).unwrap();

        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.step(), DriverState::Splitting(1));
        assert_eq!(driver.step(), DriverState::Committed(1));
        assert!(!driver.is_finished());
        assert_eq!(driver.step(), DriverState::Splitting(2));
        assert_eq!(driver.step(), DriverState::Committed(2));
        assert!(driver.is_finished());
        assert_eq!(driver.step(), DriverState::Committed(2));
        assert_eq!(driver.records().len(), 2);
    }

    #[test]
    fn commit_records_removed_edges() {
        let mut graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let outcome = run_partitioning(&mut graph, 1, 0).unwrap();

        let record = &outcome.records()[0];
        assert_eq!(record.cut_number(), 1);
        assert_eq!(record.total_components(), 2);
        assert_eq!(record.split_component(), 0);
        assert_eq!(record.sizes(), (2, 2));
        assert_eq!(record.removed_edges(), &[(1, 2)]);
        assert!(record.balanced());
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.group(3), Group::Unassigned);
    }

    #[test]
    fn commit_adds_exactly_one_component() {
        // Two paths of four; only the first is split.
        let mut graph =
            Graph::from_edges(8, [(0, 1), (1, 2), (2, 3), (4, 5), (5, 6), (6, 7)]).unwrap();
        let outcome = run_partitioning(&mut graph, 1, 0).unwrap();

        assert_eq!(outcome.records()[0].total_components(), 3);
        assert_eq!(graph.component_count(), 3);
        assert_eq!(graph.component(0), graph.component(1));
        assert_eq!(graph.component(2), graph.component(3));
        assert_ne!(graph.component(1), graph.component(2));
        assert_eq!(graph.component_sizes(), vec![2, 2, 4]);
    }

    #[test]
    fn failed_cut_leaves_graph_untouched() {
        let mut graph = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
        let outcome = run_partitioning(&mut graph, 1, 0).unwrap();

        assert!(outcome.records().is_empty());
        assert!(!outcome.is_complete());
        assert_eq!(graph.edge_count(), 3);
        assert!((0..3).all(|vx| graph.group(vx) == Group::Unassigned));
    }
}
