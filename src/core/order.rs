//! Level-peeling topological sort.
//!
//! Each iteration removes every entity whose dependencies have all been
//! emitted ("a wave"). Waves are sorted by entity name so the output is
//! reproducible. The loop runs at most once per node; a wave that comes up
//! empty while nodes remain means the graph has a cycle.

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use tracing::debug;

use super::graph::EntityGraph;
use crate::error::{Error, Result};

/// Waves of node indices in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedEntities {
    pub waves: Vec<Vec<NodeIndex>>,
}

impl SortedEntities {
    pub fn order(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.waves.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.waves.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

pub fn wave_sort(entities: &EntityGraph) -> Result<SortedEntities> {
    let graph = entities.graph();
    let node_count = graph.node_count();

    // Working copy: number of dependencies not yet emitted, per node.
    let mut pending: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.neighbors_directed(idx, Direction::Outgoing).count())
        .collect();
    let mut emitted = vec![false; node_count];
    let mut remaining = node_count;
    let mut waves = Vec::new();

    for _ in 0..node_count {
        if remaining == 0 {
            break;
        }

        let mut wave: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|idx| !emitted[idx.index()] && pending[idx.index()] == 0)
            .collect();

        if wave.is_empty() {
            return Err(cycle_error(entities, &emitted));
        }

        wave.sort_by(|a, b| graph[*a].name.cmp(&graph[*b].name));

        for &leaf in &wave {
            emitted[leaf.index()] = true;
            for dependent in graph.neighbors_directed(leaf, Direction::Incoming) {
                pending[dependent.index()] -= 1;
            }
        }
        remaining -= wave.len();

        debug!(
            wave = waves.len(),
            size = wave.len(),
            remaining,
            "peeled wave"
        );
        waves.push(wave);
    }

    if remaining > 0 {
        return Err(cycle_error(entities, &emitted));
    }

    Ok(SortedEntities { waves })
}

fn cycle_error(entities: &EntityGraph, emitted: &[bool]) -> Error {
    let graph = entities.graph();

    let mut unresolved: Vec<String> = graph
        .node_indices()
        .filter(|idx| !emitted[idx.index()])
        .map(|idx| graph[idx].name.clone())
        .collect();
    unresolved.sort();

    let mut cycles: Vec<Vec<String>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 && component.iter().all(|idx| !emitted[idx.index()])
        })
        .map(|component| {
            let mut names: Vec<String> = component
                .into_iter()
                .map(|idx| graph[idx].name.clone())
                .collect();
            names.sort();
            names
        })
        .collect();
    cycles.sort();

    Error::CyclicDependency { unresolved, cycles }
}
