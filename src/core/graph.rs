use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::naming::FileKind;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub file_path: PathBuf,
    pub kind: FileKind,
}

impl Entity {
    pub fn new(name: String, file_path: PathBuf, kind: FileKind) -> Self {
        Self {
            name,
            file_path,
            kind,
        }
    }
}

/// Edge from a dependent entity to the entity it depends on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Import that introduced the edge
    pub module: String,
}

pub type DependencyGraph = Graph<Entity, DependencyEdge, Directed>;

/// Filtered dependency graph over the tracked entities. Edges point from
/// dependent to dependency; there are no self-loops and no parallel edges.
#[derive(Debug, Clone)]
pub struct EntityGraph {
    graph: DependencyGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl EntityGraph {
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.index_of(name).map(|idx| &self.graph[idx])
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Direct dependencies of `name`, sorted.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let Some(idx) = self.index_of(name) else {
            return Vec::new();
        };
        let mut deps: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|dep| self.graph[dep].name.as_str())
            .collect();
        deps.sort_unstable();
        deps
    }

    pub fn depends_on(&self, dependent: &str, dependency: &str) -> bool {
        match (self.index_of(dependent), self.index_of(dependency)) {
            (Some(from), Some(to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Every `(dependent, dependency)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                self.graph[edge.target()].name.as_str(),
            )
        })
    }
}

pub struct GraphBuilder {
    graph: DependencyGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Register a tracked entity. Registering the same file twice is a no-op;
    /// a second file claiming the same name is an error.
    pub fn add_entity(&mut self, entity: Entity) -> Result<NodeIndex> {
        if let Some(&existing) = self.node_map.get(&entity.name) {
            let first = &self.graph[existing].file_path;
            if *first == entity.file_path {
                return Ok(existing);
            }
            return Err(Error::DuplicateEntity {
                entity: entity.name,
                first: first.clone(),
                second: entity.file_path,
            });
        }

        let name = entity.name.clone();
        let index = self.graph.add_node(entity);
        self.node_map.insert(name, index);
        Ok(index)
    }

    /// Record that `dependent` depends on `dependency`. Returns `None` when
    /// either side is untracked, when both are the same entity, or when the
    /// edge already exists.
    pub fn add_dependency(
        &mut self,
        dependent: &str,
        dependency: &str,
        module: &str,
    ) -> Option<EdgeIndex> {
        if dependent == dependency {
            return None;
        }
        let source_idx = *self.node_map.get(dependent)?;
        let target_idx = *self.node_map.get(dependency)?;
        if self.graph.find_edge(source_idx, target_idx).is_some() {
            return None;
        }
        Some(self.graph.add_edge(
            source_idx,
            target_idx,
            DependencyEdge {
                module: module.to_string(),
            },
        ))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    pub fn build(self) -> EntityGraph {
        EntityGraph {
            graph: self.graph,
            node_map: self.node_map,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
