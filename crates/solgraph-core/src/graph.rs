//! Graph view of a resolved solution using petgraph::DiGraph

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::model::{CanonicalPath, ProjectRecord};

/// Directed graph of loaded projects. An edge runs from a project to each
/// project it depends on. Node weights are indices into the project list.
pub struct DependencyGraph {
    inner: DiGraph<usize, ()>,
    nodes: HashMap<usize, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    /// Build the graph from resolved records. Only projects present in
    /// `by_key` become nodes; references to anything else are left out.
    pub fn from_projects(projects: &[ProjectRecord], by_key: &HashMap<CanonicalPath, usize>) -> Self {
        let mut inner = DiGraph::new();
        let mut nodes = HashMap::new();

        let mut loaded: Vec<usize> = by_key.values().copied().collect();
        loaded.sort_unstable();
        for index in loaded {
            nodes.insert(index, inner.add_node(index));
        }

        for (&index, &source) in &nodes {
            for dep in &projects[index].depends_on {
                if let Some(target) = by_key.get(dep).and_then(|t| nodes.get(t)) {
                    inner.add_edge(source, *target, ());
                }
            }
        }

        DependencyGraph { inner, nodes }
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Projects `index` depends on (may repeat for duplicate references).
    pub fn dependencies_of(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, Direction::Outgoing)
    }

    /// Projects that depend on `index`.
    pub fn dependents_of(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, Direction::Incoming)
    }

    fn neighbors(&self, index: usize, direction: Direction) -> Vec<usize> {
        let Some(&node) = self.nodes.get(&index) else {
            return Vec::new();
        };
        let mut found: Vec<usize> = self
            .inner
            .neighbors_directed(node, direction)
            .map(|n| self.inner[n])
            .collect();
        found.sort_unstable();
        found
    }

    /// Every dependency cycle, as project indices in list order. Cycles are
    /// ordered by their first project. A project referencing itself counts.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut cycles: Vec<Vec<usize>> = tarjan_scc(&self.inner)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| self.inner.contains_edge(n, n))
            })
            .map(|component| {
                let mut members: Vec<usize> = component.into_iter().map(|n| self.inner[n]).collect();
                members.sort_unstable();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}
