use super::model::{ProjectInfo, TargetInfo};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// One target of the build graph
#[derive(Debug, Clone)]
pub struct TargetNode {
    pub address: String,
    pub info: TargetInfo,
}

impl TargetNode {
    pub fn is_root(&self) -> bool {
        self.info.is_target_root()
    }
}

/// Dependency graph over the targets of a resolved project
///
/// Edges point from a target to its dependencies. Dependencies that name
/// a target absent from the project are dropped.
#[derive(Debug, Default)]
pub struct BuildGraph {
    graph: DiGraph<TargetNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl BuildGraph {
    pub fn new(targets: &BTreeMap<String, TargetInfo>) -> Self {
        let mut graph = DiGraph::with_capacity(targets.len(), 0);
        let mut index = HashMap::with_capacity(targets.len());

        for (address, info) in targets {
            let node = graph.add_node(TargetNode {
                address: address.clone(),
                info: info.clone(),
            });
            index.insert(address.clone(), node);
        }

        for (address, info) in targets {
            let from = index[address];
            for dependency in &info.targets {
                match index.get(dependency) {
                    Some(&to) => {
                        graph.update_edge(from, to, ());
                    }
                    None => warn!("No build graph node for {} (needed by {})", dependency, address),
                }
            }
        }

        debug!(
            "Build graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Self { graph, index }
    }

    pub fn from_project(project: &ProjectInfo) -> Self {
        Self::new(&project.targets)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, address: &str) -> Option<&TargetNode> {
        self.index.get(address).map(|&ix| &self.graph[ix])
    }

    pub fn dependencies(&self, address: &str) -> BTreeSet<&str> {
        self.neighbors(address, Direction::Outgoing)
    }

    pub fn dependees(&self, address: &str) -> BTreeSet<&str> {
        self.neighbors(address, Direction::Incoming)
    }

    /// Targets the user asked for directly
    pub fn roots(&self) -> BTreeSet<&str> {
        self.addresses(&self.root_indices())
    }

    /// Roots plus every target within `level` dependency hops of a root.
    ///
    /// Level 0 is exactly the roots; each level contains the previous one.
    pub fn nodes_by_level(&self, level: usize) -> BTreeSet<&str> {
        self.addresses(&self.level_indices(level))
    }

    /// Smallest level that covers the whole graph, or `None` when some
    /// targets are unreachable from every root.
    pub fn max_depth(&self) -> Option<usize> {
        let total = self.len();
        let mut previous = None;

        for level in 0.. {
            let reached = self.level_indices(level).len();
            if reached == total {
                return Some(level);
            }
            if previous == Some(reached) {
                warn!(
                    "{} of {} targets are unreachable from the target roots",
                    total - reached,
                    total
                );
                return None;
            }
            previous = Some(reached);
        }
        None
    }

    /// Targets no root reaches through dependencies
    pub fn orphans(&self) -> BTreeSet<&str> {
        let reached = self.level_indices(self.len());
        self.graph
            .node_indices()
            .filter(|ix| !reached.contains(ix))
            .map(|ix| self.graph[ix].address.as_str())
            .collect()
    }

    fn root_indices(&self) -> HashSet<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&ix| self.graph[ix].is_root())
            .collect()
    }

    fn level_indices(&self, level: usize) -> HashSet<NodeIndex> {
        let total = self.len();
        let mut reached = self.root_indices();
        let mut frontier: Vec<NodeIndex> = reached.iter().copied().collect();

        for _ in 0..level {
            if reached.len() == total || frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for ix in frontier {
                for dependency in self.graph.neighbors_directed(ix, Direction::Outgoing) {
                    if reached.insert(dependency) {
                        next.push(dependency);
                    }
                }
            }
            frontier = next;
        }
        reached
    }

    fn neighbors(&self, address: &str, direction: Direction) -> BTreeSet<&str> {
        let Some(&ix) = self.index.get(address) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(ix, direction)
            .map(|n| self.graph[n].address.as_str())
            .collect()
    }

    fn addresses(&self, indices: &HashSet<NodeIndex>) -> BTreeSet<&str> {
        indices
            .iter()
            .map(|&ix| self.graph[ix].address.as_str())
            .collect()
    }
}
