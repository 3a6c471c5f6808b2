use std::collections::HashMap;

use mefx_error::{Error, Result};

use crate::node::{NodeId, RejectionNode};

/// RejectionGraph holds one node per rejected part, keyed by part name.
///
/// Nodes live in an arena in creation order and refer to each other through
/// `NodeId`s, so the graph may contain cycles without ownership cycles. The
/// graph is built once by `build_graph` and only read afterwards.
#[derive(Debug, Default)]
pub struct RejectionGraph<'p> {
    nodes: Vec<RejectionNode<'p>>,
    by_name: HashMap<&'p str, NodeId>,
    max_level: usize,
}

impl<'p> RejectionGraph<'p> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
            max_level: 0,
        }
    }

    /// Add a freshly created node.
    ///
    /// Fails if a node with the same part name already exists: every part
    /// must be materialized exactly once.
    pub fn insert_node(&mut self, node: RejectionNode<'p>) -> Result<NodeId> {
        let name = node.name();
        if self.by_name.contains_key(name) {
            return Err(Error::invariant_violation(format!(
                "part '{name}' materialized twice in the rejection graph"
            ))
            .with_operation("graph::insert_node")
            .with_context("part", name));
        }

        let id = NodeId::new(self.nodes.len() as u32);
        self.max_level = self.max_level.max(node.level());
        self.by_name.insert(name, id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Link `importer` to the rejected part it imports, in both directions.
    pub fn link(&mut self, importer: NodeId, imported: NodeId, label: &str) {
        self.nodes[importer.index()].add_cause_edge(imported, label);
        self.nodes[imported.index()].add_effect_edge(importer, label);
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn node(&self, id: NodeId) -> &RejectionNode<'p> {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut RejectionNode<'p> {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, name: &str) -> Option<&RejectionNode<'p>> {
        self.find(name).map(|id| self.node(id))
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|index| NodeId::new(index as u32))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &RejectionNode<'p>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index as u32), node))
    }

    /// Nodes created at `level`, in creation order.
    pub fn nodes_at_level(&self, level: usize) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(move |(_, node)| node.level() == level)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest level reached while building; 0 for an empty graph.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub(crate) fn set_max_level(&mut self, level: usize) {
        self.max_level = self.max_level.max(level);
    }
}
