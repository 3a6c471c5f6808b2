//! Root-cause queries over a built rejection graph.
//!
//! Both queries are read-only. Each returns the nodes it visited so the
//! caller can export exactly the part of the graph that was reported.

use std::collections::{HashSet, VecDeque};

use mefx_error::{Error, Result};

use crate::graph::RejectionGraph;
use crate::node::NodeId;

/// Nodes sharing one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGroup {
    pub level: usize,
    pub nodes: Vec<NodeId>,
}

/// Every rejection in the graph, deepest level first.
///
/// Higher levels were reported later by the engine and hold the causes of
/// the failures reported before them, so root causes come out on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureListing {
    pub levels: Vec<LevelGroup>,
}

impl FailureListing {
    /// `(level, node)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.levels
            .iter()
            .flat_map(|group| group.nodes.iter().map(move |&id| (group.level, id)))
    }

    /// Nodes to export for this listing: the whole graph.
    pub fn visited(&self) -> Vec<NodeId> {
        self.iter().map(|(_, id)| id).collect()
    }
}

/// List all failures from the deepest level down to level 1.
pub fn list_all_failures(graph: &RejectionGraph<'_>) -> FailureListing {
    let levels = (1..=graph.max_level())
        .rev()
        .map(|level| LevelGroup {
            level,
            nodes: graph.nodes_at_level(level).collect(),
        })
        .collect();
    FailureListing { levels }
}

/// One breadth-first frontier of a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier {
    /// Level of the first node in the frontier.
    pub level: usize,
    pub nodes: Vec<NodeId>,
}

/// Causal chain behind one rejected part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionTrace {
    pub root: NodeId,
    pub frontiers: Vec<Frontier>,
}

impl RejectionTrace {
    /// Every node the trace reached, in visit order.
    pub fn visited(&self) -> Vec<NodeId> {
        self.frontiers
            .iter()
            .flat_map(|frontier| frontier.nodes.iter().copied())
            .collect()
    }

    /// Traced nodes with no rejected imports of their own.
    pub fn root_causes<'a>(&'a self, graph: &'a RejectionGraph<'_>) -> impl Iterator<Item = NodeId> + 'a {
        self.frontiers
            .iter()
            .flat_map(|frontier| frontier.nodes.iter().copied())
            .filter(move |&id| graph.node(id).is_leaf())
    }
}

/// Trace why `part_name` was rejected.
///
/// Walks `caused_by` edges breadth first, towards causes only, grouping the
/// nodes by frontier. Each node is visited at most once, which keeps cyclic
/// imports finite. An unknown part yields a `PartNotFound` error; the graph
/// is never modified.
pub fn trace_failure(graph: &RejectionGraph<'_>, part_name: &str) -> Result<RejectionTrace> {
    let root = graph.find(part_name).ok_or_else(|| {
        Error::part_not_found(part_name).with_operation("trace::trace_failure")
    })?;

    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut frontiers = Vec::new();

    while let Some(&first) = queue.front() {
        let level = graph.node(first).level();
        let width = queue.len();
        let mut nodes = Vec::with_capacity(width);

        for _ in 0..width {
            let Some(current) = queue.pop_front() else {
                break;
            };
            nodes.push(current);

            for edge in graph.node(current).caused_by() {
                if visited.insert(edge.target) {
                    queue.push_back(edge.target);
                }
            }
        }

        frontiers.push(Frontier { level, nodes });
    }

    Ok(RejectionTrace { root, frontiers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use crate::part::{ImportSite, PartRef};
    use crate::report::Rejection;
    use crate::whitelist::ExactWhitelist;
    use mefx_error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn names(graph: &RejectionGraph<'_>, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| graph.node(id).name().to_string()).collect()
    }

    #[test]
    fn test_list_all_deepest_first() {
        let a = PartRef::new("PartA");
        let b = PartRef::new("PartB").with_import(ImportSite::new("PartA"));
        let levels = vec![
            vec![Rejection { message: "msg1", part: &a }],
            vec![Rejection { message: "msg2", part: &b }],
        ];
        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();

        let listing = list_all_failures(&graph);
        let order: Vec<_> = listing
            .iter()
            .map(|(level, id)| (level, graph.node(id).name()))
            .collect();
        assert_eq!(order, vec![(2, "PartB"), (1, "PartA")]);
        assert_eq!(listing.visited().len(), graph.len());
    }

    #[test]
    fn test_trace_unknown_part() {
        let graph = RejectionGraph::new();
        let err = trace_failure(&graph, "Ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PartNotFound);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_trace_leaf_has_single_frontier() {
        let a = PartRef::new("PartA");
        let levels = vec![vec![Rejection { message: "m", part: &a }]];
        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();

        let trace = trace_failure(&graph, "PartA").unwrap();
        assert_eq!(trace.frontiers.len(), 1);
        assert_eq!(trace.frontiers[0].level, 1);
        assert_eq!(names(&graph, &trace.frontiers[0].nodes), vec!["PartA"]);
    }

    #[test]
    fn test_trace_groups_by_frontier() {
        // D imports B and C, both of which import A.
        let a = PartRef::new("A");
        let b = PartRef::new("B").with_import(ImportSite::new("A"));
        let c = PartRef::new("C").with_import(ImportSite::new("A"));
        let d = PartRef::new("D")
            .with_import(ImportSite::new("B").with_field("First"))
            .with_import(ImportSite::new("C").with_field("Second"));
        let levels = vec![
            vec![Rejection { message: "m", part: &d }],
            vec![
                Rejection { message: "m", part: &b },
                Rejection { message: "m", part: &c },
            ],
            vec![Rejection { message: "m", part: &a }],
        ];
        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();

        let trace = trace_failure(&graph, "D").unwrap();
        let frontiers: Vec<_> = trace
            .frontiers
            .iter()
            .map(|f| (f.level, names(&graph, &f.nodes)))
            .collect();
        assert_eq!(
            frontiers,
            vec![
                (1, vec!["D".to_string()]),
                (2, vec!["B".to_string(), "C".to_string()]),
                (3, vec!["A".to_string()]),
            ]
        );
        let roots: Vec<_> = trace.root_causes(&graph).collect();
        assert_eq!(names(&graph, &roots), vec!["A"]);
    }

    #[test]
    fn test_trace_ignores_effect_direction() {
        let a = PartRef::new("PartA");
        let b = PartRef::new("PartB").with_import(ImportSite::new("PartA"));
        let levels = vec![
            vec![Rejection { message: "m", part: &a }],
            vec![Rejection { message: "m", part: &b }],
        ];
        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();

        let trace = trace_failure(&graph, "PartA").unwrap();
        assert_eq!(names(&graph, &trace.visited()), vec!["PartA"]);
    }
}
