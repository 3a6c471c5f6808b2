use tracing::{debug, info};

use mefx_error::Result;

use crate::graph::RejectionGraph;
use crate::node::RejectionNode;
use crate::report::ErrorLevel;
use crate::whitelist::Whitelist;

struct GraphBuilder<'p, 'w> {
    graph: RejectionGraph<'p>,
    whitelist: &'w dyn Whitelist,
}

impl<'p, 'w> GraphBuilder<'p, 'w> {
    fn new(whitelist: &'w dyn Whitelist) -> Self {
        Self {
            graph: RejectionGraph::new(),
            whitelist,
        }
    }

    /// Phase 1: one node per distinct rejected part.
    ///
    /// Level numbers follow the order the engine reported the levels in,
    /// starting at 1. A part seen again only contributes its message; its
    /// level stays the one it was first seen at.
    fn materialize_nodes(&mut self, levels: &[ErrorLevel<'p>]) -> Result<()> {
        for (index, level) in levels.iter().enumerate() {
            let level_number = index + 1;
            for rejection in level {
                let name = rejection.part.name();
                if let Some(existing) = self.graph.find(name) {
                    self.graph.node_mut(existing).add_message(rejection.message);
                    continue;
                }

                let mut node = RejectionNode::new(rejection.part, rejection.message, level_number);
                node.set_whitelisted(self.whitelist.is_whitelisted(name));
                self.graph
                    .insert_node(node)
                    .map_err(|err| err.with_operation("builder::materialize_nodes"))?;
            }
            self.graph.set_max_level(level_number);
        }
        Ok(())
    }

    /// Phase 2: link every import that resolves to another rejected part.
    ///
    /// Runs after all nodes exist since a part may import any other part
    /// regardless of the level it was reported at.
    fn link_imports(&mut self) {
        let ids: Vec<_> = self.graph.node_ids().collect();
        for importer in ids {
            let part = self.graph.node(importer).part();
            for import in &part.imports {
                let Some(imported) = self.graph.find(import.target_key()) else {
                    continue;
                };
                debug!(
                    importer = part.name(),
                    imported = import.target_key(),
                    label = import.label(),
                    "linking rejected import"
                );
                self.graph.link(importer, imported, import.label());
            }
        }
    }
}

/// Build the rejection graph from the engine's leveled error stack.
///
/// `levels` are ordered from the first level the engine reported to the last.
/// `whitelist` is consulted once per distinct part.
pub fn build_graph<'p>(
    levels: &[ErrorLevel<'p>],
    whitelist: &dyn Whitelist,
) -> Result<RejectionGraph<'p>> {
    let mut builder = GraphBuilder::new(whitelist);
    builder.materialize_nodes(levels)?;
    builder.link_imports();

    let graph = builder.graph;
    info!(
        nodes = graph.len(),
        levels = graph.max_level(),
        "rejection graph built"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{ImportSite, PartRef};
    use crate::report::Rejection;
    use crate::whitelist::ExactWhitelist;
    use pretty_assertions::assert_eq;

    fn reject<'p>(message: &'p str, part: &'p PartRef) -> Rejection<'p> {
        Rejection { message, part }
    }

    #[test]
    fn test_two_level_scenario() {
        let a = PartRef::new("PartA");
        let b = PartRef::new("PartB").with_import(ImportSite::new("PartA").with_field("Dependency"));
        let levels = vec![vec![reject("msg1", &a)], vec![reject("msg2", &b)]];

        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.max_level(), 2);

        let a_id = graph.find("PartA").unwrap();
        let b_id = graph.find("PartB").unwrap();
        assert_eq!(graph.node(a_id).level(), 1);
        assert_eq!(graph.node(b_id).level(), 2);

        let causes: Vec<_> = graph.node(b_id).caused_by().iter().cloned().collect();
        assert_eq!(causes, vec![crate::RejectionEdge::new(a_id, "Dependency")]);
        let effects: Vec<_> = graph.node(a_id).causes_failure_in().iter().cloned().collect();
        assert_eq!(effects, vec![crate::RejectionEdge::new(b_id, "Dependency")]);
    }

    #[test]
    fn test_repeated_part_keeps_first_level() {
        let a = PartRef::new("PartA");
        let levels = vec![
            vec![reject("first", &a), reject("second", &a)],
            vec![reject("third", &a)],
        ];

        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();
        let node = graph.get("PartA").unwrap();
        assert_eq!(node.level(), 1);
        assert_eq!(node.messages().len(), 3);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.max_level(), 2);
    }

    #[test]
    fn test_whitelist_evaluated_once_per_part() {
        use std::cell::Cell;

        let a = PartRef::new("PartA");
        let b = PartRef::new("PartB");
        let levels = vec![vec![reject("m", &a), reject("m2", &a), reject("m", &b)]];

        let calls = Cell::new(0);
        let whitelist = |name: &str| {
            calls.set(calls.get() + 1);
            name == "PartB"
        };
        let graph = build_graph(&levels, &whitelist).unwrap();

        assert_eq!(calls.get(), 2);
        assert!(!graph.get("PartA").unwrap().is_whitelisted());
        assert!(graph.get("PartB").unwrap().is_whitelisted());
    }

    #[test]
    fn test_imports_of_healthy_parts_are_not_linked() {
        let b = PartRef::new("PartB")
            .with_import(ImportSite::new("Healthy"))
            .with_import(ImportSite::new("IContract").with_site_type("PartC"));
        let c = PartRef::new("PartC");
        let levels = vec![vec![reject("m", &c)], vec![reject("m", &b)]];

        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();
        let b_node = graph.get("PartB").unwrap();
        assert_eq!(b_node.caused_by().len(), 1);
        let edge = b_node.caused_by().iter().next().unwrap();
        assert_eq!(graph.node(edge.target).name(), "PartC");
        assert_eq!(edge.label, "Constructor");
    }

    #[test]
    fn test_empty_levels_still_count() {
        let a = PartRef::new("PartA");
        let levels = vec![vec![reject("m", &a)], vec![]];
        let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();
        assert_eq!(graph.max_level(), 2);
    }
}
