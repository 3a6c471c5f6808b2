//! Visual graph collection from a RejectionGraph.

use std::collections::HashSet;

use tracing::debug;

use mefx_core::{NodeId, RejectionGraph, RejectionNode};

use crate::types::{
    CollectOptions, LinkCategory, NodeCategory, VisualGraph, VisualLink, VisualNode,
    default_styles,
};

/// Collect the visual graph for `subset`.
///
/// Produces:
/// - one node per rejected part, in subset order; repeated ids are ignored
/// - a placeholder node plus a containment link per exported contract of a
///   container part
/// - one link per failing import, importer to imported, kept only when both
///   parts are in the subset
pub fn collect_visual_graph(
    graph: &RejectionGraph<'_>,
    subset: &[NodeId],
    options: &CollectOptions,
) -> VisualGraph {
    let mut included = HashSet::with_capacity(subset.len());
    let ordered: Vec<NodeId> = subset
        .iter()
        .copied()
        .filter(|id| included.insert(*id))
        .collect();

    let mut visual = VisualGraph {
        styles: default_styles(),
        ..Default::default()
    };

    for &id in &ordered {
        let node = graph.node(id);
        visual.nodes.push(part_node(node, options));
        if node.has_exports() {
            push_contracts(&mut visual, node);
        }
    }

    for &id in &ordered {
        let importer = graph.node(id);
        for edge in importer.caused_by() {
            if !included.contains(&edge.target) {
                continue;
            }
            visual.links.push(VisualLink {
                source: importer.name().to_string(),
                target: graph.node(edge.target).name().to_string(),
                label: Some(edge.label.clone()),
                category: LinkCategory::Edge,
            });
        }
    }

    debug!(
        nodes = visual.nodes.len(),
        links = visual.links.len(),
        "collected visual graph"
    );
    visual
}

fn part_node(node: &RejectionNode<'_>, options: &CollectOptions) -> VisualNode {
    let category = if node.is_whitelisted() {
        NodeCategory::Whitelisted
    } else {
        NodeCategory::Error
    };
    VisualNode {
        id: node.name().to_string(),
        label: node.part().display_name(options.verbose).to_string(),
        category,
        level: Some(node.level()),
        is_group: node.has_exports(),
    }
}

fn push_contracts(visual: &mut VisualGraph, node: &RejectionNode<'_>) {
    for contract in node.exported_contracts() {
        let id = format!("{}/{}", node.name(), contract);
        visual.nodes.push(VisualNode {
            id: id.clone(),
            label: contract.clone(),
            category: NodeCategory::Contract,
            level: None,
            is_group: false,
        });
        visual.links.push(VisualLink {
            source: node.name().to_string(),
            target: id,
            label: None,
            category: LinkCategory::Contains,
        });
    }
}
