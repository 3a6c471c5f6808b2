//! DOT output.

use std::collections::HashMap;
use std::fmt::Write;

use mefx_collect::{LinkCategory, NodeCategory, StyleTarget, VisualGraph, VisualNode};

/// Sanitize a string to be a valid DOT identifier.
/// Replaces any non-alphanumeric character with underscore.
pub fn sanitize_id(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Escape special characters for DOT labels.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// A DOT graph builder for constructing valid DOT output.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Create a new DOT graph with the given name.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph {} {{", sanitize_id(name));
        Self { output, indent: 1 }
    }

    /// Add a graph attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}=\"{}\";", key, escape_label(value));
        self
    }

    /// Add a node style default.
    pub fn node_style(&mut self, attrs: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "node [{attrs}];");
        self
    }

    /// Add a node with full attributes.
    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{id} [");
        write_attrs(&mut self.output, attrs);
        self.output.push_str("];\n");
        self
    }

    /// Add an edge with attributes.
    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{from} -> {to}");
        if !attrs.is_empty() {
            self.output.push_str(" [");
            write_attrs(&mut self.output, attrs);
            self.output.push(']');
        }
        self.output.push_str(";\n");
        self
    }

    /// Start a subgraph cluster.
    pub fn start_cluster(&mut self, id: &str, label: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "subgraph cluster_{} {{", sanitize_id(id));
        self.indent += 1;
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "label=\"{}\";", escape_label(label));
        self
    }

    /// End the current subgraph cluster.
    pub fn end_cluster(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

fn write_attrs(output: &mut String, attrs: &[(&str, &str)]) {
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{}=\"{}\"", key, escape_label(value));
    }
}

/// Node attributes for one visual node, including any matching style rules.
fn node_attrs<'a>(
    graph: &'a VisualGraph,
    node: &'a VisualNode,
    level: &'a str,
) -> Vec<(&'a str, &'a str)> {
    let mut attrs = vec![("label", node.label.as_str())];
    match node.category {
        NodeCategory::Contract => attrs.push(("shape", "note")),
        _ => {
            attrs.push(("shape", "box"));
            attrs.push(("level", level));
        }
    }
    for style in &graph.styles {
        if style.target != StyleTarget::Node || style.category != node.category.as_str() {
            continue;
        }
        for setter in &style.setters {
            if setter.property == "Background" {
                attrs.push(("style", "filled"));
                attrs.push(("fillcolor", setter.value));
            }
        }
    }
    attrs
}

/// Edge attributes for the failure-link category, from the style rules.
fn edge_style(graph: &VisualGraph) -> Vec<(&'static str, &'static str)> {
    let mut attrs = Vec::new();
    for style in &graph.styles {
        if style.target != StyleTarget::Link || style.category != LinkCategory::Edge.as_str() {
            continue;
        }
        for setter in &style.setters {
            match setter.property {
                "Stroke" => attrs.push(("color", setter.value)),
                "StrokeThickness" => attrs.push(("penwidth", setter.value)),
                _ => {}
            }
        }
    }
    attrs
}

/// Render a visual graph in DOT format.
///
/// Container nodes become clusters holding the part and its contract
/// placeholders. Node ids are positional (`n0`, `n1`, ...) since part names
/// are not valid DOT identifiers.
pub fn render_dot(graph: &VisualGraph) -> String {
    let ids: HashMap<&str, String> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), format!("n{index}")))
        .collect();

    // Contract placeholders render inside their container's cluster.
    let mut members: HashMap<&str, Vec<&VisualNode>> = HashMap::new();
    for link in &graph.links {
        if link.category != LinkCategory::Contains {
            continue;
        }
        if let Some(node) = graph.node(&link.target) {
            members.entry(link.source.as_str()).or_default().push(node);
        }
    }

    let mut builder = DotBuilder::new("rejections");
    builder.attr("rankdir", "LR");
    builder.node_style("fontname=\"Helvetica\"");

    for node in graph.part_nodes() {
        let Some(id) = ids.get(node.id.as_str()) else {
            continue;
        };
        let level = node.level.map(|l| l.to_string()).unwrap_or_default();
        if node.is_group {
            builder.start_cluster(id, &node.label);
            builder.node(id, &node_attrs(graph, node, &level));
            for member in members.get(node.id.as_str()).into_iter().flatten() {
                if let Some(member_id) = ids.get(member.id.as_str()) {
                    builder.node(member_id, &node_attrs(graph, member, ""));
                }
            }
            builder.end_cluster();
        } else {
            builder.node(id, &node_attrs(graph, node, &level));
        }
    }

    let failure_style = edge_style(graph);
    for link in &graph.links {
        let (Some(from), Some(to)) = (ids.get(link.source.as_str()), ids.get(link.target.as_str()))
        else {
            continue;
        };
        match link.category {
            LinkCategory::Edge => {
                let mut attrs: Vec<(&str, &str)> = failure_style.clone();
                if let Some(label) = link.label.as_deref() {
                    attrs.push(("label", label));
                }
                builder.edge(from, to, &attrs);
            }
            LinkCategory::Contains => {
                builder.edge(from, to, &[("style", "dashed"), ("arrowhead", "none")]);
            }
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mefx_collect::{VisualLink, default_styles};

    #[test]
    fn test_sanitize_and_escape() {
        assert_eq!(sanitize_id("Contoso.Logger"), "Contoso_Logger");
        assert_eq!(escape_label("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn test_render_dot_styles_and_clusters() {
        let graph = VisualGraph {
            nodes: vec![
                VisualNode {
                    id: "Logger".to_string(),
                    label: "Logger".to_string(),
                    category: NodeCategory::Whitelisted,
                    level: Some(1),
                    is_group: true,
                },
                VisualNode {
                    id: "Logger/ILogger".to_string(),
                    label: "ILogger".to_string(),
                    category: NodeCategory::Contract,
                    level: None,
                    is_group: false,
                },
                VisualNode {
                    id: "Editor".to_string(),
                    label: "Editor".to_string(),
                    category: NodeCategory::Error,
                    level: Some(2),
                    is_group: false,
                },
            ],
            links: vec![
                VisualLink {
                    source: "Logger".to_string(),
                    target: "Logger/ILogger".to_string(),
                    label: None,
                    category: LinkCategory::Contains,
                },
                VisualLink {
                    source: "Editor".to_string(),
                    target: "Logger".to_string(),
                    label: Some("Log".to_string()),
                    category: LinkCategory::Edge,
                },
            ],
            styles: default_styles(),
        };

        let dot = render_dot(&graph);
        assert!(dot.starts_with("digraph rejections {"));
        assert!(dot.contains("subgraph cluster_n0 {"));
        assert!(dot.contains(
            "n0 [label=\"Logger\", shape=\"box\", level=\"1\", style=\"filled\", fillcolor=\"#FFFFFF\"];"
        ));
        assert!(dot.contains("n1 [label=\"ILogger\", shape=\"note\"];"));
        assert!(dot.contains("n2 -> n0 [color=\"#00FFFF\", penwidth=\"3\", label=\"Log\"];"));
        assert!(dot.contains("n0 -> n1 [style=\"dashed\", arrowhead=\"none\"];"));
    }
}
