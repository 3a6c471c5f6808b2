//! DGML output.

use std::fmt::Write;

use mefx_collect::{StyleRule, VisualGraph, VisualLink, VisualNode};

const DGML_NAMESPACE: &str = "http://schemas.microsoft.com/vs/2009/dgml";

/// Escape text for use inside a double-quoted XML attribute.
pub fn escape_attr(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// A DGML document builder.
pub struct DgmlBuilder {
    output: String,
    indent: usize,
}

impl Default for DgmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DgmlBuilder {
    pub fn new() -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        let _ = writeln!(output, "<DirectedGraph xmlns=\"{DGML_NAMESPACE}\">");
        Self { output, indent: 1 }
    }

    /// Open a section such as `Nodes` or `Links`.
    pub fn start(&mut self, section: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "<{section}>");
        self.indent += 1;
        self
    }

    pub fn end(&mut self, section: &str) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "</{section}>");
        self
    }

    /// Self-closing element with escaped attributes.
    pub fn element(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "<{name}");
        for (key, value) in attrs {
            let _ = write!(self.output, " {}=\"{}\"", key, escape_attr(value));
        }
        self.output.push_str(" />\n");
        self
    }

    /// Opening tag with escaped attributes; close it with `end`.
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "<{name}");
        for (key, value) in attrs {
            let _ = write!(self.output, " {}=\"{}\"", key, escape_attr(value));
        }
        self.output.push_str(">\n");
        self.indent += 1;
        self
    }

    pub fn build(mut self) -> String {
        self.output.push_str("</DirectedGraph>\n");
        self.output
    }
}

/// Render a visual graph as a DGML document.
pub fn render_dgml(graph: &VisualGraph) -> String {
    let mut builder = DgmlBuilder::new();

    builder.start("Nodes");
    for node in &graph.nodes {
        write_node(&mut builder, node);
    }
    builder.end("Nodes");

    builder.start("Links");
    for link in &graph.links {
        write_link(&mut builder, link);
    }
    builder.end("Links");

    builder.start("Categories");
    for category in graph.node_categories() {
        builder.element("Category", &[("Id", category.as_str())]);
    }
    for category in graph.link_categories() {
        builder.element("Category", &[("Id", category.as_str())]);
    }
    builder.end("Categories");

    builder.start("Properties");
    builder.element(
        "Property",
        &[("Id", "Level"), ("Label", "Level"), ("DataType", "System.Int32")],
    );
    builder.end("Properties");

    if !graph.styles.is_empty() {
        builder.start("Styles");
        for style in &graph.styles {
            write_style(&mut builder, style);
        }
        builder.end("Styles");
    }

    builder.build()
}

fn write_node(builder: &mut DgmlBuilder, node: &VisualNode) {
    let level = node.level.map(|level| level.to_string());
    let mut attrs = vec![
        ("Id", node.id.as_str()),
        ("Label", node.label.as_str()),
        ("Category", node.category.as_str()),
    ];
    if node.is_group {
        attrs.push(("Group", "Expanded"));
    }
    if let Some(level) = level.as_deref() {
        attrs.push(("Level", level));
    }
    builder.element("Node", &attrs);
}

fn write_link(builder: &mut DgmlBuilder, link: &VisualLink) {
    let mut attrs = vec![
        ("Source", link.source.as_str()),
        ("Target", link.target.as_str()),
        ("Category", link.category.as_str()),
    ];
    if let Some(label) = link.label.as_deref() {
        attrs.push(("Label", label));
    }
    builder.element("Link", &attrs);
}

fn write_style(builder: &mut DgmlBuilder, style: &StyleRule) {
    let condition = format!("HasCategory('{}')", style.category);
    builder.open(
        "Style",
        &[
            ("TargetType", style.target.as_str()),
            ("GroupLabel", style.category),
            ("ValueLabel", "True"),
        ],
    );
    builder.element("Condition", &[("Expression", condition.as_str())]);
    for setter in &style.setters {
        builder.element(
            "Setter",
            &[("Property", setter.property), ("Value", setter.value)],
        );
    }
    builder.end("Style");
}
