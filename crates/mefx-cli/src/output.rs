//! Console output for catalog queries and rejection reports.
//!
//! Every function renders into a `String`; the binary decides where it goes.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use mefx_core::{
    FailureListing, NodeId, PartCatalog, PartRef, RejectionGraph, RejectionNode, RejectionTrace,
};
use mefx_dgml::GraphFormat;
use mefx_error::Error;

const WHITELISTED_PREFIX: &str = "[Whitelisted] ";
const PART_PREFIX: &str = "[Part]";

/// File stem used when the whole graph is saved.
pub const ALL_ERRORS_STEM: &str = "AllErrors";

/// Display name of a part; verbose output tags it and uses the qualified name.
pub fn part_label(part: &PartRef, verbose: bool) -> String {
    if verbose {
        format!("{PART_PREFIX} {}", part.display_name(true))
    } else {
        part.name().to_string()
    }
}

pub fn list_parts(catalog: &PartCatalog, verbose: bool) -> String {
    let mut out = String::from("Parts in Catalog are\n");
    for part in catalog.parts() {
        let _ = writeln!(out, "{}", part_label(part, verbose));
    }
    out
}

pub fn part_details(catalog: &PartCatalog, name: &str) -> String {
    let mut out = String::new();
    let Some(part) = catalog.get(name) else {
        let _ = writeln!(out, "Couldn't find part with name {name}");
        return out;
    };

    let _ = writeln!(out, "Printing out details for part {name}");
    for export in &part.exports {
        let _ = writeln!(out, "[Export] {export}");
    }
    for import in &part.imports {
        let _ = writeln!(
            out,
            "[Import] Field: {}, Contract Name: {}",
            import.label(),
            import.contract
        );
    }
    out
}

pub fn exporters(catalog: &PartCatalog, contract: &str, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Exporting parts for {contract}:");
    for part in catalog.exporters_of(contract) {
        let _ = writeln!(out, "{}", part_label(part, verbose));
    }
    out
}

pub fn importers(catalog: &PartCatalog, contract: &str, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Importing parts for {contract}:");
    for part in catalog.importers_of(contract) {
        let _ = writeln!(out, "{}", part_label(part, verbose));
    }
    out
}

/// One rejected part: its name, or every message in verbose mode.
fn write_node(out: &mut String, node: &RejectionNode<'_>, verbose: bool) {
    let prefix = if node.is_whitelisted() {
        WHITELISTED_PREFIX
    } else {
        ""
    };
    if verbose {
        for message in node.messages() {
            let _ = writeln!(out, "{prefix}{message}");
            out.push('\n');
        }
    } else {
        let _ = writeln!(out, "{prefix}{}", node.name());
    }
}

fn write_level(
    out: &mut String,
    graph: &RejectionGraph<'_>,
    level: usize,
    nodes: &[NodeId],
    verbose: bool,
) {
    let _ = writeln!(out, "Errors in level {level}");
    for &id in nodes {
        write_node(out, graph.node(id), verbose);
    }
    if !verbose {
        out.push('\n');
    }
}

/// Every rejection, root causes first.
pub fn render_listing(graph: &RejectionGraph<'_>, listing: &FailureListing, verbose: bool) -> String {
    let mut out = String::from("Listing all the rejection issues\n");
    for group in &listing.levels {
        write_level(&mut out, graph, group.level, &group.nodes, verbose);
    }
    out
}

/// The causal chain behind one part, one block per frontier.
pub fn render_trace(
    graph: &RejectionGraph<'_>,
    trace: &RejectionTrace,
    verbose: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Printing Rejection Graph Info for {}\n",
        graph.node(trace.root).name()
    );
    for frontier in &trace.frontiers {
        write_level(&mut out, graph, frontier.level, &frontier.nodes, verbose);
    }
    out
}

pub fn render_not_found(part_name: &str) -> String {
    format!("No rejection issues associated with {part_name}\n\n")
}

/// A reportable error, shown in place of the output it interrupted.
pub fn render_error(err: &Error) -> String {
    format!("Error: {err}\n\n")
}

/// File name for a saved graph. Dots become underscores so only the
/// extension is dotted.
pub fn graph_file_name(stem: &str, format: GraphFormat) -> String {
    format!("{}.{}", stem.replace('.', "_"), format.extension())
}

/// Where to save a graph: inside `dir`, or the current directory if `dir`
/// does not exist. The second value is a notice for the user on fallback.
pub fn graph_file_path(dir: &Path, stem: &str, format: GraphFormat) -> (PathBuf, Option<String>) {
    let file_name = graph_file_name(stem, format);
    if dir.is_dir() {
        return (dir.join(file_name), None);
    }

    let notice = format!(
        "Couldn't find directory {} so saving rejection graph to current directory",
        dir.display()
    );
    let current = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    (current.join(file_name), Some(notice))
}
