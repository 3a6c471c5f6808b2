//! Graph file output for mefx.
//!
//! Serializes a `VisualGraph` to DGML, the format the rejection graph is
//! primarily viewed in, or to Graphviz DOT. The format is picked from the
//! destination file's extension.
//!
//! # Module Structure
//!
//! - [`dgml`]: DGML document builder and renderer
//! - [`dot`]: DOT builder and renderer

mod dgml;
mod dot;

use std::fs;
use std::path::Path;

use tracing::info;

use mefx_collect::VisualGraph;
use mefx_error::{Error, Result};

pub use dgml::{DgmlBuilder, escape_attr, render_dgml};
pub use dot::{DotBuilder, escape_label, render_dot, sanitize_id};

/// Output formats a graph file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    #[default]
    Dgml,
    Dot,
}

impl GraphFormat {
    pub const ALL: [GraphFormat; 2] = [GraphFormat::Dgml, GraphFormat::Dot];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Dgml => "dgml",
            Self::Dot => "dot",
        }
    }

    /// Format for a file extension. Matching is exact.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == extension)
    }

    /// Format implied by `path`, if its extension is a supported one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn render(self, graph: &VisualGraph) -> String {
        match self {
            Self::Dgml => render_dgml(graph),
            Self::Dot => render_dot(graph),
        }
    }
}

/// Write `graph` to `path` in the format its extension names.
///
/// An unsupported extension is an `InvalidExtension` error and nothing is
/// written. Write failures are returned with the path attached.
pub fn export_graph(graph: &VisualGraph, path: impl AsRef<Path>) -> Result<GraphFormat> {
    let path = path.as_ref();
    let format = GraphFormat::from_path(path).ok_or_else(|| {
        let expected: Vec<String> = GraphFormat::ALL
            .iter()
            .map(|format| format!(".{}", format.extension()))
            .collect();
        let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
        Error::invalid_extension(path.display().to_string(), &expected)
            .with_operation("export_graph")
    })?;

    let content = format.render(graph);
    fs::write(path, content).map_err(|err| {
        Error::from(err)
            .with_operation("export_graph")
            .with_context("path", path.display().to_string())
    })?;

    info!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "saved rejection graph"
    );
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            GraphFormat::from_path(Path::new("out/AllErrors.dgml")),
            Some(GraphFormat::Dgml)
        );
        assert_eq!(
            GraphFormat::from_path(Path::new("Contoso_Logger.dot")),
            Some(GraphFormat::Dot)
        );
        assert_eq!(GraphFormat::from_path(Path::new("graph.xyz")), None);
        assert_eq!(GraphFormat::from_path(Path::new("graph")), None);
        assert_eq!(GraphFormat::from_path(Path::new("graph.DGML")), None);
    }
}
