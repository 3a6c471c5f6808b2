//! Command-line option groups for mefx.
//!
//! The groups are flattened into the `mefx` binary's parser and can be reused
//! by other front ends that drive the same pipeline.

use clap::Args;

/// Options for querying the part catalog.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogOptions {
    /// List every part found in the input reports.
    #[arg(long = "list-parts")]
    pub list_parts: bool,

    /// Print the exports and imports of the named parts.
    #[arg(long = "part-details", value_name = "PART", num_args = 1..)]
    pub part_details: Vec<String>,

    /// List the parts exporting the given contracts.
    #[arg(long = "exporters", value_name = "CONTRACT", num_args = 1..)]
    pub exporters: Vec<String>,

    /// List the parts importing the given contracts.
    #[arg(long = "importers", value_name = "CONTRACT", num_args = 1..)]
    pub importers: Vec<String>,
}

/// Options for rejection tracing and graph output.
#[derive(Args, Debug, Clone, Default)]
pub struct RejectionOptions {
    /// Trace the named rejected parts, or `all` to list every rejection.
    #[arg(long = "rejected", value_name = "PART", num_args = 1..)]
    pub rejected: Vec<String>,

    /// Directory to save rejection graphs in.
    #[arg(long = "graph", value_name = "DIR")]
    pub graph: Option<String>,

    /// Graph file format.
    #[arg(
        long = "graph-format",
        value_name = "FORMAT",
        default_value = "dgml",
        value_parser = ["dgml", "dot"]
    )]
    pub graph_format: String,

    /// File listing parts whose rejection is expected, one per line.
    #[arg(long = "whitelist", value_name = "FILE")]
    pub whitelist: Option<String>,

    /// Treat whitelist entries as case-insensitive regular expressions.
    #[arg(long = "regex", requires = "whitelist")]
    pub regex: bool,
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list_parts(mut self, list_parts: bool) -> Self {
        self.list_parts = list_parts;
        self
    }

    pub fn with_part_details(mut self, parts: Vec<String>) -> Self {
        self.part_details = parts;
        self
    }
}

impl RejectionOptions {
    pub fn new() -> Self {
        Self {
            graph_format: "dgml".to_string(),
            ..Self::default()
        }
    }

    pub fn with_rejected(mut self, rejected: Vec<String>) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn with_graph(mut self, dir: Option<String>) -> Self {
        self.graph = dir;
        self
    }

    pub fn with_whitelist(mut self, path: Option<String>, regex: bool) -> Self {
        self.whitelist = path;
        self.regex = regex;
        self
    }
}
