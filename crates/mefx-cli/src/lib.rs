//! mefx command-line interface.
//!
pub mod discovery;
pub mod options;
pub mod output;
pub mod pipeline;

use std::fmt::Write;
use std::path::PathBuf;

use mefx_core::WhitelistMode;
use mefx_dgml::GraphFormat;
use mefx_error::Result;

pub use options::{CatalogOptions, RejectionOptions};
pub use pipeline::{load_reports, run_rejections};

/// Keyword for `--rejected` that lists every rejection instead of tracing one part.
pub const ALL_REJECTIONS: &str = "all";

/// Options for running mefx.
#[derive(Debug, Clone, Default)]
pub struct MefxOptions {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    pub verbose: bool,
    pub list_parts: bool,
    pub part_details: Vec<String>,
    pub exporters: Vec<String>,
    pub importers: Vec<String>,
    pub rejected: Vec<String>,
    pub graph_dir: Option<PathBuf>,
    pub graph_format: GraphFormat,
    pub whitelist: Option<PathBuf>,
    pub whitelist_mode: WhitelistMode,
}

impl MefxOptions {
    pub fn new(files: Vec<String>, dirs: Vec<String>) -> Self {
        Self {
            files,
            dirs,
            ..Self::default()
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogOptions) -> Self {
        self.list_parts = catalog.list_parts;
        self.part_details = catalog.part_details;
        self.exporters = catalog.exporters;
        self.importers = catalog.importers;
        self
    }

    pub fn with_rejection(mut self, rejection: RejectionOptions) -> Self {
        self.rejected = rejection.rejected;
        self.graph_dir = rejection.graph.map(PathBuf::from);
        self.graph_format = GraphFormat::from_extension(&rejection.graph_format).unwrap_or_default();
        self.whitelist = rejection.whitelist.map(PathBuf::from);
        self.whitelist_mode = if rejection.regex {
            WhitelistMode::Regex
        } else {
            WhitelistMode::Exact
        };
        self
    }

    /// True if `--rejected all` was requested.
    pub fn lists_all_rejections(&self) -> bool {
        self.rejected
            .iter()
            .any(|name| name.eq_ignore_ascii_case(ALL_REJECTIONS))
    }
}

/// Main entry point. Returns everything meant for the user's terminal.
pub fn run_main(opts: &MefxOptions) -> Result<String> {
    let files = discovery::discover_reports(opts)?;
    let report = load_reports(&files)?;
    let catalog = report.catalog();

    let mut out = String::new();
    if opts.list_parts {
        out.push_str(&output::list_parts(catalog, opts.verbose));
        out.push('\n');
    }
    for part in &opts.part_details {
        out.push_str(&output::part_details(catalog, part));
        out.push('\n');
    }
    for contract in &opts.exporters {
        out.push_str(&output::exporters(catalog, contract, opts.verbose));
        out.push('\n');
    }
    for contract in &opts.importers {
        out.push_str(&output::importers(catalog, contract, opts.verbose));
        out.push('\n');
    }

    if !opts.rejected.is_empty() {
        match run_rejections(opts, &report) {
            Ok(rejections) => out.push_str(&rejections),
            Err(err) if !err.is_fatal() => out.push_str(&output::render_error(&err)),
            Err(err) => return Err(err),
        }
    }

    if out.is_empty() {
        let _ = writeln!(
            out,
            "Loaded {} parts from {} reports; nothing was requested",
            catalog.len(),
            files.len()
        );
    }
    Ok(out)
}
