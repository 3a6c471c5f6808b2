//! Composition report discovery.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use ignore::WalkBuilder;
use tracing::{debug, info};

use mefx_error::{Error, ErrorKind, Result};

use crate::MefxOptions;

const REPORT_EXTENSION: &str = "json";

/// Directories that never hold composition reports.
fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        "target" | "node_modules" | "obj" | "packages" | "vendor" | "third_party"
    )
}

fn is_report(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION))
}

/// Discover composition report files.
///
/// Explicit `opts.files` must exist; `opts.dirs` are walked for
/// `*.json` files. Each path is returned once, in discovery order.
pub fn discover_reports(opts: &MefxOptions) -> Result<Vec<String>> {
    let discovery_start = Instant::now();

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut add_path = |path: &str| {
        if seen.insert(path.to_string()) {
            files.push(path.to_string());
        }
    };

    for file in &opts.files {
        if !Path::new(file).is_file() {
            return Err(Error::file_not_found(file.as_str())
                .with_operation("discovery::discover_reports"));
        }
        add_path(file);
    }

    for dir in &opts.dirs {
        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(true)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let Some(file_type) = entry.file_type() else {
                    return true;
                };
                if !file_type.is_dir() {
                    return true;
                }
                let Some(name) = entry.file_name().to_str() else {
                    return true;
                };
                !should_skip_dir(&name.to_ascii_lowercase())
            });

        for entry in builder.build() {
            let entry = entry.map_err(|err| {
                Error::new(
                    ErrorKind::TraversalFailed,
                    format!("failed to walk directory {dir}: {err}"),
                )
                .with_operation("discovery::discover_reports")
                .with_context("dir", dir.clone())
            })?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if is_report(entry.path()) {
                debug!(path = %entry.path().display(), "found composition report");
                add_path(&entry.path().to_string_lossy());
            }
        }
    }

    info!(
        "Report discovery: {:.2}s ({} files)",
        discovery_start.elapsed().as_secs_f64(),
        files.len()
    );

    if files.is_empty() {
        return Err(Error::invalid_argument(
            "No composition reports found. Pass report files with --file or a folder of *.json reports with --dir.",
        )
        .with_operation("discovery::discover_reports"));
    }

    Ok(files)
}
