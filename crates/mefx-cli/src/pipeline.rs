//! Rejection pipeline: load reports → build graph → trace → report and export.

use std::fmt::Write;
use std::time::Instant;

use tracing::{info, warn};

use mefx_collect::{CollectOptions, collect_visual_graph};
use mefx_core::{
    CompositionReport, ErrorKind, ExactWhitelist, NodeId, RejectionGraph, Whitelist, build_graph,
    list_all_failures, load_whitelist, trace_failure,
};
use mefx_dgml::export_graph;
use mefx_error::Result;

use crate::MefxOptions;
use crate::output::{
    ALL_ERRORS_STEM, graph_file_path, render_error, render_listing, render_not_found,
    render_trace,
};

/// Load every report and merge them into one, in the given order.
pub fn load_reports(files: &[String]) -> Result<CompositionReport> {
    let load_start = Instant::now();
    let mut merged = CompositionReport::default();
    for file in files {
        merged.merge(CompositionReport::load(file)?);
    }
    info!(
        "Report loading: {:.2}s ({} parts, {} levels)",
        load_start.elapsed().as_secs_f64(),
        merged.catalog().len(),
        merged.raw_levels().len()
    );
    Ok(merged)
}

/// The whitelist strategy picked by the options.
///
/// An unreadable whitelist file is reported to the user and the run goes on
/// with an empty whitelist.
fn select_whitelist(opts: &MefxOptions, out: &mut String) -> Box<dyn Whitelist> {
    let Some(path) = opts.whitelist.as_ref() else {
        return Box::new(ExactWhitelist::new());
    };
    match load_whitelist(path, opts.whitelist_mode) {
        Ok(whitelist) => whitelist,
        Err(err) => {
            warn!(error = %err, "whitelist not loaded");
            let _ = writeln!(
                out,
                "Couldn't read whitelist file {}: {}\n",
                path.display(),
                err.message()
            );
            Box::new(ExactWhitelist::new())
        }
    }
}

/// Save the graph restricted to `subset`, if a graph directory was requested.
fn save_graph(
    opts: &MefxOptions,
    graph: &RejectionGraph<'_>,
    subset: &[NodeId],
    stem: &str,
    out: &mut String,
) {
    let Some(dir) = opts.graph_dir.as_deref() else {
        return;
    };

    let (path, notice) = graph_file_path(dir, stem, opts.graph_format);
    if let Some(notice) = notice {
        let _ = writeln!(out, "{notice}");
    }

    let visual = collect_visual_graph(
        graph,
        subset,
        &CollectOptions {
            verbose: opts.verbose,
        },
    );
    match export_graph(&visual, &path) {
        Ok(_) => {
            let _ = writeln!(out, "Saved rejection graph to {}\n", path.display());
        }
        Err(err) if err.kind() == ErrorKind::InvalidExtension => {
            warn!(error = %err, "graph not saved");
            let _ = writeln!(out, "{}\n", err.message());
        }
        Err(err) => {
            warn!(error = %err, "graph not saved");
            let _ = writeln!(
                out,
                "Couldn't save rejection graph to {}: {}\n",
                path.display(),
                err.message()
            );
        }
    }
}

/// Build the rejection graph and answer every `--rejected` request.
///
/// Unknown part names and export problems are reported in the output. Graph
/// invariant violations abort the run.
pub fn run_rejections(opts: &MefxOptions, report: &CompositionReport) -> Result<String> {
    let mut out = String::new();
    let whitelist = select_whitelist(opts, &mut out);

    let build_start = Instant::now();
    let levels = match report.error_levels() {
        Ok(levels) => levels,
        Err(err) if !err.is_fatal() => {
            warn!(error = %err, "report levels not resolved");
            out.push_str(&render_error(&err));
            return Ok(out);
        }
        Err(err) => return Err(err),
    };
    let graph = build_graph(&levels, whitelist.as_ref())?;
    info!(
        "Graph building: {:.2}s",
        build_start.elapsed().as_secs_f64()
    );

    if opts.lists_all_rejections() {
        let listing = list_all_failures(&graph);
        out.push_str(&render_listing(&graph, &listing, opts.verbose));
        save_graph(opts, &graph, &listing.visited(), ALL_ERRORS_STEM, &mut out);
        return Ok(out);
    }

    for name in &opts.rejected {
        match trace_failure(&graph, name) {
            Ok(trace) => {
                out.push_str(&render_trace(&graph, &trace, opts.verbose));
                save_graph(opts, &graph, &trace.visited(), name, &mut out);
            }
            Err(err) if err.kind() == ErrorKind::PartNotFound => {
                out.push_str(&render_not_found(name));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mefx_core::{PartCatalog, PartRef, RejectionEntry};
    use std::path::PathBuf;

    fn report() -> CompositionReport {
        let catalog: PartCatalog = [
            PartRef::new("PartA"),
            PartRef::new("PartB").with_import(mefx_core::ImportSite::new("PartA")),
        ]
        .into_iter()
        .collect();
        CompositionReport::new(
            catalog,
            vec![
                vec![RejectionEntry::new("msg1", "PartA")],
                vec![RejectionEntry::new("msg2", "PartB")],
            ],
        )
    }

    #[test]
    fn test_unknown_part_is_reported_not_raised() {
        let opts = MefxOptions {
            rejected: vec!["Ghost".to_string(), "PartB".to_string()],
            ..Default::default()
        };
        let out = run_rejections(&opts, &report()).unwrap();
        assert!(out.starts_with("No rejection issues associated with Ghost"));
        assert!(out.contains("Printing Rejection Graph Info for PartB"));
    }

    #[test]
    fn test_unreadable_whitelist_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let opts = MefxOptions {
            rejected: vec!["all".to_string()],
            whitelist: Some(dir.path().join("missing.txt")),
            ..Default::default()
        };
        let out = run_rejections(&opts, &report()).unwrap();
        assert!(out.starts_with("Couldn't read whitelist file"));
        assert!(out.contains("Listing all the rejection issues"));
    }

    #[test]
    fn test_graph_saved_under_directory() {
        let dir = tempfile::tempdir().unwrap();
        let opts = MefxOptions {
            rejected: vec!["PartB".to_string()],
            graph_dir: Some(PathBuf::from(dir.path())),
            ..Default::default()
        };
        let out = run_rejections(&opts, &report()).unwrap();
        let path = dir.path().join("PartB.dgml");
        assert!(path.exists());
        assert!(out.contains(&format!("Saved rejection graph to {}", path.display())));
    }

    #[test]
    fn test_unwritable_graph_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("PartB.dgml");
        std::fs::create_dir(&blocked).unwrap();
        let opts = MefxOptions {
            rejected: vec!["PartB".to_string()],
            graph_dir: Some(PathBuf::from(dir.path())),
            ..Default::default()
        };
        let out = run_rejections(&opts, &report()).unwrap();
        assert!(out.contains("Printing Rejection Graph Info for PartB"));
        assert!(out.contains(&format!(
            "Couldn't save rejection graph to {}: ",
            blocked.display()
        )));
    }

    #[test]
    fn test_unknown_level_part_keeps_whitelist_notice() {
        let dir = tempfile::tempdir().unwrap();
        let report = CompositionReport::new(
            [PartRef::new("PartA")].into_iter().collect(),
            vec![vec![RejectionEntry::new("m", "Ghost")]],
        );
        let opts = MefxOptions {
            rejected: vec!["all".to_string()],
            whitelist: Some(dir.path().join("missing.txt")),
            ..Default::default()
        };
        let out = run_rejections(&opts, &report).unwrap();
        assert!(out.starts_with("Couldn't read whitelist file"));
        assert!(out.contains("Error: PartNotFound (reportable)"));
        assert!(out.contains("no part named 'Ghost'"));
    }
}
