use std::fs;

use mefx_collect::{CollectOptions, collect_visual_graph};
use mefx_core::{ErrorKind, ExactWhitelist, ImportSite, PartRef, Rejection, build_graph, trace_failure};
use mefx_dgml::{GraphFormat, export_graph};
use pretty_assertions::assert_eq;

fn scenario() -> (PartRef, PartRef) {
    let a = PartRef::new("PartA");
    let b = PartRef::new("PartB")
        .with_import(ImportSite::new("IPartA").with_site_type("PartA").with_field("Dependency"));
    (a, b)
}

#[test]
fn trace_subset_exports_two_nodes_and_one_link() {
    let (a, b) = scenario();
    let levels = vec![
        vec![Rejection { message: "msg1", part: &a }],
        vec![Rejection { message: "msg2", part: &b }],
    ];
    let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();
    let trace = trace_failure(&graph, "PartB").unwrap();
    let visual = collect_visual_graph(&graph, &trace.visited(), &CollectOptions::default());

    let dir = tempfile::tempdir().unwrap();

    let bad = dir.path().join("PartB.xyz");
    let err = export_graph(&visual, &bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidExtension);
    assert!(!bad.exists());

    let good = dir.path().join("PartB.dgml");
    assert_eq!(export_graph(&visual, &good).unwrap(), GraphFormat::Dgml);

    let text = fs::read_to_string(&good).unwrap();
    assert_eq!(text.matches("<Node ").count(), 2);
    assert_eq!(text.matches("<Link ").count(), 1);
    assert!(text.contains(r#"Source="PartB" Target="PartA""#));
}

#[test]
fn dot_extension_writes_graphviz() {
    let (a, b) = scenario();
    let levels = vec![
        vec![Rejection { message: "msg1", part: &a }],
        vec![Rejection { message: "msg2", part: &b }],
    ];
    let graph = build_graph(&levels, &ExactWhitelist::new()).unwrap();
    let subset: Vec<_> = graph.node_ids().collect();
    let visual = collect_visual_graph(&graph, &subset, &CollectOptions::default());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AllErrors.dot");
    assert_eq!(export_graph(&visual, &path).unwrap(), GraphFormat::Dot);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("digraph rejections {"));
    assert!(text.contains("n1 -> n0"));
}

#[test]
fn unwritable_destination_is_reported() {
    let visual = mefx_collect::VisualGraph::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("graph.dgml");

    let err = export_graph(&visual, &path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert!(!err.is_fatal());
}
