//! Visual graph collection for rejection graphs.
//!
//! This crate turns a subset of a `RejectionGraph` into a format-agnostic
//! directed graph (nodes, links, categories, style rules) that serializers
//! such as `mefx-dgml` consume.
//!
//! # Module Structure
//!
//! - [`types`]: Core types (VisualGraph, VisualNode, VisualLink, StyleRule)
//! - [`collect`]: Collection from a node subset of a RejectionGraph

mod collect;
mod types;

pub use collect::collect_visual_graph;
pub use types::{
    CollectOptions, LinkCategory, NodeCategory, Setter, StyleRule, StyleTarget, VisualGraph,
    VisualLink, VisualNode, default_styles,
};
