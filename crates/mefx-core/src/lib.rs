pub mod builder;
pub mod graph;
pub mod node;
pub mod part;
pub mod report;
pub mod trace;
pub mod whitelist;

pub use builder::build_graph;
pub use graph::RejectionGraph;
pub use mefx_error::{Error, ErrorKind, Result};
pub use node::{CONSTRUCTOR_LABEL, NodeId, RejectionEdge, RejectionNode};
pub use part::{ImportSite, PartCatalog, PartRef};
pub use report::{CompositionReport, ErrorLevel, Rejection, RejectionEntry};
pub use trace::{FailureListing, Frontier, LevelGroup, RejectionTrace, list_all_failures, trace_failure};
pub use whitelist::{
    ExactWhitelist, RegexWhitelist, Whitelist, WhitelistMode, load_whitelist,
};
