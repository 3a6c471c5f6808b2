use std::collections::BTreeSet;

use crate::part::PartRef;

/// Edge label used when an import has no member name, i.e. it is satisfied
/// through a constructor parameter.
pub const CONSTRUCTOR_LABEL: &str = "Constructor";

/// Index of a node inside its `RejectionGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed, labeled reference to another node of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RejectionEdge {
    pub target: NodeId,
    /// Importing field name, or `CONSTRUCTOR_LABEL`.
    pub label: String,
}

impl RejectionEdge {
    pub fn new(target: NodeId, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
        }
    }
}

/// A rejected part and its position in the rejection graph.
#[derive(Debug, Clone)]
pub struct RejectionNode<'p> {
    part: &'p PartRef,
    /// Depth in the engine's error stack, starting at 1.
    level: usize,
    whitelisted: bool,
    /// Rejection messages in the order the engine reported them, deduplicated.
    messages: Vec<String>,
    /// Rejected parts that import this one.
    causes_failure_in: BTreeSet<RejectionEdge>,
    /// Rejected parts this one imports.
    caused_by: BTreeSet<RejectionEdge>,
    /// Contracts exported besides the part's own identity.
    exported_contracts: Vec<String>,
}

impl<'p> RejectionNode<'p> {
    pub fn new(part: &'p PartRef, message: impl Into<String>, level: usize) -> Self {
        debug_assert!(level >= 1, "levels start at 1");
        Self {
            part,
            level,
            whitelisted: false,
            messages: vec![message.into()],
            causes_failure_in: BTreeSet::new(),
            caused_by: BTreeSet::new(),
            exported_contracts: part.non_identity_exports().map(str::to_string).collect(),
        }
    }

    pub fn part(&self) -> &'p PartRef {
        self.part
    }

    pub fn name(&self) -> &'p str {
        self.part.name()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_whitelisted(&self) -> bool {
        self.whitelisted
    }

    pub fn set_whitelisted(&mut self, value: bool) {
        self.whitelisted = value;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    pub fn caused_by(&self) -> &BTreeSet<RejectionEdge> {
        &self.caused_by
    }

    pub fn causes_failure_in(&self) -> &BTreeSet<RejectionEdge> {
        &self.causes_failure_in
    }

    /// Record that `target`, which this part imports, was rejected too.
    pub fn add_cause_edge(&mut self, target: NodeId, label: impl Into<String>) {
        self.caused_by.insert(RejectionEdge::new(target, label));
    }

    /// Record that `target` imports this part and failed because of it.
    pub fn add_effect_edge(&mut self, target: NodeId, label: impl Into<String>) {
        self.causes_failure_in.insert(RejectionEdge::new(target, label));
    }

    /// A node with no rejected imports is a root cause.
    pub fn is_leaf(&self) -> bool {
        self.caused_by.is_empty()
    }

    pub fn has_exports(&self) -> bool {
        !self.exported_contracts.is_empty()
    }

    pub fn exported_contracts(&self) -> &[String] {
        &self.exported_contracts
    }
}
