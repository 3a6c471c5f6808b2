//! Core types for visual graph output.

// Style constants

const NODE_BACKGROUND: &str = "#FFFFFF";
const EDGE_COLOR: &str = "#00FFFF";
const EDGE_THICKNESS: &str = "3";

// Categories

/// Category of a visual node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeCategory {
    /// A rejected part nobody expected to fail.
    Error,
    /// A rejected part listed in the whitelist.
    Whitelisted,
    /// Placeholder for a contract exported by a container node.
    Contract,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Whitelisted => "Whitelisted",
            Self::Contract => "Contract",
        }
    }
}

/// Category of a visual link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkCategory {
    /// Importer to the rejected part it imports.
    Edge,
    /// Container to one of its exported contracts.
    Contains,
}

impl LinkCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "Edge",
            Self::Contains => "Contains",
        }
    }
}

// Options

/// Options for graph collection.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Label nodes with the fully qualified part name.
    pub verbose: bool,
}

// Visual Node & Link

/// Node representation for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualNode {
    /// Unique id within the graph; the part name for rejected parts.
    pub id: String,
    /// Display label
    pub label: String,
    pub category: NodeCategory,
    /// Rejection level; `None` for contract placeholders.
    pub level: Option<usize>,
    /// Rendered as a container of its exported contracts.
    pub is_group: bool,
}

/// Directed link between two visual nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLink {
    pub source: String,
    pub target: String,
    /// Importing field name; `None` for containment links.
    pub label: Option<String>,
    pub category: LinkCategory,
}

// Styles

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget {
    Node,
    Link,
}

impl StyleTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Link => "Link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setter {
    pub property: &'static str,
    pub value: &'static str,
}

/// A cosmetic rule applied to every node or link of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub target: StyleTarget,
    /// Category the rule applies to; also used as the legend label.
    pub category: &'static str,
    pub setters: Vec<Setter>,
}

/// Whitelisted nodes get a white background, failure edges a thick cyan stroke.
pub fn default_styles() -> Vec<StyleRule> {
    vec![
        StyleRule {
            target: StyleTarget::Node,
            category: NodeCategory::Whitelisted.as_str(),
            setters: vec![Setter {
                property: "Background",
                value: NODE_BACKGROUND,
            }],
        },
        StyleRule {
            target: StyleTarget::Link,
            category: LinkCategory::Edge.as_str(),
            setters: vec![
                Setter {
                    property: "Stroke",
                    value: EDGE_COLOR,
                },
                Setter {
                    property: "StrokeThickness",
                    value: EDGE_THICKNESS,
                },
            ],
        },
    ]
}

// Visual Graph

/// A directed graph ready to be serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub links: Vec<VisualLink>,
    pub styles: Vec<StyleRule>,
}

impl VisualGraph {
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes standing for rejected parts, without contract placeholders.
    pub fn part_nodes(&self) -> impl Iterator<Item = &VisualNode> {
        self.nodes
            .iter()
            .filter(|node| node.category != NodeCategory::Contract)
    }

    /// Links between rejected parts, without containment links.
    pub fn failure_links(&self) -> impl Iterator<Item = &VisualLink> {
        self.links
            .iter()
            .filter(|link| link.category == LinkCategory::Edge)
    }

    /// Distinct node categories in first-use order.
    pub fn node_categories(&self) -> Vec<NodeCategory> {
        let mut categories = Vec::new();
        for node in &self.nodes {
            if !categories.contains(&node.category) {
                categories.push(node.category);
            }
        }
        categories
    }

    /// Distinct link categories in first-use order.
    pub fn link_categories(&self) -> Vec<LinkCategory> {
        let mut categories = Vec::new();
        for link in &self.links {
            if !categories.contains(&link.category) {
                categories.push(link.category);
            }
        }
        categories
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
