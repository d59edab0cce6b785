use std::collections::HashMap;

use serde::Deserialize;

/// Unknown `type` strings from the provider degrade to `Other`.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    File {
        path: String,
    },
    Function {
        path: String,
        external: bool,
        parent_file: Option<String>,
        start_line: Option<u32>,
        end_line: Option<u32>,
    },
    Class {
        path: String,
        start_line: Option<u32>,
        end_line: Option<u32>,
    },
    Import {
        source_file: String,
    },
    Other {
        type_name: String,
    },
}

impl NodeKind {
    pub fn name(&self) -> &str {
        match self {
            Self::File { .. } => "file",
            Self::Function { .. } => "function",
            Self::Class { .. } => "class",
            Self::Import { .. } => "import",
            Self::Other { type_name } => type_name.as_str(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

/// Endpoints are resolved node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRef {
    pub from: usize,
    pub to: usize,
    pub relation: String,
    pub line: Option<u32>,
}

/// Built once per load by the sanitizer. Node order is the provider's order.
#[derive(Clone, Debug, Default)]
pub struct CodeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgeRef>,
    pub index_by_id: HashMap<String, usize>,
    pub warnings: Vec<String>,
}

impl CodeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges touching `index`, with the neighbor index.
    pub fn edges_of(&self, index: usize) -> impl Iterator<Item = (&EdgeRef, usize)> {
        self.edges.iter().filter_map(move |edge| {
            if edge.from == index {
                Some((edge, edge.to))
            } else if edge.to == index {
                Some((edge, edge.from))
            } else {
                None
            }
        })
    }
}

// Wire format as supplied by the analysis provider.

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNodeMeta {
    pub external: bool,
    pub parent_file: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub source_file: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub meta: RawNodeMeta,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawEdgeMeta {
    pub line: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type", default)]
    pub relation: String,
    #[serde(default)]
    pub meta: RawEdgeMeta,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}
