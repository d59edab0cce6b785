use std::collections::HashMap;

use log::warn;

use crate::util::short_path;

use super::model::{CodeGraph, EdgeRef, GraphNode, NodeKind, RawGraph, RawNode};

fn node_kind(raw: &RawNode) -> NodeKind {
    let path = raw.path.clone().unwrap_or_default();
    match raw.node_type.as_str() {
        "file" => NodeKind::File { path },
        "function" => NodeKind::Function {
            path,
            external: raw.meta.external,
            parent_file: raw.meta.parent_file.clone(),
            start_line: raw.meta.start_line,
            end_line: raw.meta.end_line,
        },
        "class" => NodeKind::Class {
            path,
            start_line: raw.meta.start_line,
            end_line: raw.meta.end_line,
        },
        "import" => NodeKind::Import {
            source_file: raw.meta.source_file.clone().unwrap_or_default(),
        },
        other => NodeKind::Other {
            type_name: other.to_owned(),
        },
    }
}

fn node_label(raw: &RawNode) -> String {
    if let Some(label) = &raw.label
        && !label.is_empty()
    {
        return label.clone();
    }
    short_path(&raw.id).to_owned()
}

/// Edges whose endpoints do not resolve to a known node are dropped and
/// counted as warnings. Never fails; an empty graph is valid.
pub fn sanitize_graph(raw: &RawGraph) -> CodeGraph {
    let mut nodes = Vec::with_capacity(raw.nodes.len());
    let mut index_by_id = HashMap::with_capacity(raw.nodes.len());
    let mut warnings = Vec::new();

    for raw_node in &raw.nodes {
        if index_by_id.contains_key(&raw_node.id) {
            let message = format!("duplicate node id {:?}, keeping first occurrence", raw_node.id);
            warn!("{message}");
            warnings.push(message);
            continue;
        }

        index_by_id.insert(raw_node.id.clone(), nodes.len());
        nodes.push(GraphNode {
            id: raw_node.id.clone(),
            label: node_label(raw_node),
            kind: node_kind(raw_node),
        });
    }

    let mut edges = Vec::with_capacity(raw.edges.len());
    for raw_edge in &raw.edges {
        let from = index_by_id.get(&raw_edge.from).copied();
        let to = index_by_id.get(&raw_edge.to).copied();

        match (from, to) {
            (Some(from), Some(to)) => edges.push(EdgeRef {
                from,
                to,
                relation: raw_edge.relation.clone(),
                line: raw_edge.meta.line,
            }),
            (None, _) => {
                let message = format!(
                    "edge {:?} -> {:?} dropped: source node {:?} is missing",
                    raw_edge.from, raw_edge.to, raw_edge.from
                );
                warn!("{message}");
                warnings.push(message);
            }
            (_, None) => {
                let message = format!(
                    "edge {:?} -> {:?} dropped: target node {:?} is missing",
                    raw_edge.from, raw_edge.to, raw_edge.to
                );
                warn!("{message}");
                warnings.push(message);
            }
        }
    }

    CodeGraph {
        nodes,
        edges,
        index_by_id,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::{RawEdge, RawEdgeMeta, RawNodeMeta};
    use super::*;

    fn raw_node(id: &str, node_type: &str) -> RawNode {
        RawNode {
            id: id.to_owned(),
            label: None,
            node_type: node_type.to_owned(),
            path: Some(format!("src/{id}.py")),
            meta: RawNodeMeta::default(),
        }
    }

    fn raw_edge(from: &str, to: &str) -> RawEdge {
        RawEdge {
            from: from.to_owned(),
            to: to.to_owned(),
            relation: "calls".to_owned(),
            meta: RawEdgeMeta::default(),
        }
    }

    #[test]
    fn valid_graph_keeps_every_node_and_edge() {
        let raw = RawGraph {
            nodes: vec![raw_node("a", "file"), raw_node("b", "function"), raw_node("c", "class")],
            edges: vec![raw_edge("a", "b"), raw_edge("b", "c")],
        };

        let graph = sanitize_graph(&raw);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.warnings.is_empty());
    }

    #[test]
    fn dangling_edges_are_dropped_and_counted() {
        let raw = RawGraph {
            nodes: vec![raw_node("a", "file"), raw_node("b", "file")],
            edges: vec![
                raw_edge("a", "b"),
                raw_edge("a", "ghost"),
                raw_edge("phantom", "b"),
            ],
        };

        let graph = sanitize_graph(&raw);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.warnings.len(), 2);
        assert!(graph.warnings[0].contains("ghost"));
        assert!(graph.warnings[1].contains("phantom"));
    }

    #[test]
    fn every_sanitized_edge_resolves_to_a_node() {
        let raw = RawGraph {
            nodes: vec![raw_node("a", "file"), raw_node("b", "import")],
            edges: vec![raw_edge("a", "b"), raw_edge("b", "nope"), raw_edge("a", "a")],
        };

        let graph = sanitize_graph(&raw);
        for edge in &graph.edges {
            assert!(edge.from < graph.node_count());
            assert!(edge.to < graph.node_count());
        }
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = sanitize_graph(&RawGraph::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.warnings.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut second = raw_node("a", "class");
        second.label = Some("shadow".to_owned());
        let raw = RawGraph {
            nodes: vec![raw_node("a", "file"), second],
            edges: vec![raw_edge("a", "a")],
        };

        let graph = sanitize_graph(&raw);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].kind.name(), "file");
        assert_eq!(graph.warnings.len(), 1);
    }

    #[test]
    fn unknown_type_becomes_other() {
        let raw = RawGraph {
            nodes: vec![raw_node("x", "macro")],
            edges: Vec::new(),
        };

        let graph = sanitize_graph(&raw);
        assert_eq!(
            graph.nodes[0].kind,
            NodeKind::Other {
                type_name: "macro".to_owned()
            }
        );
    }
}
