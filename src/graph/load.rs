use std::fs;

use anyhow::{Context, Result};

use super::model::{CodeGraph, RawGraph};
use super::sanitize::sanitize_graph;

/// Parse failures are errors; graph-shape problems are warnings on the
/// returned graph.
pub fn load_code_graph(path: &str) -> Result<CodeGraph> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read graph file {path}"))?;
    let raw: RawGraph = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse graph file {path}"))?;

    Ok(sanitize_graph(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_wire_format() {
        let raw: RawGraph = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "src/app.py", "label": "app.py", "type": "file", "path": "src/app.py"},
                    {"id": "src/app.py::main", "type": "function", "path": "src/app.py",
                     "meta": {"start_line": 10, "end_line": 42, "parent_file": "src/app.py"}},
                    {"id": "os", "type": "import", "meta": {"source_file": "src/app.py"}}
                ],
                "edges": [
                    {"from": "src/app.py", "to": "src/app.py::main", "type": "contains"},
                    {"from": "src/app.py", "to": "os", "type": "imports", "meta": {"line": 3}}
                ]
            }"#,
        )
        .expect("wire format parses");

        let graph = sanitize_graph(&raw);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges[1].line, Some(3));
        assert_eq!(graph.edges[1].relation, "imports");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_code_graph("/does/not/exist.json").is_err());
    }
}
