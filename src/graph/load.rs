use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::GraphDocument;

pub fn load_graph(path: &Path) -> Result<GraphDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    parse_graph(&raw).with_context(|| format!("invalid graph file {}", path.display()))
}

pub fn parse_graph(raw: &str) -> Result<GraphDocument> {
    let document: GraphDocument = serde_json::from_str(raw).context("invalid graph JSON")?;

    if let Some(config) = &document.config {
        config.validate().context("invalid \"config\" section")?;
    }

    let mut seen = std::collections::HashSet::with_capacity(document.nodes.len());
    for node in &document.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(anyhow!("duplicate node id `{}`", node.id));
        }
    }

    Ok(document)
}
