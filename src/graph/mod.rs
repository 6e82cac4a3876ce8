//! Graph documents: the JSON shape hosts load, plus a built-in sample.

mod load;
mod sample;

pub use load::{load_graph, parse_graph};
pub use sample::sample_graph;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::physics::{Link, NodeSpec, Simulation, SimulationConfig};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Photo,
    Location,
    Date,
    Tag,
    Description,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Location => "location",
            Self::Date => "date",
            Self::Tag => "tag",
            Self::Description => "description",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Collision radius; independent of how large the node is drawn.
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            category,
            image_url: None,
            radius: None,
            x: None,
            y: None,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn to_spec(&self) -> NodeSpec {
        let mut spec = NodeSpec::new(self.id.clone());
        if let (Some(x), Some(y)) = (self.x, self.y) {
            spec = spec.at(x, y);
        }
        if let Some(radius) = self.radius {
            spec = spec.with_radius(radius);
        }
        spec
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub stiffness: Option<f64>,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            distance: None,
            stiffness: None,
        }
    }

    pub fn to_link(&self) -> Link {
        Link {
            source: self.source.clone(),
            target: self.target.clone(),
            distance: self.distance,
            stiffness: self.stiffness,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub config: Option<SimulationConfig>,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Simulation seeded with this document's nodes and links, using its
    /// embedded config or the defaults.
    pub fn build_simulation(&self) -> Result<Simulation> {
        Simulation::with_graph(
            self.config.clone().unwrap_or_default(),
            self.nodes.iter().map(GraphNode::to_spec),
            self.links.iter().map(GraphLink::to_link),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_fall_back_to_other() {
        let node: GraphNode =
            serde_json::from_str(r#"{ "id": "n1", "type": "album" }"#).expect("parse");
        assert_eq!(node.category, Category::Other);
        assert_eq!(node.display_label(), "n1");
    }

    #[test]
    fn spec_uses_position_only_when_complete() {
        let mut node = GraphNode::new("p", "Photo", Category::Photo);
        node.x = Some(4.0);
        assert_eq!(node.to_spec().position, None);
        node.y = Some(-2.0);
        assert_eq!(node.to_spec().position, Some((4.0, -2.0)));
    }

    #[test]
    fn document_builds_simulation() {
        let document = GraphDocument {
            config: None,
            nodes: vec![
                GraphNode::new("a", "A", Category::Tag),
                GraphNode::new("b", "B", Category::Date),
            ],
            links: vec![GraphLink::new("a", "b")],
        };
        let simulation = document.build_simulation().expect("simulation");
        assert_eq!(simulation.snapshot().len(), 2);
        assert_eq!(simulation.snapshot().links.len(), 1);
    }
}
