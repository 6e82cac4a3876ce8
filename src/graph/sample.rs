use super::{Category, GraphDocument, GraphLink, GraphNode};

/// Small photo library graph used when no input file is given.
pub fn sample_graph() -> GraphDocument {
    let nodes = [
        ("photo-harbour", "Harbour at dusk", Category::Photo),
        ("photo-market", "Market stalls", Category::Photo),
        ("photo-ridge", "Ridge trail", Category::Photo),
        ("photo-tram", "Tram 28", Category::Photo),
        ("loc-lisbon", "Lisbon", Category::Location),
        ("loc-sintra", "Sintra", Category::Location),
        ("date-2023-06", "June 2023", Category::Date),
        ("date-2023-07", "July 2023", Category::Date),
        ("tag-sea", "sea", Category::Tag),
        ("tag-street", "street", Category::Tag),
        ("tag-hiking", "hiking", Category::Tag),
        ("desc-golden", "Golden hour over the water", Category::Description),
    ]
    .into_iter()
    .map(|(id, label, category)| {
        let mut node = GraphNode::new(id, label, category);
        if category == Category::Photo {
            node.image_url = Some(format!("{id}.jpg"));
        }
        node
    })
    .collect();

    let links = [
        ("photo-harbour", "loc-lisbon"),
        ("photo-harbour", "date-2023-06"),
        ("photo-harbour", "tag-sea"),
        ("photo-harbour", "desc-golden"),
        ("photo-market", "loc-lisbon"),
        ("photo-market", "date-2023-06"),
        ("photo-market", "tag-street"),
        ("photo-tram", "loc-lisbon"),
        ("photo-tram", "date-2023-07"),
        ("photo-tram", "tag-street"),
        ("photo-ridge", "loc-sintra"),
        ("photo-ridge", "date-2023-07"),
        ("photo-ridge", "tag-hiking"),
    ]
    .into_iter()
    .map(|(source, target)| GraphLink::new(source, target))
    .collect();

    GraphDocument {
        config: None,
        nodes,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_links_resolve() {
        let graph = sample_graph();
        for link in &graph.links {
            assert!(graph.node(&link.source).is_some(), "{}", link.source);
            assert!(graph.node(&link.target).is_some(), "{}", link.target);
        }
    }
}
