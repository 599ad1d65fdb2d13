//! Organization hierarchy models

use super::id::string_or_number;
use serde::Deserialize;

/// A node of the organization tree as returned by `/group/list-for-self`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgNode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: String,

    pub children: Option<Vec<OrgNode>>,
}

impl OrgNode {
    /// Child nodes, empty when the server omitted them
    pub fn children(&self) -> &[OrgNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_nodes_with_numeric_ids() {
        let nodes: Vec<OrgNode> = serde_json::from_value(json!([
            {"id": 3, "name": "Head office", "children": [
                {"id": "7", "name": "Depot East"},
                {"id": 8, "name": "Depot West", "children": null}
            ]}
        ]))
        .unwrap();

        assert_eq!(nodes[0].id, "3");
        assert_eq!(nodes[0].children().len(), 2);
        assert_eq!(nodes[0].children()[0].id, "7");
        assert!(nodes[0].children()[1].children().is_empty());
    }
}
