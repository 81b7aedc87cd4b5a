use serde::{Deserialize, Serialize};

use super::{EntityId, Node};

/// A backend record (connection, metric, project or rule) as stored in a
/// slice. Field meaning is family-specific; see [`Family`](super::Family).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Node);

impl Record {
    pub fn new(node: Node) -> Self {
        Self(node)
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    /// Field lookup by dotted path.
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.0.get_path(path)
    }

    /// String field by dotted path.
    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Node::as_str)
    }

    /// Identifier stored under `field`.
    pub fn id_at(&self, field: &str) -> Option<EntityId> {
        self.get(field).and_then(EntityId::from_node)
    }

    /// Display name: `name`, falling back to `ref`, else empty.
    pub fn display_name(&self) -> &str {
        self.str_at("name")
            .or_else(|| self.str_at("ref"))
            .unwrap_or_default()
    }

    /// Same allocation as `other`.
    pub fn same(&self, other: &Record) -> bool {
        self.0.same(&other.0)
    }
}

impl From<Node> for Record {
    fn from(node: Node) -> Self {
        Self(node)
    }
}

impl From<serde_json::Value> for Record {
    fn from(value: serde_json::Value) -> Self {
        Self(Node::from(value))
    }
}
