// ── Persistent record tree ──
//
// Records and drafts are JSON-shaped trees whose containers sit behind
// `Arc`s. Cloning a node is cheap, and an update rebuilds only the spine
// it touches, so untouched subtrees stay pointer-identical between
// revisions. Change detection relies on that through `Node::same`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Ordered mapping of a record object.
pub type NodeMap = IndexMap<String, Node>;

/// A JSON-like value with shared, copy-on-write containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Array(Arc<Vec<Node>>),
    Object(Arc<NodeMap>),
}

impl Node {
    /// An empty object.
    pub fn object() -> Self {
        Self::Object(Arc::new(NodeMap::new()))
    }

    /// Build an object from key/value pairs, keeping their order.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Self::Object(Arc::new(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Reference identity: both nodes are the same allocation (containers)
    /// or equal leaves (scalars).
    pub fn same(&self, other: &Node) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (a, b) => a == b,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&NodeMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Child of an object by key, or of an array by numeric key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Object(map) => map.get(key),
            Self::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Follow a dotted path (`driver.alias`, `rules.0.ref`).
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, key| node.get(key))
    }

    /// Plain-text rendering of a scalar; containers render as JSON,
    /// `null` as the empty string.
    pub fn text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.to_string(),
            Self::Array(_) | Self::Object(_) => Value::from(self).to_string(),
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s.into()),
            Value::Array(items) => Self::Array(Arc::new(items.into_iter().map(Node::from).collect())),
            Value::Object(map) => Self::Object(Arc::new(
                map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
            )),
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.to_string()),
            Node::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::from(&node)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::from(self))
    }
}

// ── Serde ───────────────────────────────────────────────────────────

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn value_round_trip_keeps_key_order() {
        let value = json!({ "name": "pg", "driver": { "alias": "postgres" }, "id": 3 });
        let node = Node::from(value.clone());
        let keys: Vec<_> = node.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["name", "driver", "id"]);
        assert_eq!(Value::from(&node), value);
    }

    #[test]
    fn dotted_paths_walk_objects_and_arrays() {
        let node = Node::from(json!({ "driver": { "alias": "influx" }, "tags": ["a", "b"] }));
        assert_eq!(node.get_path("driver.alias").and_then(Node::as_str), Some("influx"));
        assert_eq!(node.get_path("tags.1").and_then(Node::as_str), Some("b"));
        assert!(node.get_path("driver.alias.deeper").is_none());
        assert!(node.get_path("").unwrap().same(&node));
    }

    #[test]
    fn clones_share_containers() {
        let node = Node::from(json!({ "a": { "b": 1 } }));
        let copy = node.clone();
        assert!(copy.same(&node));
        assert!(copy.get("a").unwrap().same(node.get("a").unwrap()));
    }

    #[test]
    fn equal_but_distinct_trees_are_not_the_same() {
        let a = Node::from(json!({ "x": 1 }));
        let b = Node::from(json!({ "x": 1 }));
        assert_eq!(a, b);
        assert!(!a.same(&b));
    }

    #[test]
    fn text_renders_scalars_plainly() {
        assert_eq!(Node::from("ops").text(), "ops");
        assert_eq!(Node::from(7).text(), "7");
        assert_eq!(Node::Null.text(), "");
    }

    #[test]
    fn serializes_like_json() {
        let node = Node::from(json!({ "id": 1, "list": [true, null] }));
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"id":1,"list":[true,null]}"#
        );
    }
}
