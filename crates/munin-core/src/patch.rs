// ── Path patching ──
//
// Copy-on-write update of a `Node` tree along a dotted key path. Every
// container on the path is shallow-cloned; everything off the path is
// shared with the input tree.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Node, NodeMap};

/// Produce a new tree with `value` placed at `path`.
///
/// - `None` or `""` shallow-merges `value`'s top-level keys into `root`.
///   A non-object `value` merges nothing.
/// - `a.b.c` walks the path: objects and arrays are shallow-cloned, any
///   other node (absent, `null`, scalar) is replaced by an empty object.
/// - Numeric segments index arrays. Index `len` appends; larger indices
///   pad with `null`, up to [`MAX_PADDING`] slots past the end. A
///   non-numeric segment, or an index beyond that bound, replaces the array
///   with an object.
///
/// `root` is never modified.
pub fn patch(root: &Node, path: Option<&str>, value: Node) -> Node {
    match path.filter(|p| !p.is_empty()) {
        None => merge(root, value),
        Some(path) => {
            let keys: Vec<&str> = path.split('.').collect();
            set_in(root, &keys, value)
        }
    }
}

/// [`patch`] over plain JSON values.
pub fn patch_json(root: &Value, path: Option<&str>, value: Value) -> Value {
    Value::from(patch(&Node::from(root.clone()), path, Node::from(value)))
}

fn merge(root: &Node, value: Node) -> Node {
    let mut map = match root {
        Node::Object(map) => NodeMap::clone(map),
        _ => NodeMap::new(),
    };
    if let Node::Object(incoming) = value {
        for (key, child) in incoming.iter() {
            map.insert(key.clone(), child.clone());
        }
    }
    Node::Object(Arc::new(map))
}

/// Largest number of `null` slots a single patch pads an array with.
pub const MAX_PADDING: usize = 1024;

fn set_in(current: &Node, keys: &[&str], value: Node) -> Node {
    let Some((key, rest)) = keys.split_first() else {
        return value;
    };
    let null = Node::Null;

    if let Node::Array(items) = current {
        if let Some(index) = key
            .parse::<usize>()
            .ok()
            .filter(|index| index.saturating_sub(items.len()) <= MAX_PADDING)
        {
            let mut items = Vec::clone(items);
            let next = set_in(items.get(index).unwrap_or(&null), rest, value);
            if index < items.len() {
                items[index] = next;
            } else {
                items.resize(index, Node::Null);
                items.push(next);
            }
            return Node::Array(Arc::new(items));
        }
    }

    let mut map = match current {
        Node::Object(map) => NodeMap::clone(map),
        _ => NodeMap::new(),
    };
    let next = set_in(map.get(*key).unwrap_or(&null), rest, value);
    map.insert((*key).to_owned(), next);
    Node::Object(Arc::new(map))
}

// ── Path/value assignments ──────────────────────────────────────────

/// A `path=value` assignment, as given on the command line.
///
/// The value is parsed as JSON when it can be (`3`, `true`, `{"a":1}`),
/// otherwise taken as a plain string. An empty path (`=value`) merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathValue {
    pub path: String,
    pub value: Node,
}

impl PathValue {
    pub fn apply(&self, root: &Node) -> Node {
        patch(root, Some(&self.path), self.value.clone())
    }
}

impl FromStr for PathValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, raw) = s.split_once('=').ok_or_else(|| CoreError::Validation {
            field: s.to_owned(),
            reason: "expected path=value".into(),
        })?;
        let value = serde_json::from_str::<Value>(raw)
            .map_or_else(|_| Node::from(raw), Node::from);
        Ok(Self {
            path: path.trim().to_owned(),
            value,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn node(value: Value) -> Node {
        Node::from(value)
    }

    #[test]
    fn sets_nested_key_and_keeps_siblings() {
        let root = node(json!({ "a": { "b": { "c": 1, "d": 2 } }, "e": [1] }));
        let next = patch(&root, Some("a.b.c"), Node::from(5));

        assert_eq!(
            Value::from(&next),
            json!({ "a": { "b": { "c": 5, "d": 2 } }, "e": [1] })
        );
        assert!(next.get("e").unwrap().same(root.get("e").unwrap()));
        assert!(!next.get_path("a.b").unwrap().same(root.get_path("a.b").unwrap()));
        assert_eq!(
            Value::from(&root),
            json!({ "a": { "b": { "c": 1, "d": 2 } }, "e": [1] })
        );
    }

    #[test]
    fn subtrees_off_the_path_keep_identity() {
        let root = node(json!({
            "name": "pg",
            "driver": { "alias": "postgres" },
            "keystone": { "login": "ops", "password": "x" }
        }));
        let next = patch(&root, Some("keystone.login"), Node::from("admin"));

        assert!(next.get("driver").unwrap().same(root.get("driver").unwrap()));
        assert!(!next.get("keystone").unwrap().same(root.get("keystone").unwrap()));
        assert_eq!(next.get_path("keystone.password"), root.get_path("keystone.password"));
    }

    #[test]
    fn missing_and_scalar_prefixes_become_objects() {
        let root = node(json!({ "a": 3 }));
        let next = patch(&root, Some("a.b.c"), Node::from(true));
        assert_eq!(Value::from(&next), json!({ "a": { "b": { "c": true } } }));

        let next = patch(&Node::Null, Some("x.y"), Node::from("v"));
        assert_eq!(Value::from(&next), json!({ "x": { "y": "v" } }));
    }

    #[test]
    fn empty_path_shallow_merges() {
        let root = node(json!({ "name": "ops", "keystone": { "login": "a" } }));
        let next = patch(&root, None, node(json!({ "name": "dev", "extra": 1 })));

        assert_eq!(
            Value::from(&next),
            json!({ "name": "dev", "keystone": { "login": "a" }, "extra": 1 })
        );
        assert!(next.get("keystone").unwrap().same(root.get("keystone").unwrap()));
        assert_eq!(patch(&root, Some(""), Node::from(1)), patch(&root, None, Node::from(2)));
    }

    #[test]
    fn merging_a_scalar_changes_nothing_but_identity() {
        let root = node(json!({ "a": { "b": 1 } }));
        let next = patch(&root, None, Node::from(9));
        assert_eq!(next, root);
        assert!(!next.same(&root));
        assert!(next.get("a").unwrap().same(root.get("a").unwrap()));
    }

    #[test]
    fn numeric_segments_index_arrays() {
        let root = node(json!({ "tags": ["a", { "k": 1 }, "c"] }));

        let next = patch(&root, Some("tags.1.k"), Node::from(2));
        assert_eq!(Value::from(&next), json!({ "tags": ["a", { "k": 2 }, "c"] }));
        let (old, new) = (root.get("tags").unwrap(), next.get("tags").unwrap());
        assert!(new.get("0").unwrap().same(old.get("0").unwrap()));
        assert!(new.get("2").unwrap().same(old.get("2").unwrap()));

        let appended = patch(&root, Some("tags.3"), Node::from("d"));
        assert_eq!(appended.get_path("tags.3").and_then(Node::as_str), Some("d"));

        let padded = patch(&root, Some("tags.5"), Node::from("f"));
        assert_eq!(
            Value::from(padded.get("tags").unwrap()),
            json!(["a", { "k": 1 }, "c", null, null, "f"])
        );
    }

    #[test]
    fn out_of_range_index_starts_an_object() {
        let root = node(json!({ "tags": ["a"] }));

        let next = patch(&root, Some("tags.18446744073709551615"), Node::from("x"));
        assert_eq!(
            Value::from(&next),
            json!({ "tags": { "18446744073709551615": "x" } })
        );

        let next = patch(&root, Some("tags.4000000000"), Node::from("x"));
        assert_eq!(Value::from(&next), json!({ "tags": { "4000000000": "x" } }));

        let path = format!("tags.{}", MAX_PADDING + 1);
        let edge = patch(&root, Some(&path), Node::from("x"));
        let tags = edge.get("tags").and_then(Node::as_array).unwrap();
        assert_eq!(tags.len(), MAX_PADDING + 2);
    }

    #[test]
    fn named_segment_on_array_starts_an_object() {
        let root = node(json!({ "tags": ["a"] }));
        let next = patch(&root, Some("tags.first"), Node::from("b"));
        assert_eq!(Value::from(&next), json!({ "tags": { "first": "b" } }));
    }

    #[test]
    fn prototype_like_keys_are_plain_data() {
        let root = node(json!({}));
        let next = patch(&root, Some("__proto__.polluted"), Node::from(true));
        let next = patch(&next, Some("constructor"), Node::from("x"));
        assert_eq!(
            Value::from(&next),
            json!({ "__proto__": { "polluted": true }, "constructor": "x" })
        );
    }

    #[test]
    fn patch_json_matches_node_patch() {
        let next = patch_json(&json!({ "a": 1 }), Some("b.c"), json!([1, 2]));
        assert_eq!(next, json!({ "a": 1, "b": { "c": [1, 2] } }));
    }

    #[test]
    fn path_values_parse_json_or_fall_back_to_strings() {
        let pv: PathValue = "keystone.login=ops".parse().unwrap();
        assert_eq!(pv.path, "keystone.login");
        assert_eq!(pv.value, Node::from("ops"));

        let pv: PathValue = "port=5432".parse().unwrap();
        assert_eq!(pv.value, Node::from(5432));

        let pv: PathValue = "driver={\"alias\":\"pg\"}".parse().unwrap();
        assert_eq!(pv.value.get("alias").and_then(Node::as_str), Some("pg"));

        assert!("no-equals".parse::<PathValue>().is_err());
    }
}
