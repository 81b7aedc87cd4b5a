// ── Record identity ──
//
// Connections, metrics and projects are keyed by numeric ids; rules are
// keyed by their string `ref`. `EntityId` covers both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Node;

/// Identifier of a console record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Ref(String),
}

impl EntityId {
    /// Read an identifier out of a record field. Numeric strings
    /// normalise to `Numeric`, so `"4"` and `4` address the same record.
    pub fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Number(n) => Some(
                n.as_i64()
                    .map_or_else(|| Self::Ref(n.to_string()), Self::Numeric),
            ),
            Node::String(s) if !s.is_empty() => Some(Self::from(&**s)),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Ref(_) => None,
        }
    }

    /// The id as it would be stored back into a record.
    pub fn to_node(&self) -> Node {
        match self {
            Self::Numeric(n) => Node::from(*n),
            Self::Ref(s) => Node::from(s.as_str()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Ref(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Ref(s.to_owned()), Self::Numeric)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Ref(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_strings_normalise() {
        assert_eq!(EntityId::from("42"), EntityId::Numeric(42));
        assert_eq!(EntityId::from("cpu.alert"), EntityId::Ref("cpu.alert".into()));
    }

    #[test]
    fn reads_ids_from_nodes() {
        assert_eq!(
            EntityId::from_node(&Node::from(json!(7))),
            Some(EntityId::Numeric(7))
        );
        assert_eq!(
            EntityId::from_node(&Node::from(json!("7"))),
            Some(EntityId::Numeric(7))
        );
        assert_eq!(EntityId::from_node(&Node::from(json!(""))), None);
        assert_eq!(EntityId::from_node(&Node::Null), None);
    }

    #[test]
    fn serde_is_untagged() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[3, "alerts.cpu"]"#).unwrap_or_default();
        assert_eq!(
            ids,
            vec![EntityId::Numeric(3), EntityId::Ref("alerts.cpu".into())]
        );
    }
}
