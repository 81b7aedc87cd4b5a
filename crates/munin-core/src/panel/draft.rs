// ── Drafts ──
//
// The editable copy behind a detail form or creation popup. Every change
// goes through the path patcher, so unmodified subtrees stay shared with
// the record the draft started from.

use crate::model::{EntityId, Family, Node, Record};
use crate::patch::patch;

/// Creation template of a family's popup form.
pub fn template(family: Family) -> Node {
    let empty = || Node::from("");
    match family {
        Family::Connection => Node::from_pairs([("name", empty()), ("driver", empty())]),
        Family::Metric => Node::from_pairs([
            ("name", empty()),
            ("query", empty()),
            ("project", empty()),
            ("connection", empty()),
        ]),
        Family::Project => Node::from_pairs([
            ("name", empty()),
            (
                "keystone",
                Node::from_pairs([("login", empty()), ("password", empty())]),
            ),
        ]),
        Family::Rule => Node::from_pairs([
            ("ref", empty()),
            ("pack", empty()),
            ("trigger", empty()),
            ("action", empty()),
        ]),
    }
}

/// An in-progress edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    family: Family,
    original: Option<Record>,
    node: Node,
}

impl Draft {
    /// Start editing `record`.
    pub fn begin(family: Family, record: &Record) -> Self {
        Self {
            family,
            original: Some(record.clone()),
            node: record.node().clone(),
        }
    }

    /// Start a creation draft from the family's template.
    pub fn blank(family: Family) -> Self {
        Self {
            family,
            original: None,
            node: template(family),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Set `value` at the dotted `path`; `None` merges at the root.
    pub fn change(&mut self, path: Option<&str>, value: impl Into<Node>) {
        self.node = patch(&self.node, path, value.into());
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn original(&self) -> Option<&Record> {
        self.original.as_ref()
    }

    /// Whether the draft differs from its starting point. Creation drafts
    /// compare against the template.
    pub fn is_dirty(&self) -> bool {
        match &self.original {
            Some(record) => *record.node() != self.node,
            None => self.node != template(self.family),
        }
    }

    /// Identifier of the record being edited, if it has one.
    pub fn id(&self) -> Option<EntityId> {
        self.node
            .get(self.family.id_field())
            .and_then(EntityId::from_node)
    }

    pub fn into_node(self) -> Node {
        self.node
    }
}
