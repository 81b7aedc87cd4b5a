// ── Slice state ──

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{EntityId, Family, Lookup, LookupKind, Record};
use crate::projection::Group;

/// Collapse flag of one flex table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableState {
    pub collapsed: bool,
}

/// State of one panel's slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SliceState {
    /// Records as last fetched, in backend order.
    pub list: Vec<Record>,
    /// The record open in the detail view.
    pub singleton: Option<Record>,
    /// Grouped view of `list`; `None` until the first list arrives.
    pub groups: Option<Vec<Group>>,
    pub filter: String,
    pub lookups: BTreeMap<LookupKind, Lookup>,
    /// Flex-table registry, by uid.
    pub tables: IndexMap<String, TableState>,
    /// Global collapse flag, flipped by toggle-all.
    pub collapsed: bool,
}

impl SliceState {
    /// Collapse flag of `uid`, defaulting to the global one.
    pub fn is_collapsed(&self, uid: &str) -> bool {
        self.tables.get(uid).map_or(self.collapsed, |t| t.collapsed)
    }

    pub fn lookup(&self, kind: LookupKind) -> Option<&Lookup> {
        self.lookups.get(&kind)
    }

    /// The list record carrying `id` under the family's id field.
    pub fn find(&self, family: Family, id: &EntityId) -> Option<&Record> {
        self.list
            .iter()
            .find(|r| family.id_of(r).as_ref() == Some(id))
    }
}
