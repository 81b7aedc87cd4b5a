// ── List projection ──
//
// Derives the grouped view of a slice's list: filter by display name,
// stable sort by display name, then partition by a key in first-seen
// order. Pure and recomputed in full on every change.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Record;

/// Anything with a display name the projection can filter and sort on.
pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for Record {
    fn display_name(&self) -> &str {
        Record::display_name(self)
    }
}

/// A partition of the filtered, sorted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<T = Record> {
    pub key: String,
    pub items: Vec<T>,
}

/// Filter, sort and group `entities`.
///
/// The filter is a case-insensitive substring match; an empty filter
/// keeps everything. Ties in the sort keep their input order, and groups
/// appear in the order their first member does.
pub fn project<T, F>(entities: &[T], filter: &str, key_fn: F) -> Vec<Group<T>>
where
    T: Named + Clone,
    F: Fn(&T) -> String,
{
    let needle = filter.to_lowercase();
    let mut kept: Vec<&T> = entities
        .iter()
        .filter(|e| needle.is_empty() || e.display_name().to_lowercase().contains(&needle))
        .collect();
    kept.sort_by(|a, b| a.display_name().cmp(b.display_name()));

    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for entity in kept {
        groups.entry(key_fn(entity)).or_default().push(entity.clone());
    }
    groups
        .into_iter()
        .map(|(key, items)| Group { key, items })
        .collect()
}
