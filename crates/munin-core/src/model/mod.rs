// ── Domain model ──
//
// The persistent tree every record and draft is made of, record identity,
// and the static per-family and per-lookup metadata.

pub mod entity_id;
pub mod family;
pub mod lookup;
pub mod node;
pub mod record;

pub use entity_id::EntityId;
pub use family::Family;
pub use lookup::{DEFAULT_LINK_BASE, Lookup, LookupKind, SelectOption, SelectionSpec};
pub use node::{Node, NodeMap};
pub use record::Record;
