// ── Scoped stores ──
//
// Per-panel slices of state, each driven by a composed reducer and
// published through `watch` channels.

mod registry;
mod scoped;
mod state;

pub use registry::StoreRegistry;
pub use scoped::ScopedStore;
pub use state::{SliceState, TableState};
