// munin-core: State engine between munin-api and the console shell.
//
// Records live in persistent `Node` trees edited through the path
// patcher. Each panel owns a scoped store whose reducer composes the
// generic flex-table reducer with a family's domain reducer. `Console`
// drives requests and dispatches; notification, routing and credentials
// are collaborator traits supplied by the shell.

pub mod collab;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod panel;
pub mod patch;
pub mod projection;
pub mod reducer;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collab::{CredentialStore, HistoryRouter, Notifier, Router, StaticCredentials, TracingNotifier};
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::CoreError;
pub use model::{
    EntityId, Family, Lookup, LookupKind, Node, Record, SelectOption, SelectionSpec,
};
pub use panel::{Draft, Location, Navigator, validate};
pub use patch::{PathValue, patch, patch_json};
pub use projection::{Group, project};
pub use reducer::{Action, Composed, DomainReducer, Reducer, Status, TableReducer, WireAction, compose};
pub use store::{ScopedStore, SliceState, StoreRegistry, TableState};
pub use stream::StateStream;
