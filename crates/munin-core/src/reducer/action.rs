// ── Typed intents ──

use crate::model::{EntityId, LookupKind, Node};

/// Lifecycle of an asynchronous request as seen by a reducer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status<T> {
    /// The request is in flight.
    #[default]
    Pending,
    /// The request completed with this payload.
    Succeeded(T),
    /// The request failed; the message is for display only.
    Failed(String),
}

/// Everything a slice reducer reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Record lifecycle ─────────────────────────────────────────────
    FetchList(Status<Node>),
    FetchOne(Status<Node>),
    Create(Status<Node>),
    Edit(Status<Node>),
    Delete { id: EntityId, status: Status<()> },
    SetFilter(String),
    FetchLookup { kind: LookupKind, status: Status<Node> },

    // ── Flex tables ──────────────────────────────────────────────────
    /// Register a collapsible sub-table; `None` inherits the global flag.
    RegisterTable { uid: String, collapsed: Option<bool> },
    ToggleTable { uid: String },
    ToggleAll,
}

impl Action {
    /// Wire `type` string of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FetchList(_) => "FETCH_LIST",
            Self::FetchOne(_) => "FETCH_ONE",
            Self::Create(_) => "CREATE",
            Self::Edit(_) => "EDIT",
            Self::Delete { .. } => "DELETE",
            Self::SetFilter(_) => "SET_FILTER",
            Self::FetchLookup { kind, .. } => kind.wire_type(),
            Self::RegisterTable { .. } => "REGISTER_FLEX_TABLE",
            Self::ToggleTable { .. } => "TOGGLE_FLEX_TABLE",
            Self::ToggleAll => "TOGGLE_ALL",
        }
    }

    /// Short status label for traces.
    pub fn phase(&self) -> &'static str {
        fn label<T>(status: &Status<T>) -> &'static str {
            match status {
                Status::Pending => "pending",
                Status::Succeeded(_) => "success",
                Status::Failed(_) => "error",
            }
        }
        match self {
            Self::FetchList(s) | Self::FetchOne(s) | Self::Create(s) | Self::Edit(s) => label(s),
            Self::FetchLookup { status, .. } => label(status),
            Self::Delete { status, .. } => label(status),
            Self::SetFilter(_)
            | Self::RegisterTable { .. }
            | Self::ToggleTable { .. }
            | Self::ToggleAll => "sync",
        }
    }
}
