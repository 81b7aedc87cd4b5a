// ── Scoped reactive store ──
//
// One named slice of state driven by one reducer. The current state is
// published through a `watch` channel; dispatch runs the reducer under
// the channel's lock so two dispatches never interleave.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::trace;

use super::SliceState;
use crate::error::CoreError;
use crate::reducer::{Action, Reducer, WireAction};
use crate::stream::StateStream;

/// Cheaply cloneable handle to a slice store.
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    name: String,
    reducer: Box<dyn Reducer>,
    /// Bumped on every dispatch that changed the state.
    version: AtomicU64,
    state: watch::Sender<Arc<SliceState>>,
}

impl ScopedStore {
    /// A store with the default empty state. Prefer
    /// [`StoreRegistry::create`](super::StoreRegistry::create), which
    /// enforces unique slice names.
    pub fn new(name: impl Into<String>, reducer: impl Reducer + 'static) -> Self {
        let (state, _) = watch::channel(Arc::new(SliceState::default()));
        Self {
            inner: Arc::new(StoreInner {
                name: name.into(),
                reducer: Box::new(reducer),
                version: AtomicU64::new(0),
                state,
            }),
        }
    }

    /// Slice name this store is mounted under.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<SliceState> {
        self.inner.state.borrow().clone()
    }

    /// Number of state changes so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Apply `action` and return the resulting snapshot. Subscribers are
    /// only woken when the state actually changed.
    pub fn dispatch(&self, action: &Action) -> Arc<SliceState> {
        let inner = &self.inner;
        trace!(slice = %inner.name, action = action.kind(), phase = action.phase(), "dispatch");

        inner.state.send_if_modified(|current| {
            let next = inner.reducer.reduce(SliceState::clone(current), action);
            if next == **current {
                return false;
            }
            *current = Arc::new(next);
            inner.version.fetch_add(1, Ordering::AcqRel);
            true
        });
        self.state()
    }

    /// Decode and apply a serialized action. Unknown types leave the
    /// state untouched and are reported as errors.
    pub fn dispatch_wire(&self, wire: WireAction) -> Result<Arc<SliceState>, CoreError> {
        let action = Action::try_from(wire)?;
        Ok(self.dispatch(&action))
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.inner.state.subscribe())
    }
}

impl fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("name", &self.inner.name)
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{DEFAULT_LINK_BASE, Family, Node};
    use crate::reducer::{Status, panel_reducer};

    fn store() -> ScopedStore {
        ScopedStore::new("connection", panel_reducer(Family::Connection, DEFAULT_LINK_BASE))
    }

    fn list() -> Action {
        Action::FetchList(Status::Succeeded(Node::from(json!([
            { "id": 1, "name": "pg", "driver": { "alias": "postgres" } }
        ]))))
    }

    #[test]
    fn dispatch_applies_the_composed_reducer() {
        let store = store();
        let state = store.dispatch(&list());
        assert_eq!(state.list.len(), 1);
        assert_eq!(store.state().list.len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn no_op_actions_do_not_bump_the_version() {
        let store = store();
        store.dispatch(&list());
        store.dispatch(&Action::FetchList(Status::Pending));
        store.dispatch(&list());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = store();
        let other = store.clone();
        other.dispatch(&Action::SetFilter("pg".into()));
        assert_eq!(store.state().filter, "pg");
    }

    #[test]
    fn unknown_wire_actions_leave_state_alone() {
        let store = store();
        store.dispatch(&list());
        let before = store.state();
        let err = store.dispatch_wire(WireAction::new("@@redux/INIT")).unwrap_err();
        assert!(matches!(err, CoreError::UnknownAction { .. }));
        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn wire_actions_reach_the_reducer() {
        let store = store();
        let wire: WireAction =
            serde_json::from_value(json!({ "type": "TOGGLE_ALL" })).unwrap();
        let state = store.dispatch_wire(wire).unwrap();
        assert!(state.collapsed);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = store();
        let mut stream = store.subscribe();
        assert!(stream.current().list.is_empty());

        store.dispatch(&list());
        let next = stream.changed().await.unwrap();
        assert_eq!(next.list.len(), 1);
    }
}
