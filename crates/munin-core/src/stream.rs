// ── Reactive state streams ──
//
// Subscription type for consuming slice changes from a `ScopedStore`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::SliceState;

/// A subscription to one slice.
///
/// Provides point-in-time snapshot access and change notification via
/// [`changed`](Self::changed) or by converting into a `Stream`.
pub struct StateStream {
    current: Arc<SliceState>,
    receiver: watch::Receiver<Arc<SliceState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<SliceState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Arc<SliceState> {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> Arc<SliceState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<SliceState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` yielding the current snapshot, then one
    /// per change.
    pub fn into_stream(self) -> StateWatchStream {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StateWatchStream {
    inner: WatchStream<Arc<SliceState>>,
}

impl Stream for StateWatchStream {
    type Item = Arc<SliceState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;

    use crate::reducer::{Action, TableReducer};
    use crate::store::ScopedStore;

    #[tokio::test]
    async fn stream_yields_current_then_changes() {
        let store = ScopedStore::new("project", TableReducer);
        let mut stream = store.subscribe().into_stream();

        let first = stream.next().await.unwrap();
        assert!(!first.collapsed);

        store.dispatch(&Action::ToggleAll);
        let second = stream.next().await.unwrap();
        assert!(second.collapsed);
    }

    #[tokio::test]
    async fn changed_ends_when_the_store_is_dropped() {
        let store = ScopedStore::new("project", TableReducer);
        let mut sub = store.subscribe();
        drop(store);
        assert!(sub.changed().await.is_none());
    }

    #[test]
    fn latest_tracks_dispatches() {
        let store = ScopedStore::new("project", TableReducer);
        let sub = store.subscribe();
        store.dispatch(&Action::ToggleAll);
        assert!(!sub.current().collapsed);
        assert!(sub.latest().collapsed);
    }
}
