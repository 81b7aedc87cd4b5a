// ── Reducers ──
//
// A reducer is a pure `(state, action) -> state` function over one slice.
// Panels compose the generic flex-table reducer with their domain
// reducer: `R(s, a) = D(G(s, a), a)`.

mod action;
mod domain;
mod table;
pub mod wire;

pub use action::{Action, Status};
pub use domain::DomainReducer;
pub use table::TableReducer;
pub use wire::{WireAction, WireStatus};

use crate::model::Family;
use crate::store::SliceState;

/// A pure state transition over a slice.
pub trait Reducer: Send + Sync {
    fn reduce(&self, state: SliceState, action: &Action) -> SliceState;
}

impl<F> Reducer for F
where
    F: Fn(SliceState, &Action) -> SliceState + Send + Sync,
{
    fn reduce(&self, state: SliceState, action: &Action) -> SliceState {
        self(state, action)
    }
}

/// Two reducers applied in sequence: the generic one first, then the
/// domain one on its output.
#[derive(Debug, Clone)]
pub struct Composed<G, D> {
    generic: G,
    domain: D,
}

impl<G: Reducer, D: Reducer> Reducer for Composed<G, D> {
    fn reduce(&self, state: SliceState, action: &Action) -> SliceState {
        self.domain
            .reduce(self.generic.reduce(state, action), action)
    }
}

/// Compose `generic` and `domain` into `D(G(s, a), a)`.
pub fn compose<G: Reducer, D: Reducer>(generic: G, domain: D) -> Composed<G, D> {
    Composed { generic, domain }
}

/// The reducer of a family's panel: flex tables, then the domain.
pub fn panel_reducer(family: Family, link_base: &str) -> Composed<TableReducer, DomainReducer> {
    compose(
        TableReducer,
        DomainReducer::new(family).with_link_base(link_base),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{DEFAULT_LINK_BASE, Node};

    #[test]
    fn domain_sees_the_generic_output() {
        let generic = |mut s: SliceState, _: &Action| {
            s.filter.push('g');
            s
        };
        let domain = |mut s: SliceState, _: &Action| {
            s.filter.push('d');
            s
        };
        let state = compose(generic, domain).reduce(SliceState::default(), &Action::ToggleAll);
        assert_eq!(state.filter, "gd");
    }

    #[test]
    fn panel_reducer_handles_tables_and_records() {
        let reducer = panel_reducer(Family::Project, DEFAULT_LINK_BASE);
        let state = reducer.reduce(
            SliceState::default(),
            &Action::FetchList(Status::Succeeded(Node::from(json!([{ "id": 1, "name": "ops" }])))),
        );
        let state = reducer.reduce(
            state,
            &Action::RegisterTable {
                uid: "ops".into(),
                collapsed: None,
            },
        );
        let state = reducer.reduce(state, &Action::ToggleAll);
        assert_eq!(state.list.len(), 1);
        assert!(state.is_collapsed("ops"));
        assert_eq!(state.groups.unwrap()[0].key, "ops");
    }
}
