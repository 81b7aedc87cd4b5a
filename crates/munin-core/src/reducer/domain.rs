// ── Domain reducer ──
//
// Per-family state machine over the record lifecycle. Only terminal
// successes change state; pending and failed requests pass through.

use munin_api::envelope::EMBEDDED;
use tracing::{debug, warn};

use super::{Action, Reducer, Status};
use crate::model::{DEFAULT_LINK_BASE, Family, Lookup, LookupKind, Node, Record};
use crate::projection::project;
use crate::store::SliceState;

/// Reducer for one record family.
#[derive(Debug, Clone)]
pub struct DomainReducer {
    family: Family,
    link_base: String,
}

impl DomainReducer {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            link_base: DEFAULT_LINK_BASE.to_owned(),
        }
    }

    /// Origin used for selection-spec links.
    #[must_use]
    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    pub fn family(&self) -> Family {
        self.family
    }

    fn regroup(&self, state: &mut SliceState) {
        let family = self.family;
        state.groups = Some(project(&state.list, &state.filter, |r| {
            family.group_key(r)
        }));
    }

    fn on_list(&self, state: &mut SliceState, payload: &Node) {
        state.list = records(payload, self.family.embedded_key()).unwrap_or_else(|| {
            warn!(
                family = %self.family,
                "list payload has neither an embedded collection nor an array"
            );
            Vec::new()
        });
        self.regroup(state);
    }

    fn on_edit(&self, state: &mut SliceState, payload: &Node) {
        let updated = Record::new(payload.clone());
        let id = self.family.id_of(&updated);
        let mut replaced = false;
        if let Some(id) = id.as_ref() {
            for slot in &mut state.list {
                if self.family.id_of(slot).as_ref() == Some(id) {
                    *slot = updated.clone();
                    replaced = true;
                }
            }
        }
        if !replaced {
            debug!(family = %self.family, ?id, "edited record is not in the list");
        }
        self.regroup(state);
        state.singleton = Some(updated);
    }

    fn on_lookup(&self, state: &mut SliceState, kind: LookupKind, payload: &Node) {
        if !self.family.lookups().contains(&kind) {
            return;
        }
        let items = records(payload, kind.embedded_key()).unwrap_or_else(|| {
            warn!(family = %self.family, %kind, "lookup payload is not a collection");
            Vec::new()
        });
        state
            .lookups
            .insert(kind, Lookup::new(kind, items, &self.link_base));
    }
}

impl Reducer for DomainReducer {
    fn reduce(&self, mut state: SliceState, action: &Action) -> SliceState {
        match action {
            Action::FetchList(Status::Succeeded(payload)) => self.on_list(&mut state, payload),
            Action::FetchOne(Status::Succeeded(payload)) => {
                state.singleton = Some(Record::new(payload.clone()));
            }
            Action::Create(Status::Succeeded(payload)) => {
                let created = Record::new(payload.clone());
                state.list.push(created.clone());
                self.regroup(&mut state);
                state.singleton = Some(created);
            }
            Action::Edit(Status::Succeeded(payload)) => self.on_edit(&mut state, payload),
            Action::Delete {
                id,
                status: Status::Succeeded(()),
            } => {
                let family = self.family;
                state.list.retain(|r| family.id_of(r).as_ref() != Some(id));
                if state
                    .singleton
                    .as_ref()
                    .is_some_and(|r| family.id_of(r).as_ref() == Some(id))
                {
                    state.singleton = None;
                }
                self.regroup(&mut state);
            }
            Action::SetFilter(filter) => {
                state.filter.clone_from(filter);
                self.regroup(&mut state);
            }
            Action::FetchLookup {
                kind,
                status: Status::Succeeded(payload),
            } => self.on_lookup(&mut state, *kind, payload),
            _ => {}
        }
        state
    }
}

/// Records of a list payload: the HAL collection under `key`, or a bare
/// array. Anything else is `None`.
fn records(payload: &Node, key: &str) -> Option<Vec<Record>> {
    let items = payload
        .get(EMBEDDED)
        .and_then(|embedded| embedded.get(key))
        .unwrap_or(payload)
        .as_array()?;
    Some(items.iter().cloned().map(Record::new).collect())
}
