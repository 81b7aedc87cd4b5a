// ── Console facade ──
//
// Owns the API client, the store registry and one panel per family, and
// turns panel operations into requests plus store dispatches. Every
// request dispatches `Pending`, then exactly one terminal action.
// Failures are reported once through the notifier and returned.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use munin_api::{ApiClient, RequestSpec};
use serde_json::Value;
use tracing::debug;

use crate::collab::{Notifier, Router};
use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{EntityId, Family, LookupKind, Node, Record};
use crate::panel::{Navigator, validate};
use crate::reducer::{Action, Status, panel_reducer};
use crate::store::{ScopedStore, SliceState, StoreRegistry};

const PROJECTION: (&str, &str) = ("projection", "recursive");

struct Panel {
    store: ScopedStore,
    navigator: Mutex<Navigator>,
}

struct Panels {
    connection: Panel,
    metric: Panel,
    project: Panel,
    rule: Panel,
}

impl Panels {
    fn get(&self, family: Family) -> &Panel {
        match family {
            Family::Connection => &self.connection,
            Family::Metric => &self.metric,
            Family::Project => &self.project,
            Family::Rule => &self.rule,
        }
    }
}

struct ConsoleInner {
    api: ApiClient,
    registry: StoreRegistry,
    panels: Panels,
    notifier: Arc<dyn Notifier>,
}

/// Entry point for driving the console panels.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

impl Console {
    /// Build a console from its configuration and collaborators.
    pub fn new(
        config: ConsoleConfig,
        notifier: Arc<dyn Notifier>,
        router: Arc<dyn Router>,
    ) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.session, &config.transport)?;
        Self::with_client(api, &config.link_base, notifier, router)
    }

    /// Build a console around an existing API client.
    pub fn with_client(
        api: ApiClient,
        link_base: &str,
        notifier: Arc<dyn Notifier>,
        router: Arc<dyn Router>,
    ) -> Result<Self, CoreError> {
        let registry = StoreRegistry::new();
        let mount = |family: Family| -> Result<Panel, CoreError> {
            let store = registry.create(family.slice(), panel_reducer(family, link_base))?;
            Ok(Panel {
                store,
                navigator: Mutex::new(Navigator::new(family, Arc::clone(&router))),
            })
        };
        let panels = Panels {
            connection: mount(Family::Connection)?,
            metric: mount(Family::Metric)?,
            project: mount(Family::Project)?,
            rule: mount(Family::Rule)?,
        };
        Ok(Self {
            inner: Arc::new(ConsoleInner {
                api,
                registry,
                panels,
                notifier,
            }),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The store behind a family's panel.
    pub fn store(&self, family: Family) -> &ScopedStore {
        &self.inner.panels.get(family).store
    }

    pub fn state(&self, family: Family) -> Arc<SliceState> {
        self.store(family).state()
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.inner.registry
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Current pathname of a family's panel.
    pub fn pathname(&self, family: Family) -> String {
        self.with_navigator(family, |nav| nav.pathname())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch a family's list and regroup it.
    pub async fn fetch_list(&self, family: Family) -> Result<Arc<SliceState>, CoreError> {
        let store = self.store(family);
        store.dispatch(&Action::FetchList(Status::Pending));

        let spec = RequestSpec::get(family.list_path()).with_query(PROJECTION.0, PROJECTION.1);
        match self.send(&spec, None).await {
            Ok(payload) => Ok(store.dispatch(&Action::FetchList(Status::Succeeded(payload)))),
            Err(err) => Err(self.fail(
                store,
                Action::FetchList(Status::Failed(err.to_string())),
                &format!("Unable to retrieve {}.", family.plural()),
                err,
            )),
        }
    }

    /// Fetch one record into the panel's detail view.
    pub async fn fetch_one(&self, family: Family, id: &EntityId) -> Result<Record, CoreError> {
        let store = self.store(family);
        store.dispatch(&Action::FetchOne(Status::Pending));

        let spec = RequestSpec::get(family.detail_path(id)).with_query(PROJECTION.0, PROJECTION.1);
        match self.send(&spec, None).await {
            Ok(payload) => {
                store.dispatch(&Action::FetchOne(Status::Succeeded(payload.clone())));
                Ok(Record::new(payload))
            }
            Err(err) => Err(self.fail(
                store,
                Action::FetchOne(Status::Failed(err.to_string())),
                &format!("Unable to retrieve the {family} \"{id}\"."),
                err,
            )),
        }
    }

    /// Fetch one of the family's lookups and derive its selection spec.
    pub async fn fetch_lookup(
        &self,
        family: Family,
        kind: LookupKind,
    ) -> Result<Arc<SliceState>, CoreError> {
        let store = self.store(family);
        store.dispatch(&Action::FetchLookup {
            kind,
            status: Status::Pending,
        });

        let spec = RequestSpec::get(kind.resource()).with_query(PROJECTION.0, PROJECTION.1);
        match self.send(&spec, None).await {
            Ok(payload) => Ok(store.dispatch(&Action::FetchLookup {
                kind,
                status: Status::Succeeded(payload),
            })),
            Err(err) => Err(self.fail(
                store,
                Action::FetchLookup {
                    kind,
                    status: Status::Failed(err.to_string()),
                },
                &format!("Unable to retrieve {kind} spec."),
                err,
            )),
        }
    }

    /// Load everything a panel shows: its lookups, then its list. A
    /// selected record that is no longer listed is deselected. Every
    /// request is attempted; the first failure is returned.
    pub async fn mount(&self, family: Family) -> Result<Arc<SliceState>, CoreError> {
        let mut first_err = None;
        for kind in family.lookups() {
            if let Err(err) = self.fetch_lookup(family, *kind).await {
                first_err.get_or_insert(err);
            }
        }

        match self.fetch_list(family).await {
            Ok(state) => {
                self.with_navigator(family, |nav| {
                    let stale = nav
                        .selected()
                        .is_some_and(|id| state.find(family, &EntityId::from(id)).is_none());
                    if stale {
                        debug!(%family, "selected record is gone, closing");
                        nav.close();
                    }
                });
                first_err.map_or(Ok(state), Err)
            }
            Err(err) => Err(first_err.unwrap_or(err)),
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate and submit a creation draft, then open the new record.
    pub async fn create(&self, family: Family, draft: Node) -> Result<Record, CoreError> {
        let failure = format!("Unable to create {family}.");
        if let Err(err) = validate(family, &draft) {
            self.inner.notifier.error(&failure, &err);
            return Err(err);
        }

        let store = self.store(family);
        store.dispatch(&Action::Create(Status::Pending));

        let body = Value::from(&draft);
        match self.send(&RequestSpec::post(family.resource()), Some(&body)).await {
            Ok(payload) => {
                let record = Record::new(payload.clone());
                store.dispatch(&Action::Create(Status::Succeeded(payload)));
                self.inner.notifier.success(&format!(
                    "{} \"{}\" has been created successfully.",
                    family.label(),
                    record.display_name()
                ));
                if let Some(id) = family.id_of(&record) {
                    self.with_navigator(family, |nav| nav.open(&id.to_string()));
                }
                Ok(record)
            }
            Err(err) => Err(self.fail(
                store,
                Action::Create(Status::Failed(err.to_string())),
                &failure,
                err,
            )),
        }
    }

    /// Save an edited record, then refetch it so the panel shows what
    /// the backend stored.
    pub async fn edit(&self, family: Family, draft: Node) -> Result<Record, CoreError> {
        let Some(id) = draft.get(family.id_field()).and_then(EntityId::from_node) else {
            let err = CoreError::Validation {
                field: family.id_field().to_owned(),
                reason: "is required to save".into(),
            };
            self.inner
                .notifier
                .error(&format!("Unable to save {family}."), &err);
            return Err(err);
        };
        let failure = format!("Unable to save {family} \"{id}\".");
        if let Err(err) = validate(family, &draft) {
            self.inner.notifier.error(&failure, &err);
            return Err(err);
        }

        let store = self.store(family);
        store.dispatch(&Action::Edit(Status::Pending));

        let body = Value::from(&draft);
        if let Err(err) = self
            .send(&RequestSpec::put(family.item_path(&id)), Some(&body))
            .await
        {
            return Err(self.fail(
                store,
                Action::Edit(Status::Failed(err.to_string())),
                &failure,
                err,
            ));
        }
        self.inner.notifier.success(&format!(
            "{} \"{id}\" has been saved successfully.",
            family.label()
        ));
        self.with_navigator(family, |nav| nav.open(&id.to_string()));

        let refetch = RequestSpec::get(family.detail_path(&id)).with_query(PROJECTION.0, PROJECTION.1);
        match self.send(&refetch, None).await {
            Ok(payload) => {
                store.dispatch(&Action::Edit(Status::Succeeded(payload.clone())));
                Ok(Record::new(payload))
            }
            Err(err) => Err(self.fail(
                store,
                Action::Edit(Status::Failed(err.to_string())),
                &format!("Unable to retrieve the {family} \"{id}\"."),
                err,
            )),
        }
    }

    /// Delete a record and return to the bare list.
    pub async fn delete(&self, family: Family, id: &EntityId) -> Result<(), CoreError> {
        let store = self.store(family);
        store.dispatch(&Action::Delete {
            id: id.clone(),
            status: Status::Pending,
        });

        match self.send(&RequestSpec::delete(family.item_path(id)), None).await {
            Ok(_) => {
                store.dispatch(&Action::Delete {
                    id: id.clone(),
                    status: Status::Succeeded(()),
                });
                self.inner.notifier.success(&format!(
                    "{} \"{id}\" has been deleted successfully.",
                    family.label()
                ));
                self.with_navigator(family, Navigator::close);
                Ok(())
            }
            Err(err) => Err(self.fail(
                store,
                Action::Delete {
                    id: id.clone(),
                    status: Status::Failed(err.to_string()),
                },
                &format!("Unable to delete {family} \"{id}\"."),
                err,
            )),
        }
    }

    // ── Synchronous panel actions ────────────────────────────────────

    pub fn set_filter(&self, family: Family, filter: impl Into<String>) -> Arc<SliceState> {
        self.store(family).dispatch(&Action::SetFilter(filter.into()))
    }

    pub fn register_table(
        &self,
        family: Family,
        uid: impl Into<String>,
        collapsed: Option<bool>,
    ) -> Arc<SliceState> {
        self.store(family).dispatch(&Action::RegisterTable {
            uid: uid.into(),
            collapsed,
        })
    }

    pub fn toggle_table(&self, family: Family, uid: impl Into<String>) -> Arc<SliceState> {
        self.store(family)
            .dispatch(&Action::ToggleTable { uid: uid.into() })
    }

    pub fn toggle_all(&self, family: Family) -> Arc<SliceState> {
        self.store(family).dispatch(&Action::ToggleAll)
    }

    /// Show a record's default section.
    pub fn select(&self, family: Family, id: &EntityId) -> bool {
        self.with_navigator(family, |nav| nav.open(&id.to_string()))
    }

    /// Open the creation popup.
    pub fn open_create(&self, family: Family) -> bool {
        self.with_navigator(family, Navigator::open_create)
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn send(&self, spec: &RequestSpec, body: Option<&Value>) -> Result<Node, CoreError> {
        let payload = self.inner.api.request(spec, body).await?;
        Ok(Node::from(payload))
    }

    /// Settle a failed request: dispatch its terminal action, notify once.
    fn fail(&self, store: &ScopedStore, failed: Action, message: &str, err: CoreError) -> CoreError {
        store.dispatch(&failed);
        self.inner.notifier.error(message, &err);
        err
    }

    fn with_navigator<R>(&self, family: Family, f: impl FnOnce(&mut Navigator) -> R) -> R {
        let mut nav = self
            .inner
            .panels
            .get(family)
            .navigator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut nav)
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("base_url", &self.inner.api.base_url().as_str())
            .field("slices", &self.inner.registry.names())
            .finish_non_exhaustive()
    }
}
