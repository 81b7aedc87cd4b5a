// ── Panel families ──
//
// Static metadata for the four record families the console manages:
// where they live on the backend, how they are keyed, grouped and routed,
// and which auxiliary lookups their forms need.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use urlencoding::encode;

use super::{EntityId, LookupKind, Record};

/// A record family, one per panel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Family {
    Connection,
    Metric,
    Project,
    Rule,
}

impl Family {
    /// Store slice name. Rules live under `munin`.
    pub fn slice(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Metric => "metric",
            Self::Project => "project",
            Self::Rule => "munin",
        }
    }

    /// Backend resource path for singleton operations.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Connection => "/connection",
            Self::Metric => "/metric",
            Self::Project => "/project",
            Self::Rule => "/rules",
        }
    }

    /// Backend path of the collection endpoint.
    pub fn list_path(self) -> &'static str {
        match self {
            Self::Rule => "/rules/views",
            other => other.resource(),
        }
    }

    /// Path writes (`PUT`, `DELETE`) to a single record go to.
    ///
    /// The id is percent-encoded as a single path segment.
    pub fn item_path(self, id: &EntityId) -> String {
        format!("{}/{}", self.resource(), encode(&id.to_string()))
    }

    /// Path a single record is read from.
    pub fn detail_path(self, id: &EntityId) -> String {
        let id = id.to_string();
        match self {
            Self::Rule => format!("/rules/views/{}", encode(&id)),
            other => format!("{}/{}", other.resource(), encode(&id)),
        }
    }

    /// Key of the HAL `_embedded` collection in list responses.
    pub fn embedded_key(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Metric => "metric",
            Self::Project => "project",
            Self::Rule => "rule",
        }
    }

    /// Record field holding the identifier.
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Rule => "ref",
            _ => "id",
        }
    }

    /// Record field holding the editable name.
    pub fn name_field(self) -> &'static str {
        match self {
            Self::Rule => "ref",
            _ => "name",
        }
    }

    /// Dotted path whose value partitions the list into groups.
    pub fn group_path(self) -> &'static str {
        match self {
            Self::Connection => "driver.alias",
            Self::Metric => "project.name",
            Self::Project => "name",
            Self::Rule => "pack",
        }
    }

    /// Lookups the family's forms select from.
    pub fn lookups(self) -> &'static [LookupKind] {
        match self {
            Self::Connection => &[LookupKind::Driver],
            Self::Metric => &[LookupKind::Project, LookupKind::Connection],
            Self::Project => &[],
            Self::Rule => &[LookupKind::Trigger, LookupKind::Action, LookupKind::Pack],
        }
    }

    /// First path segment of the panel's location.
    pub fn route(self) -> &'static str {
        match self {
            Self::Rule => "metric",
            other => other.slice(),
        }
    }

    /// Capitalised singular, as used in notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Connection => "Connection",
            Self::Metric => "Metric",
            Self::Project => "Project",
            Self::Rule => "Rule",
        }
    }

    /// Lowercase plural, as used in notifications.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Connection => "connections",
            Self::Metric => "metrics",
            Self::Project => "projects",
            Self::Rule => "rules",
        }
    }

    // ── Record accessors ─────────────────────────────────────────────

    pub fn id_of(self, record: &Record) -> Option<EntityId> {
        record.id_at(self.id_field())
    }

    /// Group key of a record; missing keys fall into the `""` group.
    pub fn group_key(self, record: &Record) -> String {
        record
            .get(self.group_path())
            .map(super::Node::text)
            .unwrap_or_default()
    }
}
