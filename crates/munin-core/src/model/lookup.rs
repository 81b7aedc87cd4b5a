// ── Lookups ──
//
// Auxiliary collections (drivers, projects, connections, triggers,
// actions, packs) that panel forms pick references from. Each one is
// stored alongside a derived selection spec describing the picker.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use super::Record;

/// Default origin of the HAL-style links used as selection values.
pub const DEFAULT_LINK_BASE: &str = "http://localhost";

/// Kind of auxiliary collection.
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
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LookupKind {
    Driver,
    Project,
    Connection,
    Trigger,
    Action,
    Pack,
}

impl LookupKind {
    pub fn resource(self) -> &'static str {
        match self {
            Self::Driver => "/driver",
            Self::Project => "/project",
            Self::Connection => "/connection",
            Self::Trigger => "/trigger",
            Self::Action => "/action",
            Self::Pack => "/pack",
        }
    }

    pub fn embedded_key(self) -> &'static str {
        self.into()
    }

    /// Field shown to the user in the picker.
    pub fn label_field(self) -> &'static str {
        match self {
            Self::Driver => "alias",
            Self::Trigger | Self::Action | Self::Pack => "ref",
            Self::Project | Self::Connection => "name",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Driver => "drivers",
            Self::Project => "projects",
            Self::Connection => "connections",
            Self::Trigger => "triggers",
            Self::Action => "actions",
            Self::Pack => "packs",
        }
    }

    /// Wire action type that delivers this lookup.
    pub fn wire_type(self) -> &'static str {
        match self {
            Self::Driver => "FETCH_DRIVERS",
            Self::Project => "FETCH_PROJECTS",
            Self::Connection => "FETCH_CONNECTIONS",
            Self::Trigger => "FETCH_TRIGGERS",
            Self::Action => "FETCH_ACTIONS",
            Self::Pack => "FETCH_PACKS",
        }
    }

    pub fn from_wire_type(kind: &str) -> Option<Self> {
        match kind {
            "FETCH_DRIVERS" => Some(Self::Driver),
            "FETCH_PROJECTS" => Some(Self::Project),
            "FETCH_CONNECTIONS" => Some(Self::Connection),
            "FETCH_TRIGGERS" => Some(Self::Trigger),
            "FETCH_ACTIONS" => Some(Self::Action),
            "FETCH_PACKS" => Some(Self::Pack),
            _ => None,
        }
    }
}

/// One option of a selection spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Declarative description of a picker over a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSpec {
    pub name: String,
    pub required: bool,
    #[serde(rename = "enum")]
    pub options: Vec<SelectOption>,
}

impl SelectionSpec {
    /// Derive the picker for `items`. The first option is a placeholder
    /// pointing at `#`; every item links to `{link_base}/{kind}/{id}`.
    pub fn derive(kind: LookupKind, items: &[Record], link_base: &str) -> Self {
        let base = link_base.trim_end_matches('/');
        let key = kind.embedded_key();

        let placeholder = SelectOption {
            value: format!("{base}/{key}/#"),
            label: format!("Select one {kind}"),
        };
        let options = std::iter::once(placeholder)
            .chain(items.iter().filter_map(|item| {
                let id = item.id_at("id").or_else(|| item.id_at("ref"))?;
                let label = item
                    .str_at(kind.label_field())
                    .map_or_else(|| item.display_name().to_owned(), str::to_owned);
                let label = if label.is_empty() { id.to_string() } else { label };
                Some(SelectOption {
                    value: format!("{base}/{key}/{id}"),
                    label,
                })
            }))
            .collect();

        Self {
            name: key.to_owned(),
            required: true,
            options,
        }
    }

    /// Value of the option labelled `label`, if any.
    pub fn value_for(&self, label: &str) -> Option<&str> {
        self.options
            .iter()
            .skip(1)
            .find(|o| o.label == label)
            .map(|o| o.value.as_str())
    }
}

/// A fetched lookup collection and its derived picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup {
    pub items: Vec<Record>,
    pub spec: SelectionSpec,
}

impl Lookup {
    pub fn new(kind: LookupKind, items: Vec<Record>, link_base: &str) -> Self {
        let spec = SelectionSpec::derive(kind, &items, link_base);
        Self { items, spec }
    }
}
