// ── Wire action contract ──
//
// Untyped `{ type, status?, payload?, id? }` actions as exchanged with
// middleware and other stores. Conversion to and from the typed `Action`
// keeps the shape exact; unknown types are an error.

use serde::{Deserialize, Serialize};

use super::{Action, Status};
use crate::error::CoreError;
use crate::model::{EntityId, LookupKind, Node};

/// Terminal status marker of a wire action. Absent means pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    Success,
    Error,
}

/// A serialized action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WireStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl WireAction {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    fn status_of(&self) -> Status<Node> {
        match self.status {
            None => Status::Pending,
            Some(WireStatus::Success) => {
                Status::Succeeded(self.payload.clone().unwrap_or_default())
            }
            Some(WireStatus::Error) => Status::Failed(self.error.clone().unwrap_or_default()),
        }
    }

    fn malformed(&self, reason: &str) -> CoreError {
        CoreError::MalformedAction {
            kind: self.kind.clone(),
            reason: reason.to_owned(),
        }
    }
}

impl TryFrom<WireAction> for Action {
    type Error = CoreError;

    fn try_from(wire: WireAction) -> Result<Self, Self::Error> {
        let action = match wire.kind.as_str() {
            "FETCH_LIST" => Action::FetchList(wire.status_of()),
            "FETCH_ONE" => Action::FetchOne(wire.status_of()),
            "CREATE" => Action::Create(wire.status_of()),
            "EDIT" => Action::Edit(wire.status_of()),
            "DELETE" => {
                let id = wire
                    .id
                    .clone()
                    .or_else(|| wire.reference.clone())
                    .ok_or_else(|| wire.malformed("missing id"))?;
                let status = match wire.status_of() {
                    Status::Pending => Status::Pending,
                    Status::Succeeded(_) => Status::Succeeded(()),
                    Status::Failed(message) => Status::Failed(message),
                };
                Action::Delete { id, status }
            }
            "SET_FILTER" => Action::SetFilter(wire.filter.clone().unwrap_or_default()),
            "REGISTER_FLEX_TABLE" => Action::RegisterTable {
                uid: wire.uid.clone().ok_or_else(|| wire.malformed("missing uid"))?,
                collapsed: wire.collapsed,
            },
            "TOGGLE_FLEX_TABLE" => Action::ToggleTable {
                uid: wire.uid.clone().ok_or_else(|| wire.malformed("missing uid"))?,
            },
            "TOGGLE_ALL" => Action::ToggleAll,
            other => match LookupKind::from_wire_type(other) {
                Some(kind) => Action::FetchLookup {
                    kind,
                    status: wire.status_of(),
                },
                None => {
                    return Err(CoreError::UnknownAction {
                        kind: other.to_owned(),
                    });
                }
            },
        };
        Ok(action)
    }
}

fn with_status(mut wire: WireAction, status: &Status<Node>) -> WireAction {
    match status {
        Status::Pending => {}
        Status::Succeeded(payload) => {
            wire.status = Some(WireStatus::Success);
            wire.payload = Some(payload.clone());
        }
        Status::Failed(message) => {
            wire.status = Some(WireStatus::Error);
            wire.error = Some(message.clone());
        }
    }
    wire
}

impl From<&Action> for WireAction {
    fn from(action: &Action) -> Self {
        let wire = WireAction::new(action.kind());
        match action {
            Action::FetchList(s) | Action::FetchOne(s) | Action::Create(s) | Action::Edit(s) => {
                with_status(wire, s)
            }
            Action::FetchLookup { status, .. } => with_status(wire, status),
            Action::Delete { id, status } => {
                let status = match status {
                    Status::Pending => Status::Pending,
                    Status::Succeeded(()) => Status::Succeeded(Node::Null),
                    Status::Failed(m) => Status::Failed(m.clone()),
                };
                let mut wire = with_status(wire, &status);
                wire.payload = None;
                wire.id = Some(id.clone());
                wire
            }
            Action::SetFilter(filter) => WireAction {
                filter: Some(filter.clone()),
                ..wire
            },
            Action::RegisterTable { uid, collapsed } => WireAction {
                uid: Some(uid.clone()),
                collapsed: *collapsed,
                ..wire
            },
            Action::ToggleTable { uid } => WireAction {
                uid: Some(uid.clone()),
                ..wire
            },
            Action::ToggleAll => wire,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<Action, CoreError> {
        Action::try_from(serde_json::from_value::<WireAction>(value).unwrap())
    }

    #[test]
    fn absent_status_is_pending() {
        assert_eq!(
            parse(json!({ "type": "FETCH_LIST" })).unwrap(),
            Action::FetchList(Status::Pending)
        );
    }

    #[test]
    fn success_carries_payload() {
        let action = parse(json!({
            "type": "EDIT",
            "status": "success",
            "payload": { "id": 4, "name": "ops" }
        }))
        .unwrap();
        let Action::Edit(Status::Succeeded(payload)) = action else {
            panic!("expected edit success, got {action:?}");
        };
        assert_eq!(payload.get("name").and_then(Node::as_str), Some("ops"));
    }

    #[test]
    fn delete_accepts_id_or_ref() {
        assert_eq!(
            parse(json!({ "type": "DELETE", "status": "success", "id": 3 })).unwrap(),
            Action::Delete {
                id: EntityId::Numeric(3),
                status: Status::Succeeded(())
            }
        );
        assert_eq!(
            parse(json!({ "type": "DELETE", "ref": "cpu.high" })).unwrap(),
            Action::Delete {
                id: EntityId::Ref("cpu.high".into()),
                status: Status::Pending
            }
        );
        assert!(matches!(
            parse(json!({ "type": "DELETE" })),
            Err(CoreError::MalformedAction { .. })
        ));
    }

    #[test]
    fn lookup_types_map_to_kinds() {
        assert_eq!(
            parse(json!({ "type": "FETCH_PACKS", "status": "error", "error": "boom" })).unwrap(),
            Action::FetchLookup {
                kind: LookupKind::Pack,
                status: Status::Failed("boom".into())
            }
        );
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(matches!(
            parse(json!({ "type": "@@INIT" })),
            Err(CoreError::UnknownAction { kind }) if kind == "@@INIT"
        ));
    }

    #[test]
    fn every_action_survives_the_wire() {
        let actions = vec![
            Action::FetchList(Status::Succeeded(Node::from(json!([{ "id": 1 }])))),
            Action::FetchOne(Status::Pending),
            Action::Create(Status::Failed("Unable to create metric.".into())),
            Action::Edit(Status::Succeeded(Node::from(json!({ "id": 2 })))),
            Action::Delete {
                id: EntityId::Numeric(2),
                status: Status::Succeeded(()),
            },
            Action::SetFilter("cpu".into()),
            Action::FetchLookup {
                kind: LookupKind::Driver,
                status: Status::Pending,
            },
            Action::RegisterTable {
                uid: "postgres".into(),
                collapsed: Some(true),
            },
            Action::ToggleTable { uid: "postgres".into() },
            Action::ToggleAll,
        ];
        for action in actions {
            let json = serde_json::to_value(WireAction::from(&action)).unwrap();
            assert_eq!(json["type"], action.kind());
            assert_eq!(parse(json).unwrap(), action);
        }
    }

    #[test]
    fn pending_actions_serialize_minimally() {
        let json = serde_json::to_value(WireAction::from(&Action::FetchList(Status::Pending))).unwrap();
        assert_eq!(json, json!({ "type": "FETCH_LIST" }));
    }
}
