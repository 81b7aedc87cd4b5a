// ── Draft validation ──
//
// The checks the creation and detail forms enforce before submitting.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::model::{Family, Node};

/// Names and refs: word characters, dots and dashes.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+$").expect("name pattern is valid"));

/// Fields a family's form marks as required.
pub fn required_fields(family: Family) -> &'static [&'static str] {
    match family {
        Family::Connection => &["name", "driver"],
        Family::Metric => &["name", "query", "project", "connection"],
        Family::Project => &["name", "keystone.login", "keystone.password"],
        Family::Rule => &["ref", "pack", "trigger", "action"],
    }
}

/// Fields that must match the name pattern.
pub fn patterned_fields(family: Family) -> &'static [&'static str] {
    match family {
        Family::Project => &["name", "keystone.login"],
        Family::Rule => &["ref"],
        Family::Connection | Family::Metric => &["name"],
    }
}

/// Check `draft` against the family's form rules. Reports the first
/// offending field.
pub fn validate(family: Family, draft: &Node) -> Result<(), CoreError> {
    for field in required_fields(family) {
        if is_blank(draft.get_path(field)) {
            return Err(CoreError::Validation {
                field: (*field).to_owned(),
                reason: "is required".into(),
            });
        }
    }
    for field in patterned_fields(family) {
        if let Some(value) = draft.get_path(field).and_then(Node::as_str) {
            if !NAME_PATTERN.is_match(value) {
                return Err(CoreError::Validation {
                    field: (*field).to_owned(),
                    reason: format!("\"{value}\" may only contain letters, digits, '_', '.' and '-'"),
                });
            }
        }
    }
    Ok(())
}

fn is_blank(value: Option<&Node>) -> bool {
    match value {
        None | Some(Node::Null) => true,
        Some(Node::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
