//! Shared helpers for command handlers.

use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::Path;

use munin_core::{Console, Draft, Family, LookupKind, Node, PathValue};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read a draft from a `--from-file` path: YAML for `.yaml`/`.yml`,
/// JSON otherwise.
pub fn read_draft_file(path: &Path) -> Result<Node, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    if !value.is_object() {
        return Err(CliError::Validation {
            field: "from-file".into(),
            reason: format!("{} must hold an object", path.display()),
        });
    }
    Ok(Node::from(value))
}

/// Parse `--set PATH=VALUE` arguments.
pub fn parse_assignments(raw: &[String]) -> Result<Vec<PathValue>, CliError> {
    raw.iter()
        .map(|s| s.parse::<PathValue>().map_err(CliError::from))
        .collect()
}

/// Lookup a `--set` path targets, if its last segment names one of the
/// family's lookups.
pub fn lookup_for_path(family: Family, path: &str) -> Option<LookupKind> {
    let field = path.rsplit('.').next()?;
    family
        .lookups()
        .iter()
        .copied()
        .find(|kind| kind.embedded_key() == field)
}

/// Replace lookup labels with the option values they select, so
/// `--set project=ops` becomes the link to project "ops". Values that
/// are already links pass through.
async fn resolve_selections(
    console: &Console,
    family: Family,
    assignments: &mut [PathValue],
) -> Result<(), CliError> {
    let mut fetched = BTreeSet::new();
    for assignment in assignments.iter_mut() {
        let Some(kind) = lookup_for_path(family, &assignment.path) else {
            continue;
        };
        let Some(label) = assignment.value.as_str().map(str::to_owned) else {
            continue;
        };
        if label.contains("://") {
            continue;
        }
        if fetched.insert(kind) {
            console
                .fetch_lookup(family, kind)
                .await
                .map_err(|e| CliError::in_family(e, family))?;
        }

        let state = console.state(family);
        let spec = state.lookup(kind).map(|l| &l.spec);
        let Some(value) = spec.and_then(|s| s.value_for(&label)) else {
            let known = spec
                .map(|s| {
                    s.options
                        .iter()
                        .skip(1)
                        .map(|o| o.label.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            return Err(CliError::Validation {
                field: assignment.path.clone(),
                reason: format!("no {kind} labelled \"{label}\" (known: {known})"),
            });
        };
        assignment.value = Node::from(value);
    }
    Ok(())
}

/// Apply `--from-file` then each `--set` to a draft.
pub async fn fill_draft(
    console: &Console,
    draft: &mut Draft,
    from_file: Option<&Path>,
    set: &[String],
) -> Result<(), CliError> {
    if let Some(path) = from_file {
        draft.change(None, read_draft_file(path)?);
    }
    let mut assignments = parse_assignments(set)?;
    resolve_selections(console, draft.family(), &mut assignments).await?;
    for assignment in assignments {
        draft.change(Some(&assignment.path), assignment.value);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn set_paths_resolve_to_lookups() {
        assert_eq!(
            lookup_for_path(Family::Metric, "project"),
            Some(LookupKind::Project)
        );
        assert_eq!(
            lookup_for_path(Family::Connection, "driver"),
            Some(LookupKind::Driver)
        );
        assert_eq!(lookup_for_path(Family::Metric, "name"), None);
        assert_eq!(lookup_for_path(Family::Project, "project"), None);
    }

    #[test]
    fn assignments_parse_json_values() {
        let parsed = parse_assignments(&["timeout=30".into(), "name=cpu".into()]).unwrap();
        assert_eq!(parsed[0].value, Node::from(30));
        assert_eq!(parsed[1].value, Node::from("cpu"));
        assert!(parse_assignments(&["oops".into()]).is_err());
    }

    #[test]
    fn reads_yaml_and_json_drafts() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "name: cpu\nquery: select 1").unwrap();
        let node = read_draft_file(yaml.path()).unwrap();
        assert_eq!(node.get("query"), Some(&Node::from("select 1")));

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, "[1, 2]").unwrap();
        assert!(matches!(
            read_draft_file(json.path()),
            Err(CliError::Validation { .. })
        ));
    }
}
