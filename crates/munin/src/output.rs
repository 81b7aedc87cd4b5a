//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders panel state in the format selected by `--output`. Tables use
//! `tabled`, structured formats use serde, plain emits one identifier per
//! line.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use munin_core::{Family, Record, SliceState};

use crate::cli::{ColorMode, OutputFormat};

/// Whether colored output should be enabled on stderr.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serializable item in the chosen format.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Panel views ──────────────────────────────────────────────────────

/// One group of a panel list, with its flex-table state.
#[derive(Debug, Serialize)]
pub struct GroupView<'a> {
    pub key: &'a str,
    pub collapsed: bool,
    pub items: &'a [Record],
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// The grouped view of a slice. Collapsed groups render as a single
/// summary row in tables and are skipped in plain output.
pub fn render_groups(format: OutputFormat, family: Family, state: &SliceState) -> String {
    let views: Vec<GroupView<'_>> = state
        .groups
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|g| GroupView {
            key: &g.key,
            collapsed: state.is_collapsed(&g.key),
            items: &g.items,
        })
        .collect();

    match format {
        OutputFormat::Table => {
            let rows: Vec<GroupRow> = views.iter().flat_map(|v| group_rows(family, v)).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(&views),
        OutputFormat::JsonCompact => render_json_compact(&views),
        OutputFormat::Yaml => render_yaml(&views),
        OutputFormat::Plain => views
            .iter()
            .filter(|v| !v.collapsed)
            .flat_map(|v| v.items.iter())
            .map(|r| record_id(family, r))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn group_rows(family: Family, view: &GroupView<'_>) -> Vec<GroupRow> {
    let label = if view.key.is_empty() { "-" } else { view.key };
    if view.collapsed {
        return vec![GroupRow {
            group: format!("▸ {label}"),
            id: String::new(),
            name: format!("({} hidden)", view.items.len()),
        }];
    }
    view.items
        .iter()
        .map(|r| GroupRow {
            group: label.to_owned(),
            id: record_id(family, r),
            name: r.display_name().to_owned(),
        })
        .collect()
}

/// A record's identifier as text, empty when it has none.
pub fn record_id(family: Family, record: &Record) -> String {
    family
        .id_of(record)
        .map(|id| id.to_string())
        .unwrap_or_default()
}

/// Aligned `key  value` lines for a record's top-level fields; nested values
/// are shown as compact JSON.
pub fn record_detail(record: &Record) -> String {
    let Some(fields) = record.node().as_object() else {
        return record.node().to_string();
    };
    let width = fields.keys().map(String::len).max().unwrap_or(0);
    fields
        .iter()
        .map(|(key, value)| format!("{key:<width$}  {}", value.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Lookup")]
    lookup: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// The selection specs a family's forms pick from.
pub fn render_lookups(format: OutputFormat, family: Family, state: &SliceState) -> String {
    let specs: Vec<_> = family
        .lookups()
        .iter()
        .filter_map(|kind| state.lookup(*kind).map(|l| &l.spec))
        .collect();

    match format {
        OutputFormat::Table => {
            let rows: Vec<OptionRow> = specs
                .iter()
                .flat_map(|spec| {
                    spec.options.iter().map(|o| OptionRow {
                        lookup: spec.name.clone(),
                        label: o.label.clone(),
                        value: o.value.clone(),
                    })
                })
                .collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(&specs),
        OutputFormat::JsonCompact => render_json_compact(&specs),
        OutputFormat::Yaml => render_yaml(&specs),
        OutputFormat::Plain => specs
            .iter()
            .flat_map(|spec| spec.options.iter().skip(1).map(|o| o.value.clone()))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json_pretty<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

pub(crate) fn render_json_compact<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
