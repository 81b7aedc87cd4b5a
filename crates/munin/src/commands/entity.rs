//! Panel command handlers, shared by every record family.

use munin_core::{Console, CoreError, Draft, EntityId, Family, Record};

use crate::cli::{EntityArgs, EntityCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn print_record(global: &GlobalOpts, family: Family, record: &Record) {
    let out = output::render_single(global.output, record, output::record_detail, |r| {
        output::record_id(family, r)
    });
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    family: Family,
    args: EntityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scoped = |err: CoreError| CliError::in_family(err, family);

    match args.command {
        EntityCommand::List {
            filter,
            collapsed,
            toggle,
        } => {
            console.fetch_list(family).await.map_err(scoped)?;
            if let Some(filter) = filter {
                console.set_filter(family, filter);
            }
            if collapsed {
                console.toggle_all(family);
            }
            let state = console.state(family);
            for group in state.groups.iter().flatten() {
                console.register_table(family, group.key.clone(), None);
            }
            for uid in toggle {
                console.toggle_table(family, uid);
            }

            let out = output::render_groups(global.output, family, &console.state(family));
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EntityCommand::Show { id } => {
            let id = EntityId::from(id);
            let record = console.fetch_one(family, &id).await.map_err(scoped)?;
            console.select(family, &id);
            print_record(global, family, &record);
            Ok(())
        }

        EntityCommand::Create { set, from_file } => {
            console.open_create(family);
            let mut draft = Draft::blank(family);
            util::fill_draft(console, &mut draft, from_file.as_deref(), &set).await?;
            if !draft.is_dirty() {
                return Err(CliError::Validation {
                    field: "set".into(),
                    reason: "nothing to create; pass --set or --from-file".into(),
                });
            }

            let record = console
                .create(family, draft.into_node())
                .await
                .map_err(scoped)?;
            print_record(global, family, &record);
            Ok(())
        }

        EntityCommand::Edit { id, set, from_file } => {
            let id = EntityId::from(id);
            let record = console.fetch_one(family, &id).await.map_err(scoped)?;
            console.select(family, &id);

            let mut draft = Draft::begin(family, &record);
            util::fill_draft(console, &mut draft, from_file.as_deref(), &set).await?;
            if !draft.is_dirty() {
                if !global.quiet {
                    eprintln!("Nothing to change on {family} \"{id}\"");
                }
                return Ok(());
            }

            let saved = console
                .edit(family, draft.into_node())
                .await
                .map_err(scoped)?;
            print_record(global, family, &saved);
            Ok(())
        }

        EntityCommand::Delete { id } => {
            let id = EntityId::from(id);
            let prompt = format!("Delete {family} \"{id}\"? This cannot be undone.");
            if !util::confirm(&format!("{} delete", family.plural()), &prompt, global.yes)? {
                return Ok(());
            }
            console.delete(family, &id).await.map_err(scoped)
        }

        EntityCommand::Lookups => {
            if family.lookups().is_empty() {
                if !global.quiet {
                    eprintln!("{} have no lookups", family.plural());
                }
                return Ok(());
            }
            for kind in family.lookups() {
                console
                    .fetch_lookup(family, *kind)
                    .await
                    .map_err(scoped)?;
            }

            let out = output::render_lookups(global.output, family, &console.state(family));
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
