// ── Flex-table reducer ──
//
// Generic list-view state shared by every panel: which collapsible
// sub-tables exist and whether each is collapsed.

use super::{Action, Reducer};
use crate::store::{SliceState, TableState};

/// Handles table registration and collapse toggles; ignores the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableReducer;

impl Reducer for TableReducer {
    fn reduce(&self, mut state: SliceState, action: &Action) -> SliceState {
        match action {
            Action::RegisterTable { uid, collapsed } => {
                let collapsed = collapsed.unwrap_or(state.collapsed);
                state
                    .tables
                    .entry(uid.clone())
                    .or_insert(TableState { collapsed });
            }
            Action::ToggleTable { uid } => {
                let global = state.collapsed;
                let table = state
                    .tables
                    .entry(uid.clone())
                    .or_insert(TableState { collapsed: global });
                table.collapsed = !table.collapsed;
            }
            Action::ToggleAll => {
                state.collapsed = !state.collapsed;
                let collapsed = state.collapsed;
                for table in state.tables.values_mut() {
                    table.collapsed = collapsed;
                }
            }
            _ => {}
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(uid: &str, collapsed: Option<bool>) -> Action {
        Action::RegisterTable {
            uid: uid.into(),
            collapsed,
        }
    }

    #[test]
    fn registration_inherits_the_global_flag() {
        let state = SliceState {
            collapsed: true,
            ..SliceState::default()
        };
        let state = TableReducer.reduce(state, &register("postgres", None));
        assert!(state.is_collapsed("postgres"));
    }

    #[test]
    fn re_registration_keeps_the_existing_entry() {
        let state = TableReducer.reduce(SliceState::default(), &register("postgres", None));
        let state = TableReducer.reduce(state, &Action::ToggleTable { uid: "postgres".into() });
        let state = TableReducer.reduce(state, &register("postgres", Some(false)));
        assert!(state.is_collapsed("postgres"));
    }

    #[test]
    fn toggle_flips_one_table() {
        let state = TableReducer.reduce(SliceState::default(), &register("a", None));
        let state = TableReducer.reduce(state, &register("b", None));
        let state = TableReducer.reduce(state, &Action::ToggleTable { uid: "a".into() });
        assert!(state.is_collapsed("a"));
        assert!(!state.is_collapsed("b"));
    }

    #[test]
    fn toggle_all_aligns_every_table() {
        let state = TableReducer.reduce(SliceState::default(), &register("a", Some(true)));
        let state = TableReducer.reduce(state, &register("b", Some(false)));
        let state = TableReducer.reduce(state, &Action::ToggleAll);
        assert!(state.collapsed);
        assert!(state.is_collapsed("a") && state.is_collapsed("b"));

        let state = TableReducer.reduce(state, &Action::ToggleAll);
        assert!(!state.is_collapsed("a") && !state.is_collapsed("b"));
        assert!(!state.is_collapsed("unregistered"));
    }

    #[test]
    fn domain_actions_pass_through() {
        let state = TableReducer.reduce(SliceState::default(), &register("a", None));
        let next = TableReducer.reduce(state.clone(), &Action::SetFilter("x".into()));
        assert_eq!(next, state);
    }
}
