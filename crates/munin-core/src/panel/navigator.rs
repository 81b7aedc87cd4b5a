// ── Panel navigation ──
//
// Tracks which record and detail section a panel shows and turns that
// into a pathname for the router. The router owns the actual URL.

use std::sync::Arc;

use tracing::trace;

use crate::collab::Router;
use crate::model::Family;

/// Section shown when none is given; omitted from pathnames.
pub const DEFAULT_SECTION: &str = "general";

/// Pathname segment of the creation popup.
pub const NEW_SEGMENT: &str = "new";

/// What to do with one segment of the location when navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Leave it as it is.
    Keep,
    /// Drop it (and, for the id, every segment after it).
    Clear,
    Set(&'a str),
}

/// The record and section a panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub id: Option<String>,
    pub section: Option<String>,
}

impl Location {
    /// `/{route}[/{id}[/{section}]]`, omitting the default section.
    pub fn pathname(&self, route: &str) -> String {
        let mut path = format!("/{route}");
        if let Some(id) = &self.id {
            path.push('/');
            path.push_str(id);
            if let Some(section) = self.section.as_deref().filter(|s| *s != DEFAULT_SECTION) {
                path.push('/');
                path.push_str(section);
            }
        }
        path
    }
}

/// Location state of one panel.
pub struct Navigator {
    route: &'static str,
    location: Location,
    router: Arc<dyn Router>,
}

impl Navigator {
    pub fn new(family: Family, router: Arc<dyn Router>) -> Self {
        Self {
            route: family.route(),
            location: Location::default(),
            router,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn pathname(&self) -> String {
        self.location.pathname(self.route)
    }

    /// The selected record id, unless the creation popup is open.
    pub fn selected(&self) -> Option<&str> {
        self.location.id.as_deref().filter(|id| *id != NEW_SEGMENT)
    }

    /// Move to a new location. Empty targets clear. Returns whether a
    /// new pathname was pushed.
    pub fn navigate(&mut self, id: Target<'_>, section: Target<'_>) -> bool {
        let mut next = self.location.clone();
        match id {
            Target::Keep => {}
            Target::Set(id) if !id.is_empty() => next.id = Some(id.to_owned()),
            Target::Set(_) | Target::Clear => {
                next.id = None;
                next.section = None;
            }
        }
        match section {
            Target::Keep => {}
            Target::Set(section) if !section.is_empty() => next.section = Some(section.to_owned()),
            Target::Set(_) | Target::Clear => next.section = None,
        }

        let current = self.pathname();
        let pathname = next.pathname(self.route);
        self.location = next;
        if pathname == current {
            return false;
        }
        trace!(%pathname, "navigate");
        self.router.push(&pathname);
        true
    }

    /// Open a record's default section.
    pub fn open(&mut self, id: &str) -> bool {
        self.navigate(Target::Set(id), Target::Set(DEFAULT_SECTION))
    }

    /// Open the creation popup.
    pub fn open_create(&mut self) -> bool {
        self.navigate(Target::Set(NEW_SEGMENT), Target::Clear)
    }

    /// Back to the bare list.
    pub fn close(&mut self) -> bool {
        self.navigate(Target::Clear, Target::Clear)
    }
}
