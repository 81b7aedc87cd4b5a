// ── Panel controllers ──
//
// Behaviour behind the list, detail and popup views of a panel, without
// any rendering: drafts, form validation, and location tracking.

mod draft;
mod navigator;
mod validate;

pub use draft::{Draft, template};
pub use navigator::{DEFAULT_SECTION, Location, NEW_SEGMENT, Navigator, Target};
pub use validate::{patterned_fields, required_fields, validate};
