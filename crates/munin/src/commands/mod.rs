//! Command handlers.

pub mod config_cmd;
pub mod entity;
pub mod util;
