//! CLI subcommand implementations.

pub mod conflicts;
pub mod cost;
pub mod layout;
pub mod util;
