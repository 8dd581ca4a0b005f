//! CLI command implementations.

pub mod config;
pub mod key;
pub mod menu;
pub mod mode;
pub mod providers;
pub mod reverse;
pub mod setup;
pub mod status;
pub mod watch;
