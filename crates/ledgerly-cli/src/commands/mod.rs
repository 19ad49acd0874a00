//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `records` - Weekly and monthly record commands (show, set)
//! - `serve` - Web server command
//! - `status` - Status and dashboard commands
//! - `users` - User account commands (add, list)

pub mod core;
pub mod records;
pub mod serve;
pub mod status;
pub mod users;

// Re-export command functions for main.rs
pub use core::*;
pub use records::*;
pub use serve::*;
pub use status::*;
pub use users::*;
