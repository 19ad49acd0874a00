//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod dashboard;
pub mod monthly;
pub mod weekly;

// Re-export all handlers for use in router
pub use auth::*;
pub use dashboard::*;
pub use monthly::*;
pub use weekly::*;
