//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod alerts;
pub mod analyze;
pub mod health;

// Re-export all handlers for use in router
pub use alerts::*;
pub use analyze::*;
pub use health::*;
