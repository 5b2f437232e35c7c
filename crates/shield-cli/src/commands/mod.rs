//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Load a request from files and run the analysis
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `serve` - Web server command
//! - `status` - Status and stored alert commands

pub mod analyze;
pub mod core;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use serve::*;
pub use status::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
