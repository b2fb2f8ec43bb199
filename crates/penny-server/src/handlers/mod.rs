//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod advice;
pub mod categorize;
pub mod health;

// Re-export all handlers for use in router
pub use advice::*;
pub use categorize::*;
pub use health::*;
