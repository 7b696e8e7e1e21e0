// Re-export all types so callers can use `domain::types::*`
// while the code stays organized by concern.

pub use core::*;
pub use asset::*;
pub use notification::*;
pub use config::*;

// Module declarations
mod core;
mod asset;
mod notification;
mod config;
