//! API Commands
//!
//! Calls to the board API, organized by domain.

mod auth;
mod collection;
mod root;
mod sprint;
mod task;

// Re-export all public items
pub use auth::*;
pub use collection::*;
pub use root::*;
pub use sprint::*;
pub use task::*;
