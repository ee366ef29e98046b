//! External Services
//!
//! This module contains the operations that talk to the server:
//! - shares: share listing aggregation
//! - actions: accept/reject/restore share actions

pub mod actions;
pub mod shares;

// Re-export commonly used items for convenience
pub use actions::ShareAction;
pub use shares::{endpoints_for, get_contents, get_view_contents};
