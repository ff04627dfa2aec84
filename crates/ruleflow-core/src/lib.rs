//! ruleflow Core Library
//!
//! Shared types for the ruleflow workspace.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers ([`UserId`])
//! - [`context`] - Per-attempt authentication context ([`AttemptContext`])
//! - [`user`] - Per-attempt user record ([`UserRecord`])
//!
//! # Example
//!
//! ```
//! use ruleflow_core::{AttemptContext, UserId, UserRecord};
//!
//! let user = UserRecord::new("auth0|5f7c8ec7");
//! let ctx = AttemptContext::default();
//!
//! assert_eq!(user.user_id, UserId::from("auth0|5f7c8ec7"));
//! assert!(ctx.redirect.is_none());
//! ```

pub mod context;
pub mod ids;
pub mod user;

// Re-export main types for convenient access
pub use context::{AttemptContext, Redirect, RequestInfo};
pub use ids::UserId;
pub use user::UserRecord;
