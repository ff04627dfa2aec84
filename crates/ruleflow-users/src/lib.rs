//! Remote user-profile updates for login-flow hooks.
//!
//! This crate provides:
//! - [`UserApiClient`] - a reqwest wrapper over the identity-management
//!   REST API, constructed from the per-attempt credentials supplied by
//!   the host, with a bounded retry budget
//! - [`UserUpdater`] - staged, namespace-aware mutations of a user
//!   record that can be pushed to the API on demand
//!
//! # Example
//!
//! ```rust,ignore
//! use ruleflow_core::UserRecord;
//! use ruleflow_users::{UserApiClient, UserUpdater};
//! use serde_json::json;
//!
//! let client = UserApiClient::new("tenant.example.com", access_token)?;
//! let mut user: UserRecord = /* supplied by the host */;
//!
//! let mut updater = UserUpdater::with_namespace(&mut user, "kyc");
//! updater.set_app_meta("is_verified", json!(true));
//! updater.push_app_metadata(&client).await?;
//! ```

pub mod client;
pub mod error;
pub mod retry;
pub mod updater;

// Re-export public API
pub use client::UserApiClient;
pub use error::{UserApiError, UserApiResult};
pub use retry::RetryPolicy;
pub use updater::UserUpdater;
