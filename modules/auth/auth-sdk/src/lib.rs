//! Auth SDK
//!
//! This crate provides the contract between the auth core and user persistence:
//!
//! - [`UserLookup`] - capability the auth core consumes to find and store credentials
//! - [`Credential`] / [`NewCredential`] - credential models
//! - [`UserLookupError`] - error types
//!
//! ## Usage
//!
//! Persistence code implements the trait and hands it to the auth service:
//!
//! ```ignore
//! use auth_sdk::UserLookup;
//!
//! let lookup: Arc<dyn UserLookup> = Arc::new(InMemoryUserRepository::new());
//! let role = lookup.find_role_by_username("tody@email.com").await?;
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::UserLookup;
pub use error::UserLookupError;
pub use models::{Credential, NewCredential, UserId};
