//! ParkAPI auth core
//!
//! Owns the authentication subsystem of the API:
//!
//! - [`domain::token::TokenCodec`] - issues and validates HS256 bearer tokens
//! - [`domain::password::PasswordHasher`] - salted bcrypt hashing
//! - [`domain::service::AuthService`] - login, token issuance and password change
//! - [`middleware`] - the per-request authorization filter and the route guard
//!
//! User persistence is reached only through [`auth_sdk::UserLookup`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod middleware;

pub use config::{AuthConfig, JwtConfig, PasswordConfig};
pub use domain::clock::{Clock, ManualClock, SystemClock};
pub use domain::error::DomainError;
pub use domain::password::PasswordHasher;
pub use domain::service::AuthService;
pub use domain::token::{JwtToken, TokenCodec, TokenError, ValidatedClaims};
pub use middleware::{AuthRequirement, RoutePolicy, RoutePolicyBuilder};
