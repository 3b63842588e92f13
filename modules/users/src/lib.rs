//! ParkAPI users module
//!
//! ## Layers
//!
//! - **API** (`src/api/rest/`): DTOs, handlers and routes under `/api/v1/usuarios`
//! - **Domain** (`src/domain/`): [`UsersService`] with registration rules and
//!   ownership checks. Password changes are delegated to [`auth::AuthService`].
//! - **Infra** (`src/infra/storage/`): [`InMemoryUserRepository`], the
//!   [`auth_sdk::UserLookup`] implementation used by the server
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::error::DomainError;
pub use domain::model::User;
pub use domain::service::UsersService;
pub use infra::storage::in_memory::InMemoryUserRepository;
