//! Domain layer of the auth core.

pub mod clock;
pub mod error;
pub mod password;
pub mod service;
pub mod token;


pub use error::DomainError;
pub use service::AuthService;
