#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod context;
pub mod role;

pub use context::{Principal, SecurityContext, SecurityContextBuilder};
pub use role::Role;
