//! ParkAPI server: configuration, logging and the assembled HTTP application.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod app;
pub mod config;
pub mod logging;
pub mod web;

pub use app::{Services, build_router, run};
pub use config::AppConfig;
