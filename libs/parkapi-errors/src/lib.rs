#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Error responses shared by the ParkAPI REST layers.
//!
//! Every module converts its domain errors into a [`Problem`], which renders as
//! `application/problem+json` so clients see one error shape across the API.

pub mod problem;

pub use problem::{APPLICATION_PROBLEM_JSON, Problem};
