pub mod error;
pub mod model;
pub mod service;

mod service_test;
