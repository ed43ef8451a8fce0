//! # API Query Sample Library
//!
//! This library exposes the sample application's modules for integration testing.

pub mod lifecycle;
pub mod model;
pub mod server;
