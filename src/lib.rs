//! DeFi project catalog API
//!
//! A small HTTP service that serves a fixed catalog of yield-farming
//! projects on `/` and Prometheus process metrics on `/metrics`.

pub mod app;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod server;
