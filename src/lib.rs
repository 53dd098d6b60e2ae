//! City Forecast Library
//!
//! Resolves a city name to a multi-day temperature forecast through a shared
//! cache, and exposes the pieces the binary and integration tests build on.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod lookup;
pub mod mood;
pub mod report;
pub mod resolver;
pub mod ui;
