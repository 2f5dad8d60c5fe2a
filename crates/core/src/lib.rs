//! Shared domain types for the SkinAI service.
//!
//! Everything here is free of I/O frameworks so the API, trainer and
//! dashboards can all depend on it.

pub mod error;
pub mod feedback;
pub mod paths;
pub mod ports;
pub mod profile;
pub mod types;
pub mod upload;
