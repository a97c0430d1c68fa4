//! Configuration module
//!
//! Settings file handling and endpoint resolution.

pub mod config;
