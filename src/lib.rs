//! viddur - sum the playback duration of the videos in a directory tree
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod error;
pub mod report;
pub mod scanner;

pub use error::ViddurError;
