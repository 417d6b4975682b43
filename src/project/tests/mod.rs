//! Unit tests for project configuration resolution.
//!
//! - `helpers`: temporary directory and file fixtures
//! - `discovery`: topmost file selection
//! - `parsing`: JSON and XML document parsing
//! - `resolution`: end-to-end resolution, fallback, and overrides

mod helpers;
