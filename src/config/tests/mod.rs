//! Unit tests for settings loading and precedence.
//!
//! - `helpers`: shared layer composition
//! - `precedence`: layer precedence
//! - `operation_mode`: mode selection and required fields
//! - `loading`: environment and CLI loading

mod helpers;
