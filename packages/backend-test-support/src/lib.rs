//! Shared helpers for the backend's integration tests: one-time logging
//! init, error-contract assertions and unique test data.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;
