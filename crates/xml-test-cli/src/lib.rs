//! Shared setup for the `execute-tests` and `compare-results` binaries

pub mod logging;
