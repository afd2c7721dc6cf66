//! HTTP API Tests

mod diagnostics_tests;
mod events_tests;
mod health_tests;
