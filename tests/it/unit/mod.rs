//! Unit tests for pinkbombs.

mod config_tests;
mod perf_tests;
mod registry_tests;
mod snapshot_tests;
