//! Integration tests for pinkbombs.
//!
//! These tests load real files from temporary data directories and go
//! through the dispatcher, the router, the listener or the batch generator.

mod batch_tests;
mod dispatch_tests;
