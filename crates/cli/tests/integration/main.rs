//! CLI integration tests.

mod build_tests;
