//! Integration tests for the retrieval pipeline
//!
//! These tests use wiremock to stand in for the certificate portal and
//! drive the real HTTP transport end-to-end.

mod batch_tests;
mod support;
