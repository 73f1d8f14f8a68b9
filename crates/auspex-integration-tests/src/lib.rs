//! Integration test crate for the auspex engine.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end flows across the engine: pair lifecycle,
//! datapoint aggregation, the commit-reveal beacon, and reward routing.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p auspex-integration-tests
//! ```
