//! Shared test utilities for navstate
//!
//! - Recording view trees that stand in for a real UI
//! - Counting inflater factories

pub mod fixtures;
