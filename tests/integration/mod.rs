//! Integration tests for navstate
//!
//! These tests verify that state records, scopes and storage work together.

#[path = "../common/mod.rs"]
pub mod common;

pub mod state_persistence;
