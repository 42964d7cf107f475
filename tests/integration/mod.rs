//! Integration test suite for kanso.
//!
//! These tests drive the public API end to end: controller operations
//! against a live store, snapshot subscriptions, and file persistence.
//!
//! # Test Categories
//!
//! - `derivation_flow`: subtask/lane scenarios for the progress rule
//! - `board_flow`: membership, permissions, assignment, deletion
//! - `persistence`: file-backed store durability and live refresh
//!
//! No external services are involved; everything runs against the
//! in-process stores, making the suite safe for CI.

mod fixtures;

mod board_flow;
mod derivation_flow;
mod persistence;
