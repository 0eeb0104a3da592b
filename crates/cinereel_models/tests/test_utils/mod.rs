//! Test utilities for cinereel_models tests.
//!
//! This module provides a scripted backend for the studio model calls.

#![allow(dead_code)]

pub mod mock_backend;

#[allow(unused_imports)]
pub use mock_backend::{MockBackend, MockResponse};
