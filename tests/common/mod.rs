//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory application fixtures
//! - Authentication test helpers
//! - Custom assertion macros

pub mod assertions;
pub mod auth_helpers;
pub mod database;

// Re-export commonly used utilities
pub use auth_helpers::*;
pub use database::*;
