//! EVP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the EVP workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all EVP workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing configuration and initialization
//! - **Types**: Shared domain types for records, sessions, and reports
//!
//! # Example
//!
//! ```no_run
//! use evp_common::types::SessionState;
//!
//! let state = SessionState::new("0192d5a0-0000-7000-8000-000000000000");
//! assert_eq!(state.total_records, 0);
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{EvpError, Result};
