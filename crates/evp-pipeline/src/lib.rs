//! EVP Pipeline Library
//!
//! Streaming ingestion and bounded-concurrency validation pipeline.
//!
//! The pipeline decodes email records incrementally from a CSV byte stream,
//! dispatches each record to a concurrency-limited validation task, aggregates
//! pass/fail counts and failure detail, and persists that aggregate to a
//! session store so callers can poll progress while validation is still
//! running.
//!
//! # Components
//!
//! - [`decoder`]: incremental CSV decode with upfront schema validation
//! - [`limiter`]: caps the number of concurrently in-flight validation tasks
//! - [`aggregator`]: serialized mutation of one session's aggregate state
//! - [`session`]: orchestrates decode, validate, aggregate, and finalize
//! - [`validate`] / [`store`]: injected capability traits with built-in
//!   implementations
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use evp_pipeline::session::SessionManager;
//! use evp_pipeline::store::MemoryStore;
//! use evp_pipeline::validate::MockEmailValidator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let manager = SessionManager::new(
//!         Arc::new(MockEmailValidator::default()),
//!         Arc::new(MemoryStore::new()),
//!     );
//!
//!     let csv = "name,email\nAlice,alice@example.com\n";
//!     let report = manager.ingest(csv.as_bytes()).await?;
//!     assert_eq!(report.processed_records, 1);
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod decoder;
pub mod error;
pub mod limiter;
pub mod session;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use error::{PipelineError, PipelineResult};
pub use session::SessionManager;
