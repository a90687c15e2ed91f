//! Uploads feature module
//!
//! Multipart CSV reception feeding the validation pipeline, plus read-only
//! progress queries by session identifier.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::UploadCsvError;

pub use queries::GetStatusQuery;

pub use routes::uploads_routes;
