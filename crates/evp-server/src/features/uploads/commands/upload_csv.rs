//! CSV upload command
//!
//! Receives the multipart request, locates the uploaded file field, and runs
//! one complete ingestion session over its byte stream. The field's bytes are
//! streamed straight into the pipeline's decoder; the file is never buffered
//! in full.

use axum::extract::multipart::{Field, Multipart};
use futures::stream;
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use evp_common::types::SessionState;
use evp_pipeline::{PipelineError, SessionManager};

/// Multipart field name carrying the CSV file
pub const FIELD_FILE: &str = "file";

/// Required content type of the uploaded file
pub const CONTENT_TYPE_CSV: &str = "text/csv";

/// Error type for the upload command
#[derive(Debug, thiserror::Error)]
pub enum UploadCsvError {
    #[error("No file uploaded")]
    NoFile,
    #[error("Invalid file type")]
    InvalidFileType,
    #[error("Failed to read multipart stream: {0}")]
    Multipart(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Run one ingestion session over the uploaded file
///
/// Expects exactly one `file` field with content type `text/csv`; other
/// fields are ignored. Returns the session's final report.
#[tracing::instrument(skip(manager, multipart))]
pub async fn handle(
    manager: Arc<SessionManager>,
    mut multipart: Multipart,
) -> Result<SessionState, UploadCsvError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadCsvError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FIELD_FILE) {
            continue;
        }

        if field.content_type() != Some(CONTENT_TYPE_CSV) {
            tracing::warn!(
                content_type = field.content_type().unwrap_or("none"),
                "Rejected upload with invalid file type"
            );
            return Err(UploadCsvError::InvalidFileType);
        }

        let reader = StreamReader::new(Box::pin(field_byte_stream(field)));
        let report = manager.ingest(reader).await?;
        return Ok(report);
    }

    tracing::warn!("Upload request carried no file field");
    Err(UploadCsvError::NoFile)
}

/// Adapt a multipart field into a fallible byte-chunk stream usable as an
/// `AsyncRead`
fn field_byte_stream(
    field: Field<'_>,
) -> impl stream::Stream<Item = Result<axum::body::Bytes, io::Error>> + Send + '_ {
    stream::try_unfold(field, |mut field| async move {
        match field.chunk().await {
            Ok(Some(bytes)) => Ok(Some((bytes, field))),
            Ok(None) => Ok(None),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    })
}
