//! Streaming CSV record decoder
//!
//! Turns a raw byte stream into a lazy, finite, non-restartable sequence of
//! [`EmailRecord`]s. The header row is validated up front: both required
//! columns (`name`, `email`) must be present before any record is produced,
//! so no validation work is ever dispatched for a stream with a bad schema.
//!
//! Rows are decoded one at a time as they become available from the
//! underlying stream; the whole input is never resident in memory. Blank
//! lines are skipped by the underlying parser.

use csv_async::{AsyncReader, AsyncReaderBuilder, StringRecord};
use tokio::io::AsyncRead;

use crate::error::{PipelineError, PipelineResult};
use evp_common::types::EmailRecord;

/// Column name for the record holder's name
pub const COLUMN_NAME: &str = "name";

/// Column name for the email address under validation
pub const COLUMN_EMAIL: &str = "email";

/// Incremental decoder over a CSV byte stream
pub struct RecordDecoder<R: AsyncRead + Unpin + Send> {
    reader: AsyncReader<R>,
    headers: Vec<String>,
    row: StringRecord,
    name_idx: usize,
    email_idx: usize,
}

impl<R: AsyncRead + Unpin + Send> RecordDecoder<R> {
    /// Open a decoder over `reader` and validate the header row
    ///
    /// Fails with [`PipelineError::Schema`] if either required column is
    /// missing, before any record can be observed, and with
    /// [`PipelineError::Decode`] if the header row itself cannot be read.
    pub async fn new(reader: R) -> PipelineResult<Self> {
        let mut csv_reader = AsyncReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .create_reader(reader);

        let headers = csv_reader.headers().await?.clone();
        let name_idx = required_column(&headers, COLUMN_NAME)?;
        let email_idx = required_column(&headers, COLUMN_EMAIL)?;

        tracing::debug!(
            columns = headers.len(),
            "CSV header validated, required columns present"
        );

        Ok(Self {
            reader: csv_reader,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            row: StringRecord::new(),
            name_idx,
            email_idx,
        })
    }

    /// Column names present in the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Decode the next record, or `None` at normal end of stream
    ///
    /// A row that cannot be parsed (wrong field count, invalid UTF-8, IO
    /// fault) terminates the sequence with [`PipelineError::Decode`].
    pub async fn next_record(&mut self) -> PipelineResult<Option<EmailRecord>> {
        if !self.reader.read_record(&mut self.row).await? {
            return Ok(None);
        }

        // flexible(false) already rejected rows with the wrong field count,
        // so the required indexes are in range here
        let name = self.row.get(self.name_idx).unwrap_or("").to_string();
        let email = self.row.get(self.email_idx).unwrap_or("").to_string();

        Ok(Some(EmailRecord { name, email }))
    }
}

/// Find the position of a required column in the header row
fn required_column(headers: &StringRecord, column: &str) -> PipelineResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| PipelineError::Schema(column.to_string()))
}
