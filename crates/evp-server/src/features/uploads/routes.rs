use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::commands::{self, UploadCsvError};
use super::queries::{self, GetStatusQuery};
use evp_pipeline::PipelineError;

pub fn uploads_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(upload_csv))
        .route("/:session_id/status", get(get_status))
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_csv(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Result<Response, UploadsApiError> {
    let report = commands::upload_csv::handle(state.manager, multipart).await?;

    tracing::info!(
        session_id = %report.session_id,
        total_records = report.total_records,
        processed_records = report.processed_records,
        failed_records = report.failed_records,
        "CSV upload processed via API"
    );

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(report))).into_response())
}

#[tracing::instrument(skip(state), fields(session_id = %session_id))]
async fn get_status(
    State(state): State<FeatureState>,
    Path(session_id): Path<String>,
) -> Result<Response, UploadsApiError> {
    let status = queries::get_status::handle(state.manager, GetStatusQuery { session_id }).await?;

    tracing::debug!(progress = %status.progress, "Upload status served via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(status))).into_response())
}

#[derive(Debug)]
enum UploadsApiError {
    Upload(UploadCsvError),
    Status(PipelineError),
}

impl From<UploadCsvError> for UploadsApiError {
    fn from(err: UploadCsvError) -> Self {
        Self::Upload(err)
    }
}

impl From<PipelineError> for UploadsApiError {
    fn from(err: PipelineError) -> Self {
        Self::Status(err)
    }
}

impl IntoResponse for UploadsApiError {
    fn into_response(self) -> Response {
        match self {
            UploadsApiError::Upload(UploadCsvError::NoFile) => {
                let error = ErrorResponse::new("NO_FILE", "No file uploaded");
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            UploadsApiError::Upload(UploadCsvError::InvalidFileType) => {
                let error = ErrorResponse::new("INVALID_FILE_TYPE", "Invalid file type");
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            UploadsApiError::Upload(UploadCsvError::Multipart(_)) => {
                let error = ErrorResponse::new("MALFORMED_REQUEST", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            UploadsApiError::Upload(UploadCsvError::Pipeline(ref pipeline_err)) => {
                pipeline_error_response(pipeline_err)
            },
            UploadsApiError::Status(ref pipeline_err) => pipeline_error_response(pipeline_err),
        }
    }
}

/// Map a pipeline fault onto the API's error contract: client-input faults
/// are 4xx, internal faults are 5xx with the detail kept out of the body
fn pipeline_error_response(err: &PipelineError) -> Response {
    match err {
        PipelineError::Schema(_) => {
            let error = ErrorResponse::new("INVALID_CSV_HEADERS", err.to_string());
            (StatusCode::BAD_REQUEST, Json(error)).into_response()
        },
        PipelineError::NotFound(_) => {
            let error = ErrorResponse::new("NOT_FOUND", "Upload session not found");
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        },
        PipelineError::Decode(_) => {
            tracing::error!("Decode failure during upload: {}", err);
            let error = ErrorResponse::new("DECODE_ERROR", "Error processing CSV file");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        },
        PipelineError::Store(_) | PipelineError::Task(_) => {
            tracing::error!("Internal failure during upload: {}", err);
            let error = ErrorResponse::new("INTERNAL_ERROR", "Internal server error");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        },
    }
}

impl std::fmt::Display for UploadsApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload(e) => write!(f, "{}", e),
            Self::Status(e) => write!(f, "{}", e),
        }
    }
}
