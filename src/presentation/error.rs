// API error mapping - every failure becomes a JSON body the UI can show in its dialog
use crate::application::error::RecordError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    Record(RecordError),
    UnknownModule(String),
    NotFound(String),
    /// Request body the extractor could not accept
    Rejected { status: StatusCode, message: String },
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Record(RecordError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Record(RecordError::NotFound(_)) | ApiError::Record(RecordError::UnknownTarget(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Record(
                RecordError::ConfirmationPending | RecordError::NothingPending | RecordError::StaleTicket(_),
            ) => StatusCode::CONFLICT,
            ApiError::Record(RecordError::ReadOnly(_)) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnknownModule(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Record(err @ RecordError::Validation { field, .. }) => ErrorBody {
                kind: "validation",
                message: err.to_string(),
                field: Some(field.clone()),
            },
            ApiError::Record(err @ (RecordError::NotFound(_) | RecordError::UnknownTarget(_))) => ErrorBody {
                kind: "not_found",
                message: err.to_string(),
                field: None,
            },
            ApiError::Record(err @ RecordError::ReadOnly(_)) => ErrorBody {
                kind: "read_only",
                message: err.to_string(),
                field: None,
            },
            ApiError::Record(err) => ErrorBody {
                kind: "conflict",
                message: err.to_string(),
                field: None,
            },
            ApiError::UnknownModule(slug) => ErrorBody {
                kind: "not_found",
                message: format!("module {} not found", slug),
                field: None,
            },
            ApiError::NotFound(path) => ErrorBody {
                kind: "not_found",
                message: format!("no route for {}", path),
                field: None,
            },
            ApiError::Rejected { message, .. } => ErrorBody {
                kind: "bad_request",
                message: message.clone(),
                field: None,
            },
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        ApiError::Record(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(%status, error = ?self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
