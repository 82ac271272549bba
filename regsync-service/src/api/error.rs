use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regsync_core::foundation::{ErrorClass, ErrorCode};
use regsync_core::RegsyncError;
use serde_json::json;

/// Engine error rendered as `{"error": {"code", "class", "message"}}`.
#[derive(Debug)]
pub struct ApiError(pub RegsyncError);

impl From<RegsyncError> for ApiError {
    fn from(err: RegsyncError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::InvalidPublicKey | ErrorCode::EncodingError | ErrorCode::SerializationError => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn class_label(class: ErrorClass) -> &'static str {
    match class {
        ErrorClass::Configuration => "configuration",
        ErrorClass::BatchFatal => "batch_fatal",
        ErrorClass::PerIdentity => "per_identity",
        ErrorClass::Transaction => "transaction",
        ErrorClass::Ambiguous => "ambiguous",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let context = self.0.context();
        let body = json!({
            "error": {
                "code": format!("{:?}", context.code),
                "class": class_label(self.0.class()),
                "message": context.message,
            }
        });
        (self.status(), Json(body)).into_response()
    }
}
