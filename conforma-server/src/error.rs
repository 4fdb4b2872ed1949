use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use conforma_core::errors::Error;

/// Boundary wrapper so handlers can `?` any `anyhow::Error`.
#[derive(Debug)]
pub struct ApiError(pub anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e.into_anyhow())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self(anyhow::Error::new(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // If it's a structured error (even wrapped by anyhow contexts),
        // preserve its status and envelope.
        if let Some(err) = self.0.chain().find_map(|e| e.downcast_ref::<Error>()) {
            let safe = err.sanitize_for_client();
            let status =
                StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, Json(safe.to_json())).into_response();
        }

        tracing::error!(error = %self.0, "unhandled error at route boundary");

        // Anything else becomes a General error with the message hidden.
        let safe = Error::general("Internal server error").sanitize_for_client();
        (StatusCode::INTERNAL_SERVER_ERROR, Json(safe.to_json())).into_response()
    }
}

/// Malformed request bodies map to the Validation kind.
pub fn from_json_rejection(rejection: JsonRejection) -> ApiError {
    Error::validation("Failed to parse the request body as JSON")
        .with_details(json!({"_body": [rejection.to_string()]}))
        .into_anyhow()
        .into()
}
