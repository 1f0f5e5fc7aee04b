//! HTTP error plumbing shared by the service handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::Error;

/// An error response with a `{"detail": "..."}` body, the shape the image
/// service clients already parse.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(_) | Error::Image(_) => Self::bad_request(err.to_string()),
            Error::Artifact(_) => Self::unavailable(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

/// Error response with a custom body key, for services whose historical
/// error shape is `{"error": "..."}` instead of `{"detail": "..."}`.
pub fn json_error(status: StatusCode, key: &str, msg: &str) -> Response {
    (status, Json(json!({ key: msg }))).into_response()
}

/// Whether the uploaded filename carries an accepted image extension
pub fn allowed_image_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ext == "png" || ext == "jpg" || ext == "jpeg"
        })
        .unwrap_or(false)
}

/// Round to two decimal places, the precision used on the wire
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let api: ApiError = Error::InvalidInput("empty upload".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);

        let api: ApiError = Error::Image("bad magic bytes".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);

        let api: ApiError = Error::Artifact("missing record".into()).into();
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);

        let api: ApiError = Error::Model("shape mismatch".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_allowed_image_extension() {
        assert!(allowed_image_extension("cow.png"));
        assert!(allowed_image_extension("cow.JPG"));
        assert!(allowed_image_extension("a.b.jpeg"));
        assert!(!allowed_image_extension("cow.gif"));
        assert!(!allowed_image_extension("cow"));
        assert!(!allowed_image_extension(""));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(53.4567), 53.46);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(100.0), 100.0);
    }
}
