use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Maps a use-case error onto the JSON envelope every handler shares. The
/// use cases own their status mapping via `status_code()`; this only shapes
/// the body.
pub fn error_response(status: StatusCode, message: String) -> Response {
    let message = match status {
        // Don't leak internal error detail to the client.
        StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
        _ => message,
    };

    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_detail() {
        let response = error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "connection refused at 10.0.0.5".to_string(),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_keep_their_message() {
        let response = error_response(StatusCode::BAD_REQUEST, "invalid document".to_string());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
