mod types;

use atrium_core::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub use types::ErrorResponse;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Configuration(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self.0 {
            AppError::Internal(_) => {
                tracing::error!(error = %self.0, "request failed");
                "internal server error".to_owned()
            }
            AppError::Configuration(_) => {
                tracing::error!(error = %self.0, "request failed on unusable configuration");
                self.0.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(status, message))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use atrium_core::AppError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::ApiError;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = ApiError(error).into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap_or_else(|_| unreachable!())
            .to_bytes();

        (
            status,
            serde_json::from_slice(&bytes).unwrap_or_else(|_| unreachable!()),
        )
    }

    #[tokio::test]
    async fn maps_each_category_to_its_status() {
        let cases = [
            (AppError::Validation("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".to_owned()), StatusCode::CONFLICT),
            (AppError::Unauthorized("x".to_owned()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".to_owned()), StatusCode::FORBIDDEN),
            (AppError::Configuration("x".to_owned()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal("x".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, body) = render(error).await;
            assert_eq!(status, expected);
            assert_eq!(body["statusCode"], expected.as_u16());
        }
    }

    #[tokio::test]
    async fn internal_details_stay_server_side() {
        let (_, body) = render(AppError::Internal("connection refused on 10.0.0.3".to_owned())).await;

        assert_eq!(body["message"], "internal server error");
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let (_, body) = render(AppError::Forbidden("access denied".to_owned())).await;

        assert_eq!(body["message"], "forbidden: access denied");
    }
}
