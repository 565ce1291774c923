use axum::http::StatusCode;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    status_code: u16,
    message: String,
}

impl ErrorResponse {
    pub(super) fn new(status: StatusCode, message: String) -> Self {
        Self {
            status_code: status.as_u16(),
            message,
        }
    }
}
