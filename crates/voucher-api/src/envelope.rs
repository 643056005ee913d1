use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use voucher_core::{LoadOutcome, Voucher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Uniform JSON response body for every outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vouchers: Option<Vec<Voucher>>,
}

impl Envelope {
    pub fn synced(count: usize) -> Self {
        Self {
            status: Status::Success,
            message: Some("Vouchers synced successfully".to_string()),
            count: Some(count),
            vouchers: None,
        }
    }

    pub fn loaded(outcome: LoadOutcome) -> Self {
        Self {
            status: Status::Success,
            message: outcome.message().map(str::to_string),
            count: None,
            vouchers: Some(outcome.into_vouchers()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            count: None,
            vouchers: None,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
