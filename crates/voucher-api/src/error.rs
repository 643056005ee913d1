use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::envelope::Envelope;

/// Failure of a single request, rendered as an error envelope.
///
/// Every variant answers with HTTP 200; clients read `status` in the body.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid GET action. Use action=load")]
    InvalidGetAction,
    #[error("Unknown action: {}", .0.as_deref().unwrap_or("undefined"))]
    UnknownAction(Option<String>),
    #[error("Invalid request payload: {0}")]
    Decode(String),
    #[error("Sync error: {0}")]
    Sync(voucher_core::Error),
    #[error("Load error: {0}")]
    Load(voucher_core::Error),
}

impl ActionError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidGetAction | Self::UnknownAction(_) => "routing",
            Self::Decode(_) => "decode",
            Self::Sync(_) => "sync",
            Self::Load(_) => "load",
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!(kind = self.kind(), %message, "Request failed");
        (StatusCode::OK, Envelope::error(message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_operation_prefix() {
        assert_eq!(
            ActionError::UnknownAction(Some("delete".to_string())).to_string(),
            "Unknown action: delete"
        );
        assert_eq!(
            ActionError::UnknownAction(None).to_string(),
            "Unknown action: undefined"
        );
        assert_eq!(
            ActionError::Sync(voucher_core::Error::InvalidInput("voucher data is missing".into()))
                .to_string(),
            "Sync error: Invalid input: voucher data is missing"
        );
        assert_eq!(
            ActionError::Load(voucher_core::Error::Storage("gone".into())).to_string(),
            "Load error: Storage error: gone"
        );
    }

    #[test]
    fn errors_respond_with_ok_status() {
        let response = ActionError::InvalidGetAction.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
