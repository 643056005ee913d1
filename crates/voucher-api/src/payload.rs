//! POST body decoding.
//!
//! Clients send either a JSON document or form fields (URL-encoded or
//! multipart) whose `data` field holds the voucher batch as a JSON string.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use serde_json::Value;

use crate::error::ActionError;

const ACTION_FIELD: &str = "action";
const DATA_FIELD: &str = "data";

/// A POST payload before it is interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(HashMap<String, String>),
}

/// What a POST asks the service to do
#[derive(Debug, Clone, PartialEq)]
pub enum PostCommand {
    Sync { data: Option<Value> },
}

impl RequestBody {
    /// Read the body according to its content type.
    ///
    /// Query-string fields are merged under form fields and stand in for
    /// the payload when the body is empty.
    pub async fn extract(
        request: Request,
        query: HashMap<String, String>,
    ) -> Result<Self, ActionError> {
        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
                .await
                .map_err(|err| ActionError::decode(err.to_string()))?;
            return Ok(Self::Form(merge_fields(query, fields)));
        }

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(request, &())
                .await
                .map_err(|err| ActionError::decode(err.to_string()))?;
            let mut fields = HashMap::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|err| ActionError::decode(err.to_string()))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|err| ActionError::decode(err.to_string()))?;
                fields.insert(name, value);
            }
            return Ok(Self::Form(merge_fields(query, fields)));
        }

        let body = Bytes::from_request(request, &())
            .await
            .map_err(|err| ActionError::decode(err.to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Form(query));
        }

        serde_json::from_slice(&body)
            .map(Self::Json)
            .map_err(|err| ActionError::decode(format!("body is not valid JSON: {err}")))
    }

    /// Interpret the payload.
    ///
    /// Decoding happens before routing, so a malformed `data` field is
    /// reported even when the action is unknown.
    pub fn into_command(self) -> Result<PostCommand, ActionError> {
        let (action, data) = match self {
            Self::Json(Value::Object(mut object)) => {
                let action = object.remove(ACTION_FIELD).map(action_text);
                (action, object.remove(DATA_FIELD))
            }
            Self::Json(_) => (None, None),
            Self::Form(mut fields) => {
                let data = fields
                    .remove(DATA_FIELD)
                    .map(|raw| {
                        serde_json::from_str::<Value>(&raw).map_err(|err| {
                            ActionError::decode(format!("form field `data` is not valid JSON: {err}"))
                        })
                    })
                    .transpose()?;
                (fields.remove(ACTION_FIELD), data)
            }
        };

        match action.as_deref() {
            Some("sync") => Ok(PostCommand::Sync { data }),
            _ => Err(ActionError::UnknownAction(action)),
        }
    }
}

fn merge_fields(
    mut query: HashMap<String, String>,
    fields: HashMap<String, String>,
) -> HashMap<String, String> {
    query.extend(fields);
    query
}

fn action_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
