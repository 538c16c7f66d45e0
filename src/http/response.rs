//! Response writing.
//!
//! # Responsibilities
//! - Map each [`Outcome`] to exactly one HTTP status and body
//! - Serialize success payloads directly, everything else as an [`Envelope`]
//! - Keep upstream internals out of client-visible errors
//!
//! # Design Decisions
//! - Bodies are always JSON; `Content-Type` comes from `axum::Json` once
//! - Envelope fields that are absent are omitted, never `null`
//! - Fixed messages are user-facing strings of the public API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::outcome::Outcome;

/// Request parameters missing or malformed.
pub const ERROR_BAD_REQUEST: &str = "Неверный запрос";
/// Upstream did not answer within the deadline.
pub const ERROR_UPSTREAM_TIMEOUT: &str = "Превышено время ожидания ответа от https://hmtpk.ru";
/// Upstream request-rate ceiling was hit.
pub const ERROR_TOO_MANY_REQUESTS: &str = "Превышено количество запросов к ХМТПК API в секунду";
/// Any upstream failure without a user-facing message.
pub const ERROR_UPSTREAM: &str = "Произошла ошибка в ХМТПК API";

/// Body of every non-payload response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(text.into()),
        }
    }

    /// Envelope carrying the status text: a message for 200, an error otherwise.
    pub fn for_status(status: StatusCode) -> Self {
        let text = status.canonical_reason().unwrap_or("Unknown");
        if status == StatusCode::OK {
            Self::message(text)
        } else {
            Self::error(text)
        }
    }
}

/// Write `body` as JSON with `status`.
pub fn write<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

/// Write a body-less response: the envelope for `status`.
pub fn write_empty(status: StatusCode) -> Response {
    write(status, Envelope::for_status(status))
}

fn write_error(status: StatusCode, text: String) -> Response {
    // Never emit `{}`: an empty upstream message falls back to the status text.
    if text.is_empty() {
        write_empty(status)
    } else {
        write(status, Envelope::error(text))
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        match self {
            Outcome::Success(payload) => write(StatusCode::OK, payload),
            Outcome::ClientError => write_error(StatusCode::BAD_REQUEST, ERROR_BAD_REQUEST.into()),
            Outcome::UpstreamTimeout => {
                write_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_UPSTREAM_TIMEOUT.into())
            }
            Outcome::UpstreamBadRequest(message) => write_error(StatusCode::BAD_REQUEST, message),
            Outcome::UpstreamBadResponse(message) => {
                write_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            Outcome::UpstreamRateLimited => {
                write_error(StatusCode::TOO_MANY_REQUESTS, ERROR_TOO_MANY_REQUESTS.into())
            }
            Outcome::UpstreamUnknown => {
                write_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_UPSTREAM.into())
            }
        }
    }
}

/// Fallback for paths outside the API.
pub async fn not_found() -> Response {
    write_empty(StatusCode::NOT_FOUND)
}

/// Fallback for known paths hit with the wrong method.
pub async fn method_not_allowed() -> Response {
    write_empty(StatusCode::METHOD_NOT_ALLOWED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::header::CONTENT_TYPE};

    async fn parts(response: Response) -> (StatusCode, String, serde_json::Value) {
        let status = response.status();
        let content_type = response
            .headers()
            .get_all(CONTENT_TYPE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(content_type.len(), 1);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type[0].clone(), serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        assert_eq!(
            serde_json::to_string(&Envelope::error("boom")).unwrap(),
            r#"{"Error":"boom"}"#
        );
        assert_eq!(
            serde_json::to_string(&Envelope::for_status(StatusCode::OK)).unwrap(),
            r#"{"Message":"OK"}"#
        );
        assert_eq!(
            Envelope::for_status(StatusCode::NOT_FOUND),
            Envelope::error("Not Found")
        );
    }

    #[tokio::test]
    async fn test_success_is_not_wrapped() {
        let (status, content_type, body) =
            parts(Outcome::Success(vec!["a", "b"]).into_response()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_status_table() {
        let cases: Vec<(Outcome<()>, StatusCode, &str)> = vec![
            (Outcome::ClientError, StatusCode::BAD_REQUEST, ERROR_BAD_REQUEST),
            (Outcome::UpstreamTimeout, StatusCode::INTERNAL_SERVER_ERROR, ERROR_UPSTREAM_TIMEOUT),
            (Outcome::UpstreamBadRequest("нет такой группы".into()), StatusCode::BAD_REQUEST, "нет такой группы"),
            (Outcome::UpstreamBadResponse("битый ответ".into()), StatusCode::INTERNAL_SERVER_ERROR, "битый ответ"),
            (Outcome::UpstreamRateLimited, StatusCode::TOO_MANY_REQUESTS, ERROR_TOO_MANY_REQUESTS),
            (Outcome::UpstreamUnknown, StatusCode::INTERNAL_SERVER_ERROR, ERROR_UPSTREAM),
        ];

        for (outcome, expected_status, expected_error) in cases {
            let (status, _, body) = parts(outcome.into_response()).await;
            assert_eq!(status, expected_status);
            assert_eq!(body, serde_json::json!({ "Error": expected_error }));
        }
    }

    #[tokio::test]
    async fn test_empty_upstream_message_falls_back() {
        let (status, _, body) =
            parts(Outcome::<()>::UpstreamBadRequest(String::new()).into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "Error": "Bad Request" }));
    }
}
