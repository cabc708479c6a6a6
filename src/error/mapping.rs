//! Mapping from storage server error responses to typed errors.

use super::*;
use serde::Deserialize;

/// An HTTP error response as received from the server.
///
/// `body` is kept verbatim; `code` and `message` are best-effort extractions
/// from a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Server error code, if the body carried one.
    pub code: Option<String>,
    /// Human-readable message, if the body carried one.
    pub message: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl ErrorResponse {
    /// Build an error response from a status and a raw body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();
        let (code, message) = match parsed {
            Some(parsed) => parsed.into_parts(),
            None => (None, None),
        };
        Self {
            status,
            code,
            message,
            body,
        }
    }

    /// Build an error response from raw body bytes.
    pub fn from_bytes(status: u16, body: &[u8]) -> Self {
        Self::new(status, String::from_utf8_lossy(body).into_owned())
    }
}

/// JSON error body shapes the server is known to send.
///
/// Accepts `{"code": "...", "message": "..."}`, `{"error": "...", "message": "..."}`
/// and `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code field.
    #[serde(default)]
    pub code: Option<String>,
    /// Error field, either a code string or a nested object.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    /// Message field.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    fn into_parts(self) -> (Option<String>, Option<String>) {
        let mut code = self.code;
        let mut message = self.message;

        match self.error {
            Some(serde_json::Value::String(s)) => {
                if code.is_none() {
                    code = Some(s);
                } else if message.is_none() {
                    message = Some(s);
                }
            }
            Some(serde_json::Value::Object(map)) => {
                if code.is_none() {
                    code = map.get("code").and_then(|v| v.as_str()).map(String::from);
                }
                if message.is_none() {
                    message = map.get("message").and_then(|v| v.as_str()).map(String::from);
                }
            }
            _ => {}
        }

        (code, message)
    }
}

fn normalize_code(code: &str) -> String {
    code.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Map an error response to a typed error.
///
/// Below 500 a recognized server error code wins; otherwise the HTTP status
/// decides, so every 5xx maps to a retryable server error. `filename` is attached to not-found errors, `operation` labels
/// statuses that fit no other variant.
pub fn map_error_response(
    response: ErrorResponse,
    operation: &'static str,
    filename: Option<&str>,
    retry_after: Option<Duration>,
) -> MosError {
    let code = response
        .code
        .as_deref()
        .filter(|_| response.status < 500)
        .map(normalize_code);

    match code.as_deref() {
        Some("INVALID_ACCESS_KEY") | Some("UNKNOWN_ACCESS_KEY") => {
            return MosError::Access(AccessError::InvalidAccessKey { response })
        }
        Some("EXPIRED_SIGNATURE") | Some("SIGNATURE_EXPIRED") | Some("URL_EXPIRED") => {
            return MosError::Access(AccessError::ExpiredSignature { response })
        }
        Some("INVALID_SIGNATURE") | Some("SIGNATURE_MISMATCH") => {
            return MosError::Access(AccessError::InvalidSignature { response })
        }
        Some("PERMISSION_DENIED") | Some("INSUFFICIENT_PERMISSIONS") => {
            return MosError::Access(AccessError::PermissionDenied { response })
        }
        Some("NOT_FOUND") | Some("OBJECT_NOT_FOUND") | Some("FILE_NOT_FOUND") => {
            return MosError::Object(ObjectError::NotFound {
                filename: filename.unwrap_or_default().to_string(),
                response,
            })
        }
        Some("FILE_TOO_LARGE") | Some("PAYLOAD_TOO_LARGE") => {
            return MosError::Object(ObjectError::TooLarge { response })
        }
        _ => {}
    }

    match response.status {
        401 | 403 => MosError::Access(AccessError::AccessDenied { response }),
        404 => MosError::Object(ObjectError::NotFound {
            filename: filename.unwrap_or_default().to_string(),
            response,
        }),
        413 => MosError::Object(ObjectError::TooLarge { response }),
        502 => MosError::Server(ServerError::BadGateway { response }),
        503 => MosError::Server(ServerError::ServiceUnavailable {
            retry_after,
            response,
        }),
        500..=599 => MosError::Server(ServerError::InternalError { response }),
        _ => MosError::Response(ResponseError::UnexpectedStatus {
            operation,
            response,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(status: u16, body: &str) -> MosError {
        map_error_response(ErrorResponse::new(status, body), "test", Some("a.jpg"), None)
    }

    #[test]
    fn test_parses_flat_code() {
        let resp = ErrorResponse::new(401, r#"{"code":"EXPIRED_SIGNATURE","message":"too late"}"#);
        assert_eq!(resp.code.as_deref(), Some("EXPIRED_SIGNATURE"));
        assert_eq!(resp.message.as_deref(), Some("too late"));
    }

    #[test]
    fn test_parses_error_string_as_code() {
        let resp = ErrorResponse::new(401, r#"{"error":"INVALID_SIGNATURE"}"#);
        assert_eq!(resp.code.as_deref(), Some("INVALID_SIGNATURE"));
    }

    #[test]
    fn test_parses_nested_error_object() {
        let resp = ErrorResponse::new(
            403,
            r#"{"error":{"code":"PERMISSION_DENIED","message":"no delete"}}"#,
        );
        assert_eq!(resp.code.as_deref(), Some("PERMISSION_DENIED"));
        assert_eq!(resp.message.as_deref(), Some("no delete"));
    }

    #[test]
    fn test_non_json_body_kept_verbatim() {
        let resp = ErrorResponse::new(502, "<html>bad gateway</html>");
        assert!(resp.code.is_none());
        assert_eq!(resp.body, "<html>bad gateway</html>");
    }

    #[test]
    fn test_maps_access_codes() {
        assert!(matches!(
            map(401, r#"{"error":"invalid_access_key"}"#),
            MosError::Access(AccessError::InvalidAccessKey { .. })
        ));
        assert!(matches!(
            map(401, r#"{"code":"signature-expired"}"#),
            MosError::Access(AccessError::ExpiredSignature { .. })
        ));
        assert!(matches!(
            map(401, r#"{"code":"INVALID_SIGNATURE"}"#),
            MosError::Access(AccessError::InvalidSignature { .. })
        ));
        assert!(matches!(
            map(403, r#"{"code":"PERMISSION_DENIED"}"#),
            MosError::Access(AccessError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_falls_back_to_status() {
        assert!(matches!(map(401, ""), MosError::Access(AccessError::AccessDenied { .. })));
        match map(404, "missing") {
            MosError::Object(ObjectError::NotFound { filename, response }) => {
                assert_eq!(filename, "a.jpg");
                assert_eq!(response.body, "missing");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(map(503, ""), MosError::Server(ServerError::ServiceUnavailable { .. })));
        assert!(matches!(map(500, ""), MosError::Server(ServerError::InternalError { .. })));
        assert!(matches!(
            map(409, "conflict"),
            MosError::Response(ResponseError::UnexpectedStatus { operation: "test", .. })
        ));
    }

    #[test]
    fn test_server_status_wins_over_code() {
        let err = map(500, r#"{"code":"PERMISSION_DENIED"}"#);
        assert!(matches!(err, MosError::Server(ServerError::InternalError { .. })));
        assert!(err.is_retryable());

        let err = map(503, r#"{"error":"NOT_FOUND"}"#);
        assert!(matches!(err, MosError::Server(ServerError::ServiceUnavailable { .. })));
        assert!(err.is_retryable());
        assert_eq!(err.response_body(), Some(r#"{"error":"NOT_FOUND"}"#));
    }
}
