//! Extraction of the answer text from a run response.
//!
//! The body is read as a loose JSON document. Fields the service may send with
//! varying types (`code`, `status`, error details) are inspected by shape, so a
//! numeric code never hides the diagnostic message next to it.

use crate::error::{CallerError, Result};
use serde_json::Value;

/// Run statuses that mean the assistant gave up.
const FAILED_STATUSES: &[&str] = &["failed", "cancelled", "canceled", "expired"];

/// Render a scalar JSON value as text; strings lose their quotes.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn run_status(reply: &Value) -> Option<String> {
    reply
        .get("statusEnum")
        .and_then(scalar_text)
        .or_else(|| reply.get("status").and_then(scalar_text))
}

fn run_failure(reply: &Value) -> Option<String> {
    let status = run_status(reply)?.to_ascii_lowercase();
    if !FAILED_STATUSES.contains(&status.as_str()) {
        return None;
    }

    let last_error = reply.get("lastError");
    let message = last_error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str);
    let code = last_error.and_then(|e| e.get("code")).and_then(scalar_text);

    let detail = match (message, code) {
        (Some(message), Some(code)) => format!("{} ({})", message, code),
        (Some(message), None) => message.to_string(),
        (None, _) => match last_error {
            // lastError given as a bare string
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => "Unknown error".to_string(),
        },
    };
    Some(format!("AI processing {}: {}", status, detail))
}

fn answer_text(reply: &Value) -> Option<String> {
    if let Some(text) = reply.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    let joined: String = reply
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b.get("text")?.get("value")?.as_str())
                .collect::<String>()
        })
        .unwrap_or_default();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn error_envelope(reply: &Value) -> Option<String> {
    let message = reply.get("message").and_then(Value::as_str)?;
    Some(match reply.get("code").and_then(scalar_text) {
        Some(code) => format!("{}: {}", code, message),
        None => message.to_string(),
    })
}

/// Extract the answer from a successful transport response body.
///
/// The answer text is returned exactly as sent by the service. An empty
/// body, an unparseable body, a failed run, an error envelope, and a reply
/// without answer text are all [`CallerError::RemoteApplication`].
pub fn extract_answer(body: &str) -> Result<String> {
    if body.trim().is_empty() {
        return Err(CallerError::RemoteApplication(
            "Remote service returned an empty body".to_string(),
        ));
    }

    let reply: Value = serde_json::from_str(body)?;
    if !reply.is_object() {
        return Err(CallerError::RemoteApplication(format!(
            "Unexpected response body: {}",
            body
        )));
    }

    if let Some(failure) = run_failure(&reply) {
        return Err(CallerError::RemoteApplication(failure));
    }

    match answer_text(&reply) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(CallerError::RemoteApplication(
            error_envelope(&reply)
                .unwrap_or_else(|| "Remote service returned no answer text".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_is_returned_verbatim() {
        let body = r#"{"statusEnum": "COMPLETED", "text": "  Refunds take 5 days. [policy-doc]\n"}"#;
        assert_eq!(
            extract_answer(body).unwrap(),
            "  Refunds take 5 days. [policy-doc]\n"
        );
    }

    #[test]
    fn test_content_blocks_are_concatenated() {
        let body = r#"{"content": [
            {"type": "text", "text": {"value": "First paragraph. "}},
            {"type": "image"},
            {"type": "text", "text": {"value": "Second paragraph."}}
        ]}"#;
        assert_eq!(
            extract_answer(body).unwrap(),
            "First paragraph. Second paragraph."
        );
    }

    #[test]
    fn test_empty_body_is_remote_error() {
        assert!(matches!(
            extract_answer(""),
            Err(CallerError::RemoteApplication(_))
        ));
        assert!(matches!(
            extract_answer("  \n"),
            Err(CallerError::RemoteApplication(_))
        ));
    }

    #[test]
    fn test_malformed_body_is_remote_error() {
        let err = extract_answer("<html>gateway</html>").unwrap_err();
        assert!(err.to_string().contains("Malformed response body"));
    }

    #[test]
    fn test_failed_run_surfaces_last_error() {
        let body = r#"{"statusEnum": "FAILED", "lastError": {"message": "knowledge base unavailable"}}"#;
        let err = extract_answer(body).unwrap_err();
        assert!(matches!(err, CallerError::RemoteApplication(_)));
        assert!(err.to_string().contains("knowledge base unavailable"));
    }

    #[test]
    fn test_failed_run_with_numeric_error_code() {
        let body = r#"{"statusEnum":"FAILED","lastError":{"code":500,"message":"quota exhausted"}}"#;
        let err = extract_answer(body).unwrap_err();
        assert!(matches!(err, CallerError::RemoteApplication(_)));
        assert!(err.to_string().contains("quota exhausted (500)"));
    }

    #[test]
    fn test_failed_run_with_string_last_error() {
        let err = extract_answer(r#"{"status": "Failed", "lastError": "assistant offline"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("assistant offline"));
    }

    #[test]
    fn test_failed_run_without_detail() {
        let err = extract_answer(r#"{"status": "expired"}"#).unwrap_err();
        assert!(err.to_string().contains("Unknown error"));
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"code": "InvalidAuthentication", "message": "token expired"}"#;
        let err = extract_answer(body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Remote application error: InvalidAuthentication: token expired"
        );
    }

    #[test]
    fn test_error_envelope_with_numeric_status() {
        let body = r#"{"code":"Forbidden","message":"no access","status":403}"#;
        let err = extract_answer(body).unwrap_err();
        assert!(matches!(err, CallerError::RemoteApplication(_)));
        assert!(err.to_string().contains("Forbidden: no access"));
    }

    #[test]
    fn test_error_envelope_with_numeric_code() {
        let err = extract_answer(r#"{"code": 40014, "message": "invalid assistant"}"#).unwrap_err();
        assert!(err.to_string().contains("40014: invalid assistant"));
    }

    #[test]
    fn test_missing_or_empty_text_is_remote_error() {
        assert!(extract_answer(r#"{"statusEnum": "COMPLETED"}"#).is_err());
        assert!(extract_answer(r#"{"text": ""}"#).is_err());
        assert!(extract_answer("[]").is_err());
        assert!(extract_answer("\"just a string\"").is_err());
    }
}
