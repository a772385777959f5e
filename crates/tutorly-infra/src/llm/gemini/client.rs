//! GeminiProvider -- concrete [`ChatProvider`] for the Gemini
//! `generateContent` endpoint.
//!
//! The API key is passed per call as a [`SecretString`] and only exposed
//! while building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use tutorly_core::llm::provider::ChatProvider;
use tutorly_types::llm::{Completion, ConversationRequest, LlmError, Usage};

use super::types::{
    GeminiContent, GeminiErrorEnvelope, GeminiPart, GeminiRequest, GeminiResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// Google Gemini chat provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider for `model`.
    ///
    /// With `timeout` unset, requests wait as long as the provider takes.
    pub fn new(model: String, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| LlmError::Provider {
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// History turns in order, followed by the new user message.
pub fn build_request(request: &ConversationRequest) -> GeminiRequest {
    let mut contents: Vec<GeminiContent> = request
        .history
        .iter()
        .map(|turn| GeminiContent {
            role: turn.role.to_string(),
            parts: vec![GeminiPart {
                text: Some(turn.text.clone()),
            }],
        })
        .collect();

    contents.push(GeminiContent {
        role: "user".to_string(),
        parts: vec![GeminiPart {
            text: Some(request.message.clone()),
        }],
    });

    GeminiRequest { contents }
}

/// Turn a successful response body into a [`Completion`].
pub fn parse_response(resp: GeminiResponse) -> Result<Completion, LlmError> {
    let usage = resp
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }
        return Err(LlmError::Provider {
            message: "response contained no candidates".to_string(),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
            return Err(LlmError::Blocked(reason));
        }
    }

    Ok(Completion {
        text,
        model: resp.model_version,
        usage,
    })
}

/// Map a non-2xx status and body to an [`LlmError`]. The provider's message
/// is kept for every status.
pub fn map_status_error(
    status: reqwest::StatusCode,
    body: &str,
    retry_after_ms: Option<u64>,
) -> LlmError {
    let detail = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|env| {
            if env.error.status.is_empty() {
                env.error.message
            } else {
                format!("{}: {}", env.error.status, env.error.message)
            }
        })
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed(detail),
        429 => LlmError::RateLimited {
            retry_after_ms,
            message: detail,
        },
        400 => LlmError::InvalidRequest(detail),
        503 => LlmError::Overloaded(detail),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {detail}"),
        },
    }
}

/// `Retry-After` in delta-seconds form, as milliseconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Provider {
            message: format!("HTTP request failed: {e}"),
        }
    }
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn send_message(
        &self,
        api_key: &SecretString,
        request: &ConversationRequest,
    ) -> Result<Completion, LlmError> {
        let body = build_request(request);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("failed to read error body: {e}"),
            };
            return Err(map_status_error(status, &error_body, retry_after));
        }

        let gemini_resp: GeminiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        let completion = parse_response(gemini_resp)?;
        tracing::debug!(
            model = %self.model,
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "gemini completion"
        );
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use tutorly_types::chat::ChatMessage;

    fn response(value: serde_json::Value) -> GeminiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_url() {
        let provider = GeminiProvider::new(DEFAULT_MODEL.to_string(), None)
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(
            provider.url(),
            "http://localhost:9999/v1beta/models/gemini-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_build_request_appends_message() {
        let request = ConversationRequest {
            history: vec![ChatMessage::user("What is a trait?"), ChatMessage::model("An interface.")],
            message: "And a generic?".to_string(),
        };
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "What is a trait?"}]},
                    {"role": "model", "parts": [{"text": "An interface."}]},
                    {"role": "user", "parts": [{"text": "And a generic?"}]}
                ]
            })
        );
    }

    #[test]
    fn test_build_request_empty_history() {
        let request = ConversationRequest {
            history: vec![],
            message: "hi".to_string(),
        };
        assert_eq!(build_request(&request).contents.len(), 1);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let completion = parse_response(response(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "student."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4},
            "modelVersion": "gemini-flash-001"
        })))
        .unwrap();
        assert_eq!(completion.text, "Hello, student.");
        assert_eq!(completion.usage.input_tokens, 12);
        assert_eq!(completion.usage.output_tokens, 4);
        assert_eq!(completion.model.as_deref(), Some("gemini-flash-001"));
    }

    #[test]
    fn test_parse_response_prompt_blocked() {
        let err = parse_response(response(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .unwrap_err();
        assert!(matches!(err, LlmError::Blocked(ref r) if r == "SAFETY"));
    }

    #[test]
    fn test_parse_response_candidate_blocked() {
        let err = parse_response(response(json!({
            "candidates": [{"finishReason": "RECITATION"}]
        })))
        .unwrap_err();
        assert!(matches!(err, LlmError::Blocked(ref r) if r == "RECITATION"));
    }

    #[test]
    fn test_parse_response_empty() {
        let err = parse_response(response(json!({}))).unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }

    #[test]
    fn test_map_status_error() {
        let body = r#"{"error":{"code":403,"message":"Method doesn't allow unregistered callers.","status":"PERMISSION_DENIED"}}"#;
        match map_status_error(StatusCode::FORBIDDEN, body, None) {
            LlmError::AuthenticationFailed(detail) => assert_eq!(
                detail,
                "PERMISSION_DENIED: Method doesn't allow unregistered callers."
            ),
            other => panic!("unexpected: {other:?}"),
        }

        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        match map_status_error(StatusCode::BAD_REQUEST, body, None) {
            LlmError::InvalidRequest(detail) => {
                assert_eq!(detail, "INVALID_ARGUMENT: API key not valid.")
            }
            other => panic!("unexpected: {other:?}"),
        }

        match map_status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom", None) {
            LlmError::Provider { message } => {
                assert_eq!(message, "HTTP 500 Internal Server Error: boom")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_quota_exhausted_keeps_provider_message() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_status_error(StatusCode::TOO_MANY_REQUESTS, body, Some(30_000));
        match &err {
            LlmError::RateLimited {
                retry_after_ms,
                message,
            } => {
                assert_eq!(*retry_after_ms, Some(30_000));
                assert_eq!(
                    message,
                    "RESOURCE_EXHAUSTED: Resource has been exhausted (e.g. check quota)."
                );
            }
            other => panic!("unexpected: {other:?}"),
        }
        let shown = err.to_string();
        assert!(shown.contains("Resource has been exhausted (e.g. check quota)."));
        assert!(!shown.contains("Some("));
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);
        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(30_000));
        headers.insert(
            reqwest::header::RETRY_AFTER,
            "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap(),
        );
        assert_eq!(retry_after_ms(&headers), None);
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(raw: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(raw.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            // Drain until the client hangs up so the close is clean.
            while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
        });
        format!("http://{addr}")
    }

    fn hi() -> ConversationRequest {
        ConversationRequest {
            history: vec![],
            message: "hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rate_limited_response_end_to_end() {
        let base = serve_once(concat!(
            "HTTP/1.1 429 Too Many Requests\r\n",
            "content-type: application/json\r\n",
            "retry-after: 7\r\n",
            "content-length: 93\r\n",
            "connection: close\r\n\r\n",
            r#"{"error":{"code":429,"message":"Resource has been exhausted.","status":"RESOURCE_EXHAUSTED"}}"#,
        ))
        .await;
        let provider = GeminiProvider::new(DEFAULT_MODEL.to_string(), Some(Duration::from_secs(5)))
            .unwrap()
            .with_base_url(base);
        let err = provider
            .send_message(&SecretString::from("test-key".to_string()), &hi())
            .await
            .unwrap_err();
        match err {
            LlmError::RateLimited {
                retry_after_ms,
                message,
            } => {
                assert_eq!(retry_after_ms, Some(7_000));
                assert!(message.contains("Resource has been exhausted."));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_truncated_error_body_is_reported() {
        // Declares more body bytes than it sends, then closes.
        let base = serve_once(concat!(
            "HTTP/1.1 500 Internal Server Error\r\n",
            "content-length: 100\r\n\r\n",
            "partial"
        ))
        .await;
        let provider = GeminiProvider::new(DEFAULT_MODEL.to_string(), Some(Duration::from_secs(5)))
            .unwrap()
            .with_base_url(base);
        let err = provider
            .send_message(&SecretString::from("test-key".to_string()), &hi())
            .await
            .unwrap_err();
        match err {
            LlmError::Provider { message } => {
                assert!(message.starts_with("HTTP 500 Internal Server Error: failed to read error body"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_provider_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let provider = GeminiProvider::new(DEFAULT_MODEL.to_string(), Some(Duration::from_secs(5)))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = provider
            .send_message(
                &SecretString::from("test-key".to_string()),
                &ConversationRequest {
                    history: vec![],
                    message: "hi".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. } | LlmError::Timeout));
    }
}
