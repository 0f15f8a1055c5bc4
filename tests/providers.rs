//! The real provider clients against a local HTTP listener.
//!
//! Each test serves exactly one canned answer on `127.0.0.1`, points a client
//! at it with `with_base_url`, and checks both the request that went over the
//! wire and how the answer was turned into a value or an error.

use offer_filler::provider::ClientSettings;
use offer_filler::{ClaudeClient, GeminiClient, OfferError, OpenAiClient, ProviderClient};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ── One-shot server ──────────────────────────────────────────────────────────

/// A request as received by the listener, head lowercased.
struct Captured {
    head: String,
    body: Value,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}:");
        self.head
            .lines()
            .find_map(|l| l.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }
}

/// Serve one `status` answer with `body`; returns the base address and the
/// captured request.
async fn serve_once(status: u16, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head, body_start, len) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending a full request");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                break (head, end + 4, len);
            }
        };
        while buf.len() < body_start + len {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let answer = format!(
            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(answer.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured {
            head,
            body: serde_json::from_slice(&buf[body_start..body_start + len]).unwrap_or(Value::Null),
        }
    });

    (format!("http://{addr}"), handle)
}

fn settings(model: &str) -> ClientSettings {
    ClientSettings {
        api_key: "sk-local-test".into(),
        model: model.into(),
        temperature: 0.1,
        max_tokens: 4096,
    }
}

fn offer_fragment() -> Value {
    json!({ "formInfo": { "investor": "Energa Solar Sp. z o.o.", "version": 3 } })
}

// ── Success paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn openai_posts_json_mode_chat_request() {
    let envelope = json!({
        "choices": [{ "message": { "role": "assistant", "content": offer_fragment().to_string() } }]
    });
    let (base, server) = serve_once(200, envelope.to_string()).await;
    let client = OpenAiClient::new(settings("gpt-4-turbo")).with_base_url(format!("{base}/v1/"));

    let value = client.structured_offer("Fill the offer.").await.unwrap();
    assert_eq!(value, offer_fragment());

    let req = server.await.unwrap();
    assert!(req.request_line().starts_with("post /v1/chat/completions "), "got: {}", req.head);
    assert_eq!(req.header("authorization"), Some("bearer sk-local-test"));
    assert_eq!(req.body["model"], "gpt-4-turbo");
    assert_eq!(req.body["response_format"]["type"], "json_object");
    assert_eq!(req.body["messages"][0]["content"], "Fill the offer.");
}

#[tokio::test]
async fn claude_posts_messages_request_with_version_header() {
    let envelope = json!({
        "content": [
            { "type": "text", "text": "{\"formInfo\": " },
            { "type": "text", "text": "{\"investor\": \"Energa Solar Sp. z o.o.\", \"version\": 3}}" }
        ]
    });
    let (base, server) = serve_once(200, envelope.to_string()).await;
    let client = ClaudeClient::new(settings("claude-3-opus-20240229")).with_base_url(format!("{base}/v1"));

    let value = client.structured_offer("Fill the offer.").await.unwrap();
    assert_eq!(value, offer_fragment());

    let req = server.await.unwrap();
    assert!(req.request_line().starts_with("post /v1/messages "), "got: {}", req.head);
    assert_eq!(req.header("x-api-key"), Some("sk-local-test"));
    assert_eq!(req.header("anthropic-version"), Some("2023-06-01"));
    assert_eq!(req.body["max_tokens"], 4096);
}

#[tokio::test]
async fn gemini_strips_fence_from_generated_text() {
    let fenced = format!("```json\n{}\n```", offer_fragment());
    let envelope = json!({
        "candidates": [{ "content": { "parts": [{ "text": fenced }] } }]
    });
    let (base, server) = serve_once(200, envelope.to_string()).await;
    let client = GeminiClient::new(settings("gemini-pro")).with_base_url(format!("{base}/v1beta"));

    let value = client.structured_offer("Fill the offer.").await.unwrap();
    assert_eq!(value, offer_fragment());

    let req = server.await.unwrap();
    assert!(
        req.request_line().starts_with("post /v1beta/models/gemini-pro:generatecontent "),
        "got: {}",
        req.head
    );
    assert_eq!(req.header("x-goog-api-key"), Some("sk-local-test"));
    assert_eq!(req.body["generationConfig"]["candidateCount"], 1);
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_answer_is_auth_error() {
    let body = json!({ "error": { "message": "Incorrect API key provided" } });
    let (base, server) = serve_once(401, body.to_string()).await;
    let client = OpenAiClient::new(settings("gpt-4-turbo")).with_base_url(format!("{base}/v1"));

    let err = client.structured_offer("x").await.unwrap_err();
    server.await.unwrap();
    match err {
        OfferError::Auth { provider, detail } => {
            assert_eq!(provider, "openai");
            assert_eq!(detail, "Incorrect API key provided");
        }
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn too_many_requests_is_rate_limit_error() {
    let (base, server) = serve_once(429, "{}".into()).await;
    let client = ClaudeClient::new(settings("claude-3-opus-20240229")).with_base_url(format!("{base}/v1"));

    let err = client.structured_offer("x").await.unwrap_err();
    server.await.unwrap();
    assert!(matches!(err, OfferError::RateLimited { ref provider } if provider == "claude"), "got {err:?}");
}

#[tokio::test]
async fn server_error_carries_status() {
    let (base, server) = serve_once(503, "upstream overloaded".into()).await;
    let client = GeminiClient::new(settings("gemini-pro")).with_base_url(format!("{base}/v1beta"));

    let err = client.structured_offer("x").await.unwrap_err();
    server.await.unwrap();
    let msg = err.to_string();
    assert!(matches!(err, OfferError::Provider { .. }), "got {err:?}");
    assert!(msg.contains("HTTP 503") && msg.contains("upstream overloaded"), "got: {msg}");
}

#[tokio::test]
async fn prose_answer_is_parse_error_not_transport_error() {
    let envelope = json!({
        "choices": [{ "message": { "content": "Sorry, I cannot fill this form." } }]
    });
    let (base, server) = serve_once(200, envelope.to_string()).await;
    let client = OpenAiClient::new(settings("gpt-4-turbo")).with_base_url(format!("{base}/v1"));

    let err = client.structured_offer("x").await.unwrap_err();
    server.await.unwrap();
    assert!(matches!(err, OfferError::ResponseParse { ref provider, .. } if provider == "openai"), "got {err:?}");
}

#[tokio::test]
async fn unreachable_endpoint_is_provider_error() {
    // Bind then drop, so the port is very likely closed.
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
    let client = OpenAiClient::new(settings("gpt-4-turbo")).with_base_url(format!("http://{addr}/v1"));

    let err = client.structured_offer("x").await.unwrap_err();
    assert!(matches!(err, OfferError::Provider { .. }), "got {err:?}");
    assert!(err.to_string().contains("request failed"), "got: {err}");
}
