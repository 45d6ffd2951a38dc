use httpmock::Method::POST;
use httpmock::MockServer;
use llm::{
    ChatClient, ChatMessage, ErrorKind, LLMError, OpenAiClient, OpenAiConfig, UpstreamKind,
};
use tokio_stream::StreamExt;

fn sse(deltas: &[&str]) -> String {
    let mut body = String::from("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n");
    for d in deltas {
        let chunk = serde_json::json!({"choices": [{"delta": {"content": d}}]});
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn client(server: &MockServer, key: Option<&str>) -> OpenAiClient {
    let mut cfg = OpenAiConfig::default().with_base_url(server.base_url());
    cfg.api_key = key.map(String::from);
    OpenAiClient::new(cfg)
}

#[tokio::test]
async fn streams_deltas_in_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("\"stream\":true")
                .body_contains("gpt-4o-mini");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(sse(&["Roses ", "are ", "#ce422b"]));
        })
        .await;

    let client = client(&server, Some("sk-test"));
    let mut stream = client
        .stream_chat(&[ChatMessage::user("poem please")])
        .await
        .unwrap();
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.push(chunk.unwrap());
    }
    mock.assert_async().await;
    assert_eq!(out, vec!["Roses ", "are ", "#ce422b"]);
}

#[tokio::test]
async fn missing_key_never_reaches_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).body(sse(&["x"]));
        })
        .await;

    let client = client(&server, None);
    assert!(!client.has_credential());
    let err = match client.stream_chat(&[ChatMessage::user("hi")]).await {
        Err(e) => e,
        Ok(_) => panic!("expected missing credential"),
    };
    assert!(matches!(err, LLMError::MissingCredential(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn blank_key_counts_as_missing() {
    let server = MockServer::start_async().await;
    let client = client(&server, Some("   "));
    assert!(!client.has_credential());
}

#[tokio::test]
async fn upstream_status_is_classified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429)
                .body("{\"error\":{\"message\":\"Rate limit reached\"}}");
        })
        .await;

    let client = client(&server, Some("sk-test"));
    let err = match client.stream_chat(&[ChatMessage::user("hi")]).await {
        Err(e) => e,
        Ok(_) => panic!("expected upstream error"),
    };
    assert!(matches!(err, LLMError::Upstream { status: 429, .. }));
    assert_eq!(err.upstream_kind(), Some(UpstreamKind::RateLimit));
}

#[tokio::test]
async fn empty_history_is_rejected() {
    let server = MockServer::start_async().await;
    let client = client(&server, Some("sk-test"));
    let err = match client.stream_chat(&[]).await {
        Err(e) => e,
        Ok(_) => panic!("expected input error"),
    };
    assert_eq!(err.kind(), ErrorKind::ClientInput);
}

#[tokio::test]
async fn error_event_after_ok_status_is_surfaced() {
    let server = MockServer::start_async().await;
    let body = format!(
        "data: {}\n\ndata: {}\n\n",
        serde_json::json!({"choices": [{"delta": {"content": "Hi"}}]}),
        serde_json::json!({"error": {"message": "Rate limit reached for gpt-4o-mini", "type": "requests"}}),
    );
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(body.clone());
        })
        .await;

    let mut stream = client(&server, Some("sk-test"))
        .stream_chat(&[ChatMessage::user("poem please")])
        .await
        .unwrap();
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item);
    }
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "Hi");
    let err = items[1].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert_eq!(err.upstream_kind(), Some(UpstreamKind::RateLimit));
}
