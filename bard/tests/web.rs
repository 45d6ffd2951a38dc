use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use bard::{AppState, app};
use llm::{ChatClient, ChatMessage, ChatStream, LLMError};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tts::{SpeechAudio, TTSError, Tts, Voice};

struct MockChat {
    key: bool,
    chunks: Vec<&'static str>,
    calls: Mutex<usize>,
}

impl MockChat {
    fn new(key: bool, chunks: Vec<&'static str>) -> Self {
        Self {
            key,
            chunks,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ChatClient for MockChat {
    fn has_credential(&self) -> bool {
        self.key
    }

    async fn stream_chat(&self, _: &[ChatMessage]) -> Result<ChatStream, LLMError> {
        *self.calls.lock().unwrap() += 1;
        if !self.key {
            return Err(LLMError::MissingCredential("OPENAI_API_KEY"));
        }
        let items: Vec<Result<String, LLMError>> =
            self.chunks.iter().map(|c| Ok(c.to_string())).collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

enum SpeechMode {
    Ok,
    NoKey,
    RateLimited,
}

struct MockTts {
    mode: SpeechMode,
    voices: Mutex<Vec<Voice>>,
}

impl MockTts {
    fn new(mode: SpeechMode) -> Self {
        Self {
            mode,
            voices: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Tts for MockTts {
    fn has_credential(&self) -> bool {
        !matches!(self.mode, SpeechMode::NoKey)
    }

    async fn synthesize(&self, text: &str, voice: Voice) -> tts::Result<SpeechAudio> {
        if !self.has_credential() {
            return Err(TTSError::MissingCredential("OPENAI_API_KEY"));
        }
        if text.trim().is_empty() {
            return Err(TTSError::MissingText);
        }
        self.voices.lock().unwrap().push(voice);
        match self.mode {
            SpeechMode::RateLimited => Err(TTSError::Upstream {
                status: 429,
                body: "Rate limit reached".into(),
            }),
            _ => Ok(SpeechAudio::mpeg(b"ID3-not-really-mp3".to_vec())),
        }
    }
}

fn state(chat: MockChat, speech: MockTts) -> (AppState, Arc<MockChat>, Arc<MockTts>) {
    let chat = Arc::new(chat);
    let speech = Arc::new(speech);
    let state = AppState {
        chat: chat.clone(),
        speech: speech.clone(),
    };
    (state, chat, speech)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_serves_page() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state).oneshot(get("/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("<title>Bard</title>"));
    for control in ["id=\"play\"", "id=\"stop\"", "id=\"restart\"", "id=\"voice\""] {
        assert!(page.contains(control), "missing {control}");
    }
}

#[tokio::test]
async fn chat_streams_concatenated_text() {
    let (state, chat, _) = state(
        MockChat::new(true, vec!["Ferris ", "dreams ", "in rust"]),
        MockTts::new(SpeechMode::Ok),
    );
    let res = app(state)
        .oneshot(post_json(
            "/api/chat",
            r#"{"messages":[{"role":"user","content":"poem please"}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Ferris dreams in rust");
    assert_eq!(*chat.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn chat_without_key_fails_before_upstream() {
    let (state, chat, _) = state(MockChat::new(false, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json(
            "/api/chat",
            r#"{"messages":[{"role":"user","content":"hi"}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(res.into_body()).await;
    assert_eq!(body["error"], "OpenAI API key not configured");
    assert_eq!(body["details"], "OPENAI_API_KEY is not set");
    assert!(body["timestamp"].is_string());
    assert_eq!(*chat.calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn chat_rejects_empty_history() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json("/api/chat", r#"{"messages":[]}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_health_reports_key() {
    let (state, _, _) = state(MockChat::new(false, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state).oneshot(get("/api/chat")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res.into_body()).await;
    assert_eq!(body["hasApiKey"], false);
    assert_eq!(body["message"], "Chat API is working");
}

#[tokio::test]
async fn speech_returns_mpeg_with_length() {
    let (state, _, speech) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json("/api/tts", r#"{"text":"Hello","voice":"nova"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(res.headers()[header::CONTENT_LENGTH], "18");
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.len(), 18);
    assert_eq!(*speech.voices.lock().unwrap(), vec![Voice::Nova]);
}

#[tokio::test]
async fn unknown_voice_uses_default() {
    let (state, _, speech) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json(
            "/api/tts",
            r#"{"text":"Hello","voice":"not-a-real-voice"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(*speech.voices.lock().unwrap(), vec![Voice::Alloy]);
}

#[tokio::test]
async fn speech_without_text_is_bad_request() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json("/api/tts", r#"{"text":""}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json(res.into_body()).await;
    assert_eq!(body["error"], "Text is required");
}

#[tokio::test]
async fn speech_without_key_is_server_error() {
    let (state, _, speech) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::NoKey));
    let res = app(state)
        .oneshot(post_json("/api/tts", r#"{"text":"Hello"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(res.into_body()).await;
    assert_eq!(body["error"], "OpenAI API key not configured");
    assert!(body["details"].as_str().unwrap().contains("OPENAI_API_KEY"));
    assert!(speech.voices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn speech_upstream_failure_has_category() {
    let (state, _, _) = state(
        MockChat::new(true, vec![]),
        MockTts::new(SpeechMode::RateLimited),
    );
    let res = app(state)
        .oneshot(post_json("/api/tts", r#"{"text":"Hello"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(res.into_body()).await;
    assert_eq!(body["error"], "Text-to-speech generation failed");
    assert_eq!(body["category"], "rate_limit");
    assert_eq!(
        body["message"],
        llm::UpstreamKind::RateLimit.user_message()
    );
    assert!(body["details"].as_str().unwrap().contains("429"));
}

#[tokio::test]
async fn catalog_lists_everything() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state).oneshot(get("/api/catalog")).await.unwrap();
    let body = json(res.into_body()).await;
    assert_eq!(body["languages"].as_array().unwrap().len(), 6);
    assert_eq!(body["personalities"].as_array().unwrap().len(), 6);
    assert_eq!(body["voices"][0]["id"], "alloy");
}

#[tokio::test]
async fn prompt_uses_selection() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json(
            "/api/prompt",
            r#"{"language":"rust","personality":"Wise Mentor"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res.into_body()).await;
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("Rust"));
    assert!(prompt.contains("memory safety"));
}

#[tokio::test]
async fn prompt_rejects_unknown_language() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let res = app(state)
        .oneshot(post_json("/api/prompt", r#"{"language":"COBOL"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json(res.into_body()).await;
    assert_eq!(body["error"], "Unknown language: COBOL");
}

#[tokio::test]
async fn api_allows_cross_origin() {
    let (state, _, _) = state(MockChat::new(true, vec![]), MockTts::new(SpeechMode::Ok));
    let req = Request::builder()
        .uri("/api/catalog")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let res = app(state).oneshot(req).await.unwrap();
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
