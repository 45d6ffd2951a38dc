use axum::{
    Json, Router,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use composer::{Language, Personality, Selection};
use futures::StreamExt;
use llm::{ChatClient, ChatMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tts::{Tts, Voice};

use crate::error::{ApiError, CHAT_KEY, SPEECH_KEY};
use crate::session::resolve_selection;

/// Clients shared by all handlers. Nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatClient>,
    pub speech: Arc<dyn Tts>,
}

#[derive(Serialize)]
struct VoiceEntry {
    id: Voice,
    description: &'static str,
}

#[derive(Serialize)]
struct Catalog {
    languages: Vec<Language>,
    personalities: Vec<Personality>,
    voices: Vec<VoiceEntry>,
}

#[derive(Deserialize, Default)]
pub struct PromptRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
}

#[derive(Serialize)]
struct PromptResponse {
    prompt: String,
    selection: Selection,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatHealth {
    message: &'static str,
    has_api_key: bool,
    timestamp: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

fn rejected(e: JsonRejection) -> ApiError {
    ApiError::bad_request(e.body_text())
}

/// Serve the embedded `index.html`.
pub async fn index() -> Html<&'static str> {
    static INDEX: &str = include_str!("../index.html");
    Html(INDEX)
}

async fn catalog() -> impl IntoResponse {
    Json(Catalog {
        languages: composer::languages(),
        personalities: composer::personalities(),
        voices: Voice::ALL
            .into_iter()
            .map(|id| VoiceEntry {
                id,
                description: id.description(),
            })
            .collect(),
    })
}

async fn prompt(
    body: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(rejected)?;
    let selection = resolve_selection(req.language.as_deref(), req.personality.as_deref())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(PromptResponse {
        prompt: selection.prompt(),
        selection,
    }))
}

async fn chat_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ChatHealth {
        message: "Chat API is working",
        has_api_key: state.chat.has_credential(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    if !state.chat.has_credential() {
        warn!("chat requested without a configured key");
        return Err(ApiError::missing_credential(CHAT_KEY));
    }
    let Json(req) = body.map_err(rejected)?;
    if req.messages.is_empty() {
        return Err(ApiError::bad_request("messages must not be empty"));
    }
    info!(messages = req.messages.len(), "chat requested");

    let stream = state.chat.stream_chat(&req.messages).await?;
    let body = stream.map(|chunk| {
        chunk.map_err(|e| {
            warn!(error = %e, "chat stream interrupted");
            std::io::Error::other(e.to_string())
        })
    });
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}

async fn speech(
    State(state): State<AppState>,
    body: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    if !state.speech.has_credential() {
        warn!("speech requested without a configured key");
        return Err(ApiError::missing_credential(SPEECH_KEY));
    }
    let Json(req) = body.map_err(rejected)?;
    let text = req.text.unwrap_or_default();
    let voice = Voice::parse_or_default(req.voice.as_deref());

    let audio = state.speech.synthesize(&text, voice).await?;
    Ok((
        [
            (header::CONTENT_TYPE, audio.content_type.to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio.bytes,
    )
        .into_response())
}

/// Build the application router with the provided state.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/catalog", get(catalog))
        .route("/prompt", post(prompt))
        .route("/chat", get(chat_health).post(chat))
        .route("/tts", post(speech))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .with_state(state)
}
