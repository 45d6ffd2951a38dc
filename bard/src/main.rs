use bard::{AppState, Cli, app, init_logging};
use clap::Parser;
use llm::OpenAiClient;
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tts::{OpenAiTts, Tts};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let speech = OpenAiTts::new(cli.tts_config());
    if !speech.has_credential() {
        warn!("no OpenAI key configured; chat and speech will return 500");
    }
    let state = AppState {
        chat: Arc::new(OpenAiClient::new(cli.chat_config())),
        speech: Arc::new(speech),
    };
    let app = app(state);

    let addr: SocketAddr = cli.addr.parse()?;
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
