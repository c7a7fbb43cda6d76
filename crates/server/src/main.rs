use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use shared::{error::ApiError, protocol::CommandReply};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{parse_command, parse_frame, ClientFrame, CommandHub};
use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let state = AppState {
        hub: CommandHub::new(settings.history_limit, settings.push_capacity),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, history_limit = settings.history_limit, "command server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/command", post(post_command))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn post_command(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CommandReply>, (StatusCode, Json<ApiError>)> {
    let command = parse_command(&body).map_err(|e| {
        debug!(error = %e, "command rejected");
        (StatusCode::BAD_REQUEST, Json(ApiError::from(e)))
    })?;
    debug!(addr = %command.addr, value = %command.value, "command accepted");
    state.hub.accept(command);
    Ok(Json(CommandReply::ok()))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: Arc<AppState>, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.hub.subscribe();
    let (replies_tx, mut replies_rx) = mpsc::unbounded_channel();

    let send_task = tokio::spawn(async move {
        loop {
            let update = tokio::select! {
                event = events_rx.recv() => match event {
                    Ok(update) => update,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "push subscriber lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                reply = replies_rx.recv() => match reply {
                    Some(update) => update,
                    None => break,
                },
            };
            let text = match serde_json::to_string(&update) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        match parse_frame(&text) {
            Ok(ClientFrame::Query(query)) => {
                for update in state.hub.answer(&query) {
                    let _ = replies_tx.send(update);
                }
            }
            Ok(ClientFrame::Command(command)) => {
                state.hub.accept(command);
            }
            Err(error) => debug!(%error, "ignoring websocket frame"),
        }
    }

    send_task.abort();
    debug!("push subscriber disconnected");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
