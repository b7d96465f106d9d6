use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;

use crate::state::{AppState, PipelineStatus};

/// Reply when the pipeline never came up (degraded mode).
pub const UNAVAILABLE_REPLY: &str = "Chatbot indisponível no momento.";

/// Prefix of the reply sent when answering a question fails.
pub const ERROR_PREFIX: &str = "Erro ao gerar resposta: ";

/// GET /ws — upgrade to the chat WebSocket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Per-connection loop: read one text message, send exactly one reply.
///
/// Messages are handled to completion in arrival order; there is no
/// concurrency within a connection. Failures while answering become a
/// normal text reply and the connection stays open. The loop ends when
/// the transport closes or a send fails.
async fn handle_websocket(mut socket: WebSocket, state: AppState) {
    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(question)) => {
                let reply = answer_question(&state, &question).await;
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!("WebSocket closed: {e}");
                break;
            }
            _ => {}
        }
    }
}

async fn answer_question(state: &AppState, question: &str) -> String {
    match &state.pipeline {
        PipelineStatus::Ready(pipeline) => match pipeline.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Failed to answer question: {e:#}");
                format!("{ERROR_PREFIX}{e:#}")
            }
        },
        PipelineStatus::Unavailable { .. } => UNAVAILABLE_REPLY.to_string(),
    }
}
