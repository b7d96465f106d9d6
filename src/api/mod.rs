pub mod chat;

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the application router: the chat page and the WebSocket endpoint.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/ws", get(chat::websocket_handler))
        .with_state(state)
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
