use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use serde_json::json;
use std::convert::Infallible;

use crate::{
    chat::{prompt::GREETING, ChatReply, ChatRequest, ChatStreamEvent},
    error::AppError,
    handlers::AppState,
};

/// Handle GET /api/chat/greeting
pub async fn greeting() -> Json<ChatReply> {
    Json(ChatReply {
        reply: GREETING.to_string(),
        fallback: false,
    })
}

/// Handle POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = payload?;
    let reply = state.chat_relay().reply(&request).await?;
    Ok(Json(reply))
}

/// Handle POST /api/chat/stream
///
/// Emits `delta` events carrying `{"text": ...}`, then exactly one `done`
/// or `fallback` event.
pub async fn handle_chat_stream(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let Json(request) = payload?;
    let events = state.chat_relay().reply_stream(&request).await?;

    let stream = events.map(|event| Ok::<_, Infallible>(to_sse_event(&event)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &ChatStreamEvent) -> Event {
    let data = match event {
        ChatStreamEvent::Delta(text) | ChatStreamEvent::Fallback(text) => json!({ "text": text }),
        ChatStreamEvent::Done => json!({}),
    };
    Event::default().event(event.name()).data(data.to_string())
}
