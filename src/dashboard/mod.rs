//! The live dashboard: an HTML page, a JSON snapshot endpoint, and an SSE
//! stream, all reading the same `LiveStateReader` the scan loop publishes
//! to once per tick.

pub mod state;

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};

pub use state::{live_state_channel, LiveState, LiveStateReader};

/// How often `/stream` pushes a fresh snapshot to connected clients,
/// independent of the scan tick cadence.
const SSE_PUSH_INTERVAL: Duration = Duration::from_secs(2);

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Clone)]
struct DashboardState {
    reader: LiveStateReader,
}

#[must_use]
pub fn router(reader: LiveStateReader) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/state", get(api_state))
        .route("/stream", get(stream))
        .with_state(DashboardState { reader })
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn api_state(State(state): State<DashboardState>) -> impl IntoResponse {
    Json((*state.reader.snapshot()).clone())
}

async fn stream(
    State(state): State<DashboardState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let ticks = IntervalStream::new(tokio::time::interval(SSE_PUSH_INTERVAL));
    let body = ticks.map(move |_| {
        let snapshot = state.reader.snapshot();
        let event = Event::default().json_data(&*snapshot).unwrap_or_else(|_| {
            Event::default().data("{\"error\":\"serialization failed\"}")
        });
        Ok(event)
    });
    Sse::new(body).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn api_state_returns_current_snapshot() {
        let (_tx, reader) = live_state_channel(LiveState::empty(Utc::now()));
        let state = DashboardState { reader };
        let response = api_state(State(state)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn index_serves_html() {
        let html = index().await;
        assert!(html.0.contains("<html"));
    }
}
