//! HTTP front end: request validation and the server-sent event stream.

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::{OutputFormat, ResearchRequest};
use crate::progress::{ChannelEvent, ProgressChannel};
use crate::tasks::ResearchService;

pub const DOWNLOAD_BASENAME: &str = "research-results";

#[derive(Clone)]
struct AppState {
    service: Arc<ResearchService>,
}

pub fn router(service: ResearchService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/research", post(research))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct ErrorBody {
    error: bool,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct CompletePayload<'a> {
    result: &'a str,
    format: OutputFormat,
    filename: String,
    mime_type: &'static str,
}

#[derive(Serialize)]
struct ErrorPayload {
    message: String,
}

#[instrument(skip(state, req), fields(request_id = %Uuid::new_v4()))]
async fn research(State(state): State<AppState>, Json(req): Json<ResearchRequest>) -> Response {
    let request = match req.validate(state.service.settings()) {
        Ok(request) => request,
        Err(e) => {
            info!("rejected research request: {e}");
            let body = ErrorBody {
                error: true,
                code: e.code(),
                message: e.to_string(),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }
    };

    info!(num_sources = request.num_sources, format = %request.output_format, "research stream opened");
    let format = request.output_format;
    let service = state.service.clone();
    let channel = ProgressChannel::spawn(
        service.settings().progress_poll_interval(),
        move |progress| async move { service.research(&request, &progress).await },
    );

    let events = stream::unfold(channel, move |mut channel| async move {
        let item = channel.next().await?;
        Some((sse_event(item, format), channel))
    });

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

fn sse_event(item: ChannelEvent, format: OutputFormat) -> Result<Event, axum::Error> {
    match item {
        ChannelEvent::Progress(event) => Event::default().event("progress").json_data(&event),
        ChannelEvent::Complete(result) => Event::default().event("complete").json_data(CompletePayload {
            result: &result.content,
            format,
            filename: format.download_filename(DOWNLOAD_BASENAME),
            mime_type: format.mime_type(),
        }),
        ChannelEvent::Failed(error) => {
            warn!(code = error.code(), "research failed");
            Event::default().event("error").json_data(ErrorPayload {
                message: error.to_string(),
            })
        }
    }
}
