use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{sse::{Event, KeepAlive, Sse}, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::{
    error::ToolError,
    generation::{drive_stream, Generation, GenerativeService},
    models::{CreateSessionRequest, SizeOptions, Tool, ToolId, ToolInput},
    sessions::{SessionStore, ToolSession},
    sizes::{SizeRange, SizeSelection, FABRIC_OPTIONS, LENGTH_OPTIONS, NECK_STYLES, SIZE_OPTIONS},
    tools::{run_structured, Plan},
};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub service: Arc<dyn GenerativeService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tools", get(list_tools))
        .route("/api/sizes", get(size_options))
        .route("/api/sizes/resolve", post(resolve_sizes))
        .route("/api/generate", post(generate))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(close_session))
        .route("/api/sessions/:id/run", post(run_session))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn list_tools() -> Json<Vec<Tool>> {
    Json(ToolId::catalog())
}

pub async fn size_options() -> Json<SizeOptions> {
    Json(SizeOptions {
        sizes: SIZE_OPTIONS.to_vec(),
        fabrics: FABRIC_OPTIONS.to_vec(),
        lengths: LENGTH_OPTIONS.to_vec(),
        neck_styles: NECK_STYLES.to_vec(),
    })
}

pub async fn resolve_sizes(Json(body): Json<SizeSelection>) -> Json<SizeRange> {
    let range = SizeRange::resolve(&body.start, &body.end);
    tracing::info!("📏 Resolved {:?} -> {:?}: {} size(s)", body.start, body.end, range.sizes.len());
    Json(range)
}

/// Stateless run: JSON for structured tools, an event stream for streaming ones.
pub async fn generate(State(state): State<AppState>, Json(input): Json<ToolInput>) -> Result<Response, ToolError> {
    let tool = input.tool_id();
    let plan = input.plan()?;
    tracing::info!("🚀 Running {:?} ({} call)", tool, plan.generation.kind());
    if let Generation::Streaming { prompt, system } = &plan.generation {
        return stream_reply(&state, None, prompt, system).await;
    }
    let outcome = run_structured(state.service.as_ref(), &plan).await?;
    Ok(Json(json!({ "tool": tool, "result": outcome.result, "warnings": outcome.warnings })).into_response())
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> (StatusCode, Json<ToolSession>) {
    let session = state.sessions.create(body.tool);
    tracing::info!("🎯 Opened {:?} session {}", session.tool, session.id);
    (StatusCode::CREATED, Json(session))
}

pub async fn get_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<ToolSession>, ToolError> {
    state.sessions.get(id).map(Json).ok_or(ToolError::NotFound(id))
}

pub async fn close_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> StatusCode {
    if state.sessions.remove(id) { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND }
}

#[axum::debug_handler]
pub async fn run_session(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(input): Json<ToolInput>,
) -> Result<Response, ToolError> {
    let plan = input.plan()?;
    state.sessions.begin(id, input.tool_id(), plan.generation.is_streaming())?;
    tracing::info!("🚀 Running {:?} in session {}", input.tool_id(), id);

    // Detached so the session leaves `loading` even if the client goes away mid-call.
    let task_state = state.clone();
    let run = tokio::spawn(async move { run_in_session(&task_state, id, &plan).await });
    match run.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("❌ Session {} run aborted: {}", id, e);
            let err = ToolError::Internal(e.to_string());
            state.sessions.fail(id, &err);
            Err(err)
        }
    }
}

async fn run_in_session(state: &AppState, id: Uuid, plan: &Plan) -> Result<Response, ToolError> {
    if let Generation::Streaming { prompt, system } = &plan.generation {
        return stream_reply(state, Some(id), prompt, system).await;
    }
    match run_structured(state.service.as_ref(), plan).await {
        Ok(outcome) => state
            .sessions
            .complete(id, outcome)
            .map(|s| Json(s).into_response())
            .ok_or(ToolError::NotFound(id)),
        Err(e) => {
            state.sessions.fail(id, &e);
            Err(e)
        }
    }
}

/// Opens the upstream stream, then forwards fragments as server-sent events
/// from a background task that runs to completion even if the client leaves.
async fn stream_reply(
    state: &AppState,
    session: Option<Uuid>,
    prompt: &str,
    system: &str,
) -> Result<Response, ToolError> {
    let upstream = match state.service.stream_text(prompt, system).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("❌ Stream could not start: {}", e);
            let err = ToolError::from(e);
            if let Some(id) = session {
                state.sessions.fail(id, &err);
            }
            return Err(err);
        }
    };

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let result = drive_stream(upstream, |fragment, text| {
            if let Some(id) = session {
                sessions.append_text(id, fragment);
            }
            let data = json!({ "delta": fragment, "text": text });
            let _ = tx.send(Event::default().event("chunk").data(data.to_string()));
        })
        .await;

        match result {
            Ok(text) => {
                tracing::info!("✅ Stream finished ({} chars)", text.len());
                let data = json!({ "text": text });
                if let Some(id) = session {
                    sessions.finish_text(id, text);
                }
                let _ = tx.send(Event::default().event("done").data(data.to_string()));
            }
            Err(e) => {
                tracing::error!("❌ Stream failed: {}", e);
                let err = ToolError::from(e);
                if let Some(id) = session {
                    sessions.fail(id, &err);
                }
                let data = json!({ "kind": err.kind(), "message": err.to_string() });
                let _ = tx.send(Event::default().event("error").data(data.to_string()));
            }
        }
    });

    let events = UnboundedReceiverStream::new(rx).map(Ok::<Event, Infallible>);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()).into_response())
}
