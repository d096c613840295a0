//! HTTP handlers for the planning endpoints
//!
//! Both endpoints run a full planning turn synchronously while holding the
//! session's lock, then return a plain JSON payload. Loop-level outcomes,
//! including "nothing was generated", surface as markers in a 200 response;
//! only malformed request bodies produce a non-success status.

use std::sync::Arc;
use std::sync::OnceLock;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use serde_json::json;

use crate::agent::{ConversationState, PlannerGraph, SessionStore};
use crate::api::schemas::{ChatRequest, TravelRequest};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub graph: Arc<PlannerGraph>,
}

fn error_response(status: StatusCode, message: &str, session_id: &str) -> Response {
    (
        status,
        Json(json!({ "error": message, "session_id": session_id })),
    )
        .into_response()
}

/// POST /api/v1/generate_plan/{session_id}
///
/// Starts (or replaces) a plan-generation turn: the session state is reset,
/// the trip parameters become the opening user message, and the loop runs
/// to completion.
pub async fn generate_plan(
    State(app): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<TravelRequest>,
) -> Response {
    let days = match request.validate() {
        Ok(days) => days,
        Err(message) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, &message, &session_id)
        }
    };

    let interests = if request.interests.is_empty() {
        "none".to_string()
    } else {
        request.interests.join(", ")
    };
    let requirements = if request.avoid_crowds {
        "avoid crowded places"
    } else {
        "none"
    };
    // The summarizer's plan heuristic keys off "generate" + "travel plan"
    // in this opening message.
    let prompt = format!(
        "Generate a {}-day travel plan:\n\
         - Departure: {}\n\
         - Destination: {}\n\
         - Travel dates: {} to {}\n\
         - Interests: {}\n\
         - Special requirements: {}\n",
        days,
        request.departure.trim(),
        request.destination.trim(),
        request.start_date,
        request.end_date,
        interests,
        requirements,
    );

    let session = app.sessions.get_or_create(&session_id).await;
    let mut state = session.lock().await;

    // A plan turn starts from a clean slate with a fresh iteration budget.
    *state = ConversationState::new();
    state.push_user(&prompt);
    state.max_iterations = 0;

    tracing::info!(%session_id, days, "starting plan generation");
    app.graph.invoke(&mut state).await;

    let Some(last) = state.last_content() else {
        return error_response(StatusCode::OK, "No content was generated", &session_id);
    };
    let cleaned = clean_agent_output(last);

    Json(json!({ "plan": cleaned, "session_id": session_id })).into_response()
}

/// POST /api/v1/chat/{session_id}
///
/// Continues a conversation on top of the stored session state. The current
/// plan, when present, is prefixed to the user message as free-text context.
pub async fn chat(
    State(app): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let session = app.sessions.get_or_create(&session_id).await;
    let mut state = session.lock().await;

    let full_message = match state.current_plan.as_deref() {
        Some(plan) if !plan.is_empty() => format!(
            "Current travel plan: {}\nUser question: {}",
            plan, request.message
        ),
        _ => format!("User question: {}", request.message),
    };

    state.push_user(&full_message);
    state.max_iterations += 1;

    tracing::info!(%session_id, iterations = state.max_iterations, "starting chat turn");
    app.graph.invoke(&mut state).await;

    let Some(last) = state.last_content() else {
        return error_response(StatusCode::OK, "No content was generated", &session_id);
    };
    let cleaned = clean_agent_output(last);

    Json(json!({ "response": cleaned, "session_id": session_id })).into_response()
}

/// Strip tool-call artifacts that some models leak into their final text
pub fn clean_agent_output(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    static ARTIFACTS: OnceLock<Vec<Regex>> = OnceLock::new();
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();

    let artifacts = ARTIFACTS.get_or_init(|| {
        vec![
            // ReAct-style Action/Action Input/Observation blocks
            Regex::new(
                r"(?s)Action\s*:\s*`?\w+`?\s*Action Input\s*:\s*`?\{.*?`?\}?\s*Observation\s*:\s*.*?(\n\n|\z)",
            )
            .expect("invalid artifact regex"),
            // XML-style tool code blocks
            Regex::new(r"(?s)<tool_code>.*?</tool_code>").expect("invalid artifact regex"),
            // Stray markdown tool code markers
            Regex::new(r"(?s)tool_code`.*?`").expect("invalid artifact regex"),
        ]
    });
    let blank_lines =
        BLANK_LINES.get_or_init(|| Regex::new(r"\n\s*\n").expect("invalid blank-line regex"));

    let mut cleaned = text.to_string();
    for re in artifacts {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    blank_lines.replace_all(&cleaned, "\n\n").trim().to_string()
}
