use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::server::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn with_status(status: StatusCode, message: &str) -> Response {
        (status, Json(Self { message: message.to_string() })).into_response()
    }
}

/// Landing page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Every cached repository, most stars first
pub async fn list_repos(State(state): State<Arc<AppState>>) -> Response {
    tracing::debug!("Processing GET /repos request");

    let listed = {
        let store = state.store.lock().await;
        store.list_by_popularity()
    };

    match listed {
        Ok(records) if records.is_empty() => {
            MessageResponse::with_status(StatusCode::NOT_FOUND, "No repositories found")
        }
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::error!("Failed to list repositories: {}", e);
            MessageResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred")
        }
    }
}
