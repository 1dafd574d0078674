use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use tracing::error;

use crate::html_template::{asset_text, served_index_html};
use crate::map::MapPayload;
use crate::pipeline::load_payload;

use super::state::AppState;

pub async fn index_html() -> Result<Html<String>, StatusCode> {
    served_index_html().map(Html).map_err(|e| {
        error!("Failed to build index page: {:#}", e);
        StatusCode::NOT_FOUND
    })
}

pub async fn style_css() -> Result<Response, StatusCode> {
    embedded_asset("style.css", "text/css")
}

pub async fn map_js() -> Result<Response, StatusCode> {
    embedded_asset("map.js", "application/javascript")
}

fn embedded_asset(name: &str, content_type: &'static str) -> Result<Response, StatusCode> {
    let content = asset_text(name).map_err(|e| {
        error!("{:#}", e);
        StatusCode::NOT_FOUND
    })?;

    Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

/// One upstream fetch per call; failures come back as an `unavailable`
/// payload with status 200 so the page can still draw the base map.
pub async fn get_map(State(state): State<AppState>) -> Json<MapPayload> {
    Json(load_payload(&state.feed).await)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
