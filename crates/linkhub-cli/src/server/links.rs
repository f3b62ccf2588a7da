//! Link list endpoints
//!
//! - `GET /links`
//! - `POST /links`
//! - `PUT /links/{index}`
//! - `DELETE /links/{index}`
//! - `POST /links/{index}/move` with `{"direction": "up" | "down"}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use linkhub_core::Document;
use serde::Deserialize;
use serde_json::json;

use super::{
    error::{ApiJson, Result},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    #[serde(default)]
    pub direction: Option<String>,
}

pub async fn list_links(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.links.list()?))
}

pub async fn add_link(
    State(state): State<AppState>,
    ApiJson(link): ApiJson<Document>,
) -> Result<impl IntoResponse> {
    let (_, link) = state.links.append(link)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "link": link})),
    ))
}

pub async fn update_link(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    ApiJson(link): ApiJson<Document>,
) -> Result<impl IntoResponse> {
    let link = state.links.replace_at(index, link)?;
    Ok(Json(json!({"status": "updated", "link": link})))
}

pub async fn delete_link(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<impl IntoResponse> {
    let removed = state.links.delete_at(index)?;
    Ok(Json(json!({"status": "deleted", "link": removed})))
}

pub async fn move_link(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    ApiJson(request): ApiJson<MoveRequest>,
) -> Result<impl IntoResponse> {
    let direction = request.direction.unwrap_or_default();
    state.links.move_link_named(index, &direction)?;
    Ok(Json(json!({"status": "success"})))
}
