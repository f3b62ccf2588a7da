//! Configuration document and search engine endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use linkhub_core::{storage::migrate, ConfigDocument, ConfigStore, HubError};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    error::{ApiError, ApiJson, Result},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct EngineRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub engine: Option<String>,
}

/// `GET /config`: the migrated document
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigDocument>> {
    Ok(Json(state.engines.store().load()?))
}

/// `POST /config`: replace the whole document
///
/// Any JSON object is accepted and brought into the current shape before
/// it is stored.
pub async fn update_config(
    State(state): State<AppState>,
    ApiJson(raw): ApiJson<Value>,
) -> Result<impl IntoResponse> {
    if !raw.is_object() {
        return Err(ApiError::InvalidRequest(
            "Configuration must be a JSON object".to_string(),
        ));
    }
    let doc: ConfigDocument = serde_json::from_value(migrate(raw)).map_err(HubError::from)?;
    state.engines.store().save(&doc)?;
    Ok(Json(json!({"status": "success"})))
}

/// `POST /config/engines`: add or update an engine
pub async fn upsert_engine(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EngineRequest>,
) -> Result<impl IntoResponse> {
    state.engines.upsert(
        request.name.as_deref().unwrap_or_default(),
        request.url.as_deref().unwrap_or_default(),
        request.logo.as_deref().unwrap_or_default(),
    )?;
    Ok(Json(json!({"status": "ok"})))
}

/// `DELETE /config/engines/{name}`
pub async fn delete_engine(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    state.engines.remove(&name)?;
    Ok(Json(json!({"status": "ok"})))
}

/// `POST /config/active`: select the active engine
pub async fn set_active_engine(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ActiveRequest>,
) -> Result<impl IntoResponse> {
    state
        .engines
        .set_active(request.engine.as_deref().unwrap_or_default())?;
    Ok(Json(json!({"status": "ok"})))
}
