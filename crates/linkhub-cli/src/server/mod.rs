//! HTTP API
//!
//! Thin axum layer over the core: each handler calls one link or engine
//! operation and shapes its result as JSON. Handlers do blocking file I/O
//! directly; the documents are small and every operation is a single read
//! and write.
//!
//! Any other path is served from the static directory, so `/` is the
//! front page (`index.html`) and `images/<file>` resolves to uploads.
//! `admin.html` is only reachable through the password-gated `/admin`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use linkhub_core::{Config, EngineRegistry, JsonConfigStore, JsonRecordStore, LinkService};
use tower_http::services::ServeDir;
use tracing::info;

mod admin;
mod error;
mod images;
mod links;
mod search;

pub use admin::AdminGate;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkService<JsonRecordStore>>,
    pub engines: Arc<EngineRegistry<JsonConfigStore>>,
    pub static_dir: Arc<PathBuf>,
    pub admin: Arc<AdminGate>,
}

impl AppState {
    pub fn new(
        records: JsonRecordStore,
        config_doc: JsonConfigStore,
        static_dir: impl Into<PathBuf>,
        admin: AdminGate,
    ) -> Self {
        Self {
            links: Arc::new(LinkService::new(records)),
            engines: Arc::new(EngineRegistry::new(config_doc)),
            static_dir: Arc::new(static_dir.into()),
            admin: Arc::new(admin),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            JsonRecordStore::from_config(config),
            JsonConfigStore::from_config(config),
            config.static_dir(),
            AdminGate::with_random_secret(config.admin_password())?,
        ))
    }

    /// Directory uploaded images are stored in
    pub fn images_dir(&self) -> PathBuf {
        self.static_dir.join("images")
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/links", get(links::list_links).post(links::add_link))
        .route(
            "/links/{index}",
            put(links::update_link).delete(links::delete_link),
        )
        .route("/links/{index}/move", post(links::move_link))
        .route("/config", get(search::get_config).post(search::update_config))
        .route("/config/engines", post(search::upsert_engine))
        .route("/config/engines/{name}", delete(search::delete_engine))
        .route("/config/active", post(search::set_active_engine))
        .route("/images-list", get(images::list_images))
        .route("/upload", post(images::upload_image))
        .route("/login", get(admin::login_page).post(admin::login))
        .route("/logout", get(admin::logout))
        .route("/admin", get(admin::admin_page))
        .route("/admin.html", get(admin::admin_page))
        .fallback_service(ServeDir::new(state.static_dir.as_path()))
        .with_state(state)
}

/// Run the HTTP server until Ctrl-C
pub async fn serve(config: &Config, bind: &str) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(
        "Listening on {} (data in {:?})",
        listener.local_addr()?,
        config.data_dir
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::test_state;
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_raw(state: &AppState, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_serves_front_page_and_images() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        fs::create_dir_all(state.images_dir()).unwrap();
        fs::write(state.static_dir.join("index.html"), "<h1>Links</h1>").unwrap();
        fs::write(state.images_dir().join("logo.png"), b"png-bytes").unwrap();

        let (status, body) = get_raw(&state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>Links</h1>");

        let (status, body) = get_raw(&state, "/images/logo.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"png-bytes");

        let (status, _) = get_raw(&state, "/images/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_routes_take_precedence_over_static_files() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        fs::create_dir_all(state.static_dir.as_path()).unwrap();
        fs::write(state.static_dir.join("links"), "not the api").unwrap();

        let (status, body) = get_raw(&state, "/links").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }
}
