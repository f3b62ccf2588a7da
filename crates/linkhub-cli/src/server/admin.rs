//! Admin page behind a shared password
//!
//! `POST /login` checks the password and sets a session cookie. The cookie
//! holds a token derived from the password and a secret drawn when the
//! server starts, so sessions end when the server restarts or the password
//! changes. `/admin` serves `admin.html` from the static directory only to
//! requests carrying that cookie.

use anyhow::{anyhow, Result as AnyResult};
use axum::{
    extract::{Form, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::{
    error::{ApiError, Result},
    AppState,
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "linkhub_session";

const LOGIN_PAGE: &str = r#"<h2>Admin Login</h2>
<form method="post">
    <input type="password" name="password" placeholder="Password" required>
    <button type="submit">Login</button>
</form>
"#;

const LOGIN_FAILED_PAGE: &str = r#"<h2>Login Failed</h2>
<a href="/login">Try again</a>
"#;

/// Password check and session token for the admin page
#[derive(Clone)]
pub struct AdminGate {
    password: String,
    token: String,
}

impl AdminGate {
    pub fn new(password: &str, secret: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        hasher.update(b"|");
        hasher.update(password.as_bytes());
        Self {
            password: password.to_string(),
            token: hex::encode(hasher.finalize()),
        }
    }

    /// Gate with a fresh random secret
    pub fn with_random_secret(password: &str) -> AnyResult<Self> {
        let mut secret = [0u8; 32];
        getrandom::getrandom(&mut secret)
            .map_err(|e| anyhow!("Failed to generate session secret: {}", e))?;
        Ok(Self::new(password, &secret))
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        !candidate.is_empty() && candidate == self.password
    }

    /// Whether the request carries a valid session cookie
    pub fn is_logged_in(&self, headers: &HeaderMap) -> bool {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name == SESSION_COOKIE && value == self.token)
    }

    fn session_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.token
        )
    }
}

fn expired_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// `GET /login`
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// `POST /login`
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if state.admin.check_password(&form.password) {
        info!("Admin logged in");
        (
            [(SET_COOKIE, state.admin.session_cookie())],
            Redirect::to("/admin"),
        )
            .into_response()
    } else {
        warn!("Admin login failed");
        (StatusCode::UNAUTHORIZED, Html(LOGIN_FAILED_PAGE)).into_response()
    }
}

/// `GET /logout`
pub async fn logout() -> Response {
    ([(SET_COOKIE, expired_cookie())], Redirect::to("/login")).into_response()
}

/// `GET /admin`
pub async fn admin_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if !state.admin.is_logged_in(&headers) {
        return Ok(Redirect::to("/login").into_response());
    }

    let path = state.static_dir.join("admin.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Ok(Html(page).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("admin.html is not installed".to_string()))
        }
        Err(e) => Err(ApiError::Internal(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}
