use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use crate::state::AppState;

/// Capability check for the administrative routes.
///
/// Carried in `AppState` as `Arc<dyn AdminGate>` so tests can swap it.
pub trait AdminGate: Send + Sync {
    fn is_admin(&self, headers: &HeaderMap) -> bool;
}

/// HTTP Basic credentials configured at startup.
pub struct BasicAdminGate {
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl BasicAdminGate {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username_digest: Sha256::digest(username.as_bytes()).into(),
            password_digest: Sha256::digest(password.as_bytes()).into(),
        }
    }
}

impl AdminGate for BasicAdminGate {
    fn is_admin(&self, headers: &HeaderMap) -> bool {
        let Some((username, password)) = basic_credentials(headers) else {
            return false;
        };
        // Compare fixed-length digests so the check does not short-circuit on length.
        let user_ok: [u8; 32] = Sha256::digest(username.as_bytes()).into();
        let pass_ok: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        (user_ok == self.username_digest) & (pass_ok == self.password_digest)
    }
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Route layer for `/admin/*`: challenges the browser for Basic credentials.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.admin.is_admin(request.headers()) {
        return next.run(request).await;
    }
    tracing::warn!(path = %request.uri().path(), "Admin credentials missing or invalid");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Job Applications\"")],
        "Authentication required",
    )
        .into_response()
}
