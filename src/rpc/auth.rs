use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use crate::node::config::NodeConfig;
use crate::rpc::server::AppState;
use crate::utils::metrics::UNAUTHORIZED_TOTAL;
use crate::utils::{NodeError, Result};

pub type HmacSha256 = Hmac<Sha256>;

pub const REALM_CHALLENGE: &str = r#"Basic realm="factomd RPC""#;

/// Fixed MAC key; the secret material is the credential pair itself.
const TAG_KEY: &[u8] = b"node-debug-api rpc credential tag";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing authorization header")]
    Missing,
    #[error("malformed authorization header")]
    Malformed,
    #[error("credentials do not match")]
    Mismatch,
}

/// HTTP Basic credential gate for the debug endpoint.
///
/// The configured `user:password` pair is not retained; only its HMAC-SHA256
/// tag under `TAG_KEY` is. A caller's credentials are checked by tagging the
/// supplied pair the same way and comparing in constant time.
#[derive(Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    tag: Arc<Vec<u8>>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig").field("enabled", &self.enabled).finish()
    }
}

impl AuthConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, tag: Arc::new(vec![]) }
    }

    pub fn new(user: &str, password: &str) -> Result<Self> {
        let mut mac = tag_mac().map_err(|e| NodeError::ConfigError(format!("rpc credentials: {}", e)))?;
        mac.update(format!("{}:{}", user, password).as_bytes());
        let tag = mac.finalize().into_bytes().to_vec();
        Ok(Self { enabled: true, tag: Arc::new(tag) })
    }

    /// Gate disabled only when neither user nor password is configured. A
    /// half-configured pair still closes the gate.
    pub fn from_config(cfg: &NodeConfig) -> Result<Self> {
        match cfg.rpc_credentials() {
            Some((user, password)) => Self::new(user, password),
            None => Ok(Self::disabled()),
        }
    }

    /// Validate the request's `Authorization` header.
    pub fn check(&self, headers: &HeaderMap) -> std::result::Result<(), AuthError> {
        if !self.enabled {
            return Ok(());
        }
        let value = headers.get(header::AUTHORIZATION).ok_or(AuthError::Missing)?;
        let value = value.to_str().map_err(|_| AuthError::Malformed)?;
        let encoded = value
            .strip_prefix("Basic ")
            .ok_or(AuthError::Malformed)?
            .trim();
        let supplied = STANDARD.decode(encoded).map_err(|_| AuthError::Malformed)?;
        self.verify(&supplied)
    }

    fn verify(&self, supplied: &[u8]) -> std::result::Result<(), AuthError> {
        let mut mac = tag_mac().map_err(|_| AuthError::Mismatch)?;
        mac.update(supplied);
        mac.verify_slice(&self.tag).map_err(|_| AuthError::Mismatch)
    }
}

fn tag_mac() -> std::result::Result<HmacSha256, hmac::digest::InvalidLength> {
    HmacSha256::new_from_slice(TAG_KEY)
}

/// Build the `Authorization` header value for a user/password pair.
pub fn basic_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

/// Rejects unauthenticated callers before the body is read.
pub async fn require_basic_auth(
    State(app): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if let Err(e) = app.auth.check(req.headers()) {
        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string())
            .unwrap_or_default();
        warn!(remote_ip = %remote_ip, reason = %e, "unauthorized debug API client connection attempt");
        app.metrics.inc_counter(UNAUTHORIZED_TOTAL);
        return unauthorized();
    }
    next.run(req).await
}

/// 401 with the re-authentication challenge.
pub fn unauthorized() -> Response {
    let mut resp = (StatusCode::UNAUTHORIZED, "401 Unauthorized.\n").into_response();
    resp.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(REALM_CHALLENGE));
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn disabled_gate_admits_everyone() {
        let auth = AuthConfig::disabled();
        assert!(auth.check(&HeaderMap::new()).is_ok());
        assert!(auth.check(&headers("Basic garbage")).is_ok());
    }

    #[test]
    fn from_config_without_credentials_is_disabled() {
        assert!(!AuthConfig::from_config(&NodeConfig::default()).unwrap().enabled);
    }

    #[test]
    fn half_configured_pair_keeps_gate_closed() {
        let mut cfg = NodeConfig::default();
        cfg.rpc.user = Some("admin".to_string());
        let auth = AuthConfig::from_config(&cfg).unwrap();
        assert!(auth.enabled);
        assert_eq!(auth.check(&HeaderMap::new()), Err(AuthError::Missing));
        assert_eq!(auth.check(&headers(&basic_header("admin", ""))), Ok(()));

        let mut cfg = NodeConfig::default();
        cfg.rpc.password = Some("s3cret".to_string());
        assert!(AuthConfig::from_config(&cfg).unwrap().enabled);
    }

    #[test]
    fn accepts_matching_credentials() {
        let auth = AuthConfig::new("admin", "s3cret").unwrap();
        assert_eq!(auth.check(&headers(&basic_header("admin", "s3cret"))), Ok(()));
    }

    #[test]
    fn rejects_missing_malformed_and_wrong() {
        let auth = AuthConfig::new("admin", "s3cret").unwrap();
        assert_eq!(auth.check(&HeaderMap::new()), Err(AuthError::Missing));
        assert_eq!(auth.check(&headers("Bearer abc")), Err(AuthError::Malformed));
        assert_eq!(auth.check(&headers("Basic !!!")), Err(AuthError::Malformed));
        assert_eq!(
            auth.check(&headers(&basic_header("admin", "wrong"))),
            Err(AuthError::Mismatch)
        );
        assert_eq!(
            auth.check(&headers(&basic_header("admin", "s3cret2"))),
            Err(AuthError::Mismatch)
        );
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let resp = unauthorized();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], REALM_CHALLENGE);
    }
}
