//! services/web/src/web/session.rs
//!
//! The client-held session: a signed cookie carrying the logged-in username,
//! the anti-forgery token and pending flash messages.
//!
//! Cookie value: `base64url(json) "." base64url(hmac_sha256(json))`. A cookie
//! that fails the signature check or does not parse is ignored and the request
//! continues as anonymous with a fresh token.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use hmac::{Hmac, Mac};
use notes_core::Identity;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::ConfigError;
use crate::web::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "notes_session";

type HmacSha256 = Hmac<Sha256>;

//=========================================================================================
// Session Payload
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Danger,
}

/// A one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// What the cookie actually stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub username: Option<String>,
    pub csrf_token: String,
    #[serde(default)]
    pub flashes: Vec<Flash>,
}

impl SessionData {
    fn fresh() -> Self {
        Self {
            username: None,
            csrf_token: new_csrf_token(),
            flashes: Vec::new(),
        }
    }
}

fn new_csrf_token() -> String {
    Uuid::new_v4().simple().to_string()
}

//=========================================================================================
// Codec
//=========================================================================================

/// Signs and verifies session cookies with the configured secret key.
#[derive(Clone)]
pub struct SessionCodec {
    mac: HmacSha256,
    secure: bool,
}

impl SessionCodec {
    pub fn new(secret_key: &[u8], secure: bool) -> Result<Self, ConfigError> {
        let mac = HmacSha256::new_from_slice(secret_key)
            .map_err(|e| ConfigError::InvalidValue("SECRET_KEY".to_string(), e.to_string()))?;
        Ok(Self { mac, secure })
    }

    pub fn encode(&self, data: &SessionData) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(data)?;
        let signature = self.mac.clone().chain_update(&payload).finalize().into_bytes();
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Returns `None` for anything not produced by `encode` with the same key.
    pub fn decode(&self, value: &str) -> Option<SessionData> {
        let (payload_b64, signature_b64) = value.split_once('.')?;
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        self.mac
            .clone()
            .chain_update(&payload)
            .verify_slice(&signature)
            .ok()?;
        serde_json::from_slice(&payload).ok()
    }

    /// Reads the session cookie out of a request's headers.
    pub fn read_cookie(&self, headers: &HeaderMap) -> Option<SessionData> {
        let value = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .find_map(|c| {
                c.trim()
                    .strip_prefix(SESSION_COOKIE_NAME)
                    .and_then(|rest| rest.strip_prefix('='))
            })?;
        let data = self.decode(value);
        if data.is_none() {
            debug!("Discarding session cookie with a bad signature or payload");
        }
        data
    }

    fn set_cookie(&self, data: &SessionData) -> Option<HeaderValue> {
        let value = match self.encode(data) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to encode session: {:?}", e);
                return None;
            }
        };
        let cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
            SESSION_COOKIE_NAME,
            value,
            Duration::days(30).num_seconds(),
            if self.secure { "; Secure" } else { "" }
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

//=========================================================================================
// RequestContext (one per request, never shared)
//=========================================================================================

/// The caller's session for the duration of one request.
///
/// Extract it in a handler, mutate it, and return it as part of the response:
/// it writes the updated cookie back.
pub struct RequestContext {
    identity: Identity,
    csrf_token: String,
    flashes: Vec<Flash>,
    codec: SessionCodec,
}

impl RequestContext {
    pub fn new(codec: SessionCodec, data: Option<SessionData>) -> Self {
        let data = data.unwrap_or_else(SessionData::fresh);
        Self {
            identity: match data.username {
                Some(username) => Identity::Authenticated(username),
                None => Identity::Anonymous,
            },
            csrf_token: data.csrf_token,
            flashes: data.flashes,
            codec,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Establishes `username` as the session identity and rotates the token.
    pub fn login(&mut self, username: &str) {
        self.identity = Identity::authenticated(username);
        self.csrf_token = new_csrf_token();
    }

    /// Back to anonymous. The token survives so a repeated logout still validates.
    pub fn logout(&mut self) {
        self.identity = Identity::Anonymous;
    }

    pub fn flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flashes.push(Flash {
            kind,
            message: message.into(),
        });
    }

    /// Hands the pending flashes to the page being rendered.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    pub fn verify_csrf(&self, submitted: &str) -> bool {
        !submitted.is_empty() && submitted == self.csrf_token
    }

    fn to_session_data(&self) -> SessionData {
        SessionData {
            username: self.identity.username().map(str::to_string),
            csrf_token: self.csrf_token.clone(),
            flashes: self.flashes.clone(),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let data = state.sessions.read_cookie(&parts.headers);
        Ok(RequestContext::new(state.sessions.clone(), data))
    }
}

impl IntoResponseParts for RequestContext {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(cookie) = self.codec.set_cookie(&self.to_session_data()) {
            res.headers_mut().append(header::SET_COOKIE, cookie);
        }
        Ok(res)
    }
}
