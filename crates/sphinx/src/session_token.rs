//! Signed session tokens.
//!
//! The riddle state never lives on the server. It travels in a cookie as
//! an ed25519-signed token that only this server can mint:
//!
//! Token format: base64(json{exp, state}).base64(signature)
//!
//! - Tokens expire after the configured max age
//! - A token that fails to decode, verify, or is expired is treated as a
//!   brand new visitor, never as an error

use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SessionConfig;
use crate::riddle::RiddleSessionState;
use crate::state::AppState;

/// Signed payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Expiry timestamp (unix seconds)
    exp: u64,
    state: RiddleSessionState,
}

/// Mints and verifies session cookies
pub struct SessionSigner {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    cookie_name: String,
    max_age_secs: u64,
    secure: bool,
}

impl SessionSigner {
    /// Create a signer. The key is derived from the configured secret, or
    /// generated fresh when none is set (sessions then die with the process).
    pub fn new(config: &SessionConfig) -> Self {
        let signing_key = match config.secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                let seed: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
                SigningKey::from_bytes(&seed)
            }
            _ => {
                use rand_core::OsRng;
                tracing::warn!("No session secret configured, using ephemeral key (sessions reset on restart)");
                SigningKey::generate(&mut OsRng)
            }
        };
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
            cookie_name: config.cookie_name.clone(),
            max_age_secs: config.max_age_secs,
            secure: config.secure_cookie,
        }
    }

    /// Sign `state` into a token
    pub fn seal(&self, state: &RiddleSessionState) -> Result<String> {
        let envelope = Envelope {
            exp: now_secs().saturating_add(self.max_age_secs),
            state: state.clone(),
        };
        let payload = serde_json::to_vec(&envelope).context("Failed to encode session")?;
        let signature = self.signing_key.sign(&payload);

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }

    /// Verify a token and recover its state
    pub fn open(&self, token: &str) -> Result<RiddleSessionState> {
        let (payload_b64, sig_b64) = token
            .split_once('.')
            .context("Invalid token format (missing signature)")?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .context("Invalid payload encoding")?;
        let sig_bytes = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .context("Invalid signature encoding")?;

        let sig_array: [u8; 64] = sig_bytes
            .as_slice()
            .try_into()
            .context("Invalid signature length")?;
        let signature = Signature::from_bytes(&sig_array);

        self.verifying_key
            .verify(&payload, &signature)
            .context("Invalid signature")?;

        let envelope: Envelope =
            serde_json::from_slice(&payload).context("Invalid session payload")?;

        let now = now_secs();
        if envelope.exp < now {
            bail!("Session expired (expired at {}, now is {})", envelope.exp, now);
        }

        Ok(envelope.state)
    }

    /// Full `Set-Cookie` value carrying `state`
    pub fn set_cookie(&self, state: &RiddleSessionState) -> Result<String> {
        let token = self.seal(state)?;
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.cookie_name, token, self.max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        Ok(cookie)
    }

    /// Find our cookie in the request headers
    pub fn read_cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value)
    }

    /// State for this request; anything unreadable becomes a fresh session
    pub fn load(&self, headers: &HeaderMap) -> RiddleSessionState {
        let Some(token) = self.read_cookie(headers) else {
            return RiddleSessionState::default();
        };

        match self.open(token) {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding unusable session token");
                RiddleSessionState::default()
            }
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// The requesting visitor's riddle state, decoded from their cookie
#[derive(Debug, Clone)]
pub struct VisitorSession(pub RiddleSessionState);

impl FromRequestParts<AppState> for VisitorSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.signer.load(&parts.headers)))
    }
}
