use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fm_core::{FundError, FundManagerConfig, crypto};

use crate::networks::BEARER;

/// Payload of an auth token before encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenBody {
    pub start_date_time: String,
    pub end_date_time: String,
    pub random_key: String,
}

impl AuthTokenBody {
    /// Decrypt and parse a token issued under `api_key`.
    pub fn decode(token: &str, api_key: &str) -> Result<Self, FundError> {
        let json = crypto::decrypt(token, api_key)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Whether `now` falls inside the token's validity window (inclusive).
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> Result<bool, FundError> {
        let start = parse_timestamp(&self.start_date_time)?;
        let end = parse_timestamp(&self.end_date_time)?;
        Ok(start <= now && now <= end)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FundError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| FundError::InvalidToken(format!("bad timestamp {raw:?}: {e}")))
}

/// Opaque encrypted token for the multiswap backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// `Authorization` header value: `"Bearer <token>"`.
    pub fn bearer_header(&self) -> String {
        format!("{BEARER}{}", self.0)
    }
}

/// Issues short-lived auth tokens encrypted under the API key.
#[derive(Debug, Clone)]
pub struct AuthTokenIssuer {
    api_key: String,
    window: Duration,
    random_bytes: usize,
}

impl AuthTokenIssuer {
    pub fn new(api_key: impl Into<String>, window: Duration, random_bytes: usize) -> Self {
        Self {
            api_key: api_key.into(),
            window,
            random_bytes,
        }
    }

    pub fn from_config(config: &FundManagerConfig) -> Result<Self, FundError> {
        if config.auth_token_window_secs < 0 {
            return Err(FundError::Config(format!(
                "auth_token_window_secs must not be negative, got {}",
                config.auth_token_window_secs
            )));
        }
        Ok(Self::new(
            config.api_key()?,
            Duration::seconds(config.auth_token_window_secs),
            config.auth_token_random_bytes,
        ))
    }

    pub fn issue(&self) -> Result<AuthToken, FundError> {
        self.issue_at(Utc::now())
    }

    /// Build a token valid from `now - window` to `now + window`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<AuthToken, FundError> {
        let body = self.body_at(now);
        let json = serde_json::to_string(&body)?;
        let token = crypto::encrypt(&json, &self.api_key)?;
        debug!(
            start = %body.start_date_time,
            end = %body.end_date_time,
            "auth token issued"
        );
        Ok(AuthToken(token))
    }

    fn body_at(&self, now: DateTime<Utc>) -> AuthTokenBody {
        let mut nonce = vec![0u8; self.random_bytes];
        rand::rng().fill_bytes(&mut nonce);

        AuthTokenBody {
            start_date_time: format_timestamp(now - self.window),
            end_date_time: format_timestamp(now + self.window),
            random_key: hex::encode(nonce),
        }
    }
}

/// Fail-soft token creation: logs and returns an empty string on failure.
pub fn create_auth_token_for_multiswap_backend(config: &FundManagerConfig) -> String {
    AuthTokenIssuer::from_config(config)
        .and_then(|issuer| issuer.issue())
        .map(AuthToken::into_inner)
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to create auth token");
            String::new()
        })
}
