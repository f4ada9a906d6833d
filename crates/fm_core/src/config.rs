use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::crypto;
use crate::error::FundError;

// ---------------------------------------------------------------------------
// Secret sources
// ---------------------------------------------------------------------------

/// Secrets fetched by the AWS bootstrap and handed to us at start-up.
#[derive(Debug, Clone, Default)]
pub struct AwsEnvironment {
    pub security_key: Option<String>,
    pub api_key: Option<String>,
}

/// Secrets read from the process environment.
///
/// `PRIVATE_KEY` holds the signing key encrypted under the security key;
/// `SECURITY_KEY` holds the local half of that security key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvSecrets {
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub security_key: Option<String>,
}

impl EnvSecrets {
    /// Read `PRIVATE_KEY` and `SECURITY_KEY` from the process environment.
    pub fn from_env() -> Result<Self> {
        envy::from_env::<Self>().context("Failed to read secrets from environment")
    }

    /// Read secrets from an explicit set of `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars).context("Failed to read secrets from variables")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// FundManagerConfig
// ---------------------------------------------------------------------------

/// Configuration stored at `~/.fund_manager/config.json`.
///
/// Secrets are **never** written to the JSON file. They come from the
/// environment ([`EnvSecrets`]) and from the AWS bootstrap
/// ([`AwsEnvironment`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FundManagerConfig {
    #[serde(skip)]
    pub aws: AwsEnvironment,
    #[serde(skip)]
    pub env: EnvSecrets,

    pub log_level: String,
    /// Half-width of the validity window of issued auth tokens.
    pub auth_token_window_secs: i64,
    /// Size of the random nonce embedded in auth tokens, before hex encoding.
    pub auth_token_random_bytes: usize,
}

impl Default for FundManagerConfig {
    fn default() -> Self {
        Self {
            aws: AwsEnvironment::default(),
            env: EnvSecrets::default(),
            log_level: "info".into(),
            auth_token_window_secs: 60,
            auth_token_random_bytes: 512,
        }
    }
}

impl FundManagerConfig {
    /// Returns the base config directory: `~/.fund_manager/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".fund_manager"))
    }

    /// Returns the config file path: `~/.fund_manager/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.fund_manager/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Loads config from the default path and secrets from the environment.
    pub fn load() -> Result<Self> {
        let base = Self::base_dir()?;
        std::fs::create_dir_all(&base)
            .with_context(|| format!("Failed to create directory: {}", base.display()))?;
        let config = Self::load_from_path(&Self::config_path()?)?;
        Ok(config.with_env(EnvSecrets::from_env()?))
    }

    /// Load config from a specific file path, writing the defaults if the
    /// file does not exist yet.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Save config to a specific file path (secrets are excluded).
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn with_env(mut self, env: EnvSecrets) -> Self {
        self.env = env;
        self
    }

    pub fn with_aws(mut self, aws: AwsEnvironment) -> Self {
        self.aws = aws;
        self
    }

    /// The key that protects `PRIVATE_KEY`: the AWS security key followed by
    /// the `SECURITY_KEY` environment variable. Only an unset half is an
    /// error; an empty one concatenates as is.
    pub fn security_key(&self) -> Result<String, FundError> {
        let remote = self
            .aws
            .security_key
            .as_deref()
            .ok_or(FundError::MissingSecret("AWS_ENVIRONMENT.SECURITY_KEY"))?;
        let local = self
            .env
            .security_key
            .as_deref()
            .ok_or(FundError::MissingSecret("SECURITY_KEY"))?;
        Ok(format!("{remote}{local}"))
    }

    /// Decrypt `PRIVATE_KEY` with [`Self::security_key`].
    pub fn private_key(&self) -> Result<String, FundError> {
        let encrypted =
            non_empty(&self.env.private_key).ok_or(FundError::MissingSecret("PRIVATE_KEY"))?;
        let security_key = self.security_key()?;
        Ok(crypto::decrypt(encrypted, &security_key)?)
    }

    /// Fail-soft [`Self::private_key`]: logs and returns an empty string.
    pub fn private_key_or_empty(&self) -> String {
        self.private_key().unwrap_or_else(|e| {
            warn!(error = %e, "private key unavailable");
            String::new()
        })
    }

    /// The API key that auth tokens are encrypted under.
    pub fn api_key(&self) -> Result<&str, FundError> {
        non_empty(&self.aws.api_key).ok_or(FundError::MissingSecret("AWS_ENVIRONMENT.API_KEY"))
    }
}
