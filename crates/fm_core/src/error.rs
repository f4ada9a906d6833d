use thiserror::Error;

/// Failure kinds of the symmetric cipher helpers.
///
/// Kept separate from [`FundError`] so that callers of `encrypt`/`decrypt`
/// can tell a wrong key apart from a malformed payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encryption key is empty")]
    EmptyKey,

    #[error("ciphertext is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("ciphertext too short: {len} bytes, expected at least {min}")]
    Truncated { len: usize, min: usize },

    #[error("ciphertext does not start with the \"Salted__\" header")]
    MissingSaltHeader,

    #[error("decryption failed (wrong key or tampered data)")]
    Decrypt,

    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,
}

/// Top-level error type for the fund manager helpers.
#[derive(Error, Debug)]
pub enum FundError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing secret: {0}")]
    MissingSecret(&'static str),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Invalid auth token: {0}")]
    InvalidToken(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FundError>;
