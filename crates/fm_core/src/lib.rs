pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;

pub use config::{AwsEnvironment, EnvSecrets, FundManagerConfig};
pub use crypto::{decrypt, decrypt_or_empty, encrypt, encrypt_or_empty};
pub use error::{CryptoError, FundError, Result};
