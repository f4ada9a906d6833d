use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine, engine::general_purpose::STANDARD};
use md5::{Digest, Md5};
use tracing::warn;

use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Marker that opens every passphrase-encrypted payload.
const SALT_HEADER: &[u8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const HEADER_LEN: usize = SALT_HEADER.len() + SALT_LEN;

/// OpenSSL `EVP_BytesToKey` with MD5 and a single iteration: derives the
/// AES-256 key and CBC IV from a passphrase and an 8-byte salt.
fn evp_bytes_to_key(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut derived = Vec::with_capacity(KEY_LEN + IV_LEN + BLOCK_LEN);
    let mut block: Vec<u8> = Vec::new();
    while derived.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        derived.extend_from_slice(&block);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&derived[..KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}

fn encrypt_with_salt(data: &str, key: &str, salt: [u8; SALT_LEN]) -> String {
    let (aes_key, iv) = evp_bytes_to_key(key.as_bytes(), &salt);
    let ciphertext = Aes256CbcEnc::new(&aes_key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(data.as_bytes());

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(SALT_HEADER);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&ciphertext);
    STANDARD.encode(out)
}

/// Encrypt `data` under the passphrase `key`.
///
/// Output is the OpenSSL `enc` / CryptoJS passphrase format: base64 of
/// `"Salted__" || salt(8) || AES-256-CBC(PKCS#7)`, key and IV from
/// [`evp_bytes_to_key`]. A fresh salt is drawn per call.
pub fn encrypt(data: &str, key: &str) -> Result<String, CryptoError> {
    if key.is_empty() {
        return Err(CryptoError::EmptyKey);
    }
    Ok(encrypt_with_salt(data, key, rand::random()))
}

/// Decrypt an OpenSSL / CryptoJS passphrase payload.
pub fn decrypt(data: &str, key: &str) -> Result<String, CryptoError> {
    if key.is_empty() {
        return Err(CryptoError::EmptyKey);
    }

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
    let min = HEADER_LEN + BLOCK_LEN;
    if bytes.len() < min {
        return Err(CryptoError::Truncated {
            len: bytes.len(),
            min,
        });
    }

    let (header, rest) = bytes.split_at(SALT_HEADER.len());
    if header != SALT_HEADER {
        return Err(CryptoError::MissingSaltHeader);
    }
    let (salt, ciphertext) = rest.split_at(SALT_LEN);
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::Decrypt);
    }

    let (aes_key, iv) = evp_bytes_to_key(key.as_bytes(), salt);
    let plaintext = Aes256CbcDec::new(&aes_key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decrypt)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}

/// Fail-soft [`encrypt`]: logs the failure and returns an empty string.
pub fn encrypt_or_empty(data: &str, key: &str) -> String {
    encrypt(data, key).unwrap_or_else(|e| {
        warn!(error = %e, "encryption failed, returning empty payload");
        String::new()
    })
}

/// Fail-soft [`decrypt`]: logs the failure and returns an empty string.
pub fn decrypt_or_empty(data: &str, key: &str) -> String {
    decrypt(data, key).unwrap_or_else(|e| {
        warn!(error = %e, "decryption failed, returning empty payload");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Produced by `openssl enc -aes-256-cbc -md md5 -a`, the format
    // `CryptoJS.AES.encrypt(data, passphrase)` emits.
    const OPENSSL_PRIVATE_KEY: &str = "U2FsdGVkX18bYkLiEAKBNbF+zQEEI7aqEKB986jBueQ=";
    const OPENSSL_TOKEN_BODY: &str =
        "U2FsdGVkX18BAgMEBQYHCNna2Q9LMxXGh70yZbDsiFNqY124KmbnrxcMUM3myhLNk3yDCyWp9qyyPtSFEyLxsQ==";
    const TOKEN_BODY: &str = r#"{"startDateTime":"2024-05-01T11:59:00Z"}"#;

    #[test]
    fn decrypts_openssl_payload() {
        assert_eq!(decrypt(OPENSSL_PRIVATE_KEY, "remote-local").unwrap(), "0xdeadbeef");
        assert_eq!(decrypt(OPENSSL_TOKEN_BODY, "api-key").unwrap(), TOKEN_BODY);
    }

    #[test]
    fn encrypt_matches_openssl_for_same_salt() {
        let salt = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(encrypt_with_salt(TOKEN_BODY, "api-key", salt), OPENSSL_TOKEN_BODY);
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let plaintext = "0x4c0883a69102937d6231471b5dbb6204fe512961708279f1d3c5f6ad3b9e4f1a";
        let encrypted = encrypt(plaintext, "passphrase").unwrap();
        assert_eq!(decrypt(&encrypted, "passphrase").unwrap(), plaintext);
    }

    #[test]
    fn roundtrip_edge_inputs() {
        let long = "A".repeat(5_000);
        for data in ["", "short", "{\"a\":1}", "Hello \u{1f30d} \u{4e16}\u{754c}", long.as_str()] {
            let enc = encrypt(data, "k").unwrap();
            assert_eq!(decrypt(&enc, "k").unwrap(), data);
        }
    }

    #[test]
    fn encrypt_output_starts_with_salt_header() {
        let encrypted = encrypt("test", "key").unwrap();
        // base64("Salted__")
        assert!(encrypted.starts_with("U2FsdGVkX1"));
        assert_eq!(STANDARD.decode(&encrypted).unwrap().len(), HEADER_LEN + BLOCK_LEN);
    }

    #[test]
    fn encrypt_different_each_time() {
        let a = encrypt("same input", "key").unwrap();
        let b = encrypt("same input", "key").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(encrypt("data", ""), Err(CryptoError::EmptyKey));
        assert_eq!(decrypt(OPENSSL_PRIVATE_KEY, ""), Err(CryptoError::EmptyKey));
    }

    #[test]
    fn decrypt_wrong_key_fails() {
        // A wrong key almost always breaks the padding; the rare survivor
        // fails the UTF-8 check or yields a different plaintext.
        let result = decrypt(OPENSSL_TOKEN_BODY, "wrong");
        assert_ne!(result.as_deref(), Ok(TOKEN_BODY));
    }

    #[test]
    fn decrypt_invalid_base64() {
        assert!(matches!(
            decrypt("not base64 !!", "key"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decrypt_too_short() {
        assert_eq!(
            decrypt("U2FsdGVkX18=", "key"),
            Err(CryptoError::Truncated { len: 8, min: 32 })
        );
    }

    #[test]
    fn decrypt_without_salt_header() {
        let raw = STANDARD.encode([0u8; 32]);
        assert_eq!(decrypt(&raw, "key"), Err(CryptoError::MissingSaltHeader));
    }

    #[test]
    fn decrypt_partial_block_fails() {
        let mut bytes = STANDARD.decode(OPENSSL_TOKEN_BODY).unwrap();
        bytes.pop();
        assert_eq!(decrypt(&STANDARD.encode(bytes), "api-key"), Err(CryptoError::Decrypt));
    }

    #[test]
    fn evp_bytes_to_key_is_deterministic() {
        let a = evp_bytes_to_key(b"pass", b"12345678");
        let b = evp_bytes_to_key(b"pass", b"12345678");
        let c = evp_bytes_to_key(b"pass", b"87654321");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fail_soft_wrappers_return_empty() {
        assert_eq!(encrypt_or_empty("data", ""), "");
        assert_eq!(decrypt_or_empty("garbage", "key"), "");
    }

    #[test]
    fn fail_soft_wrappers_pass_through_success() {
        let enc = encrypt_or_empty("payload", "key");
        assert!(!enc.is_empty());
        assert_eq!(decrypt_or_empty(&enc, "key"), "payload");
    }
}
