// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Symmetric token codec.
//!
//! Tokens are AES-256-GCM sealed JSON claim maps:
//!
//! ```text
//! v1.local.<base64url(nonce || ciphertext || tag)>
//! ```
//!
//! The key is the SHA-256 digest of the configured secret. The header is
//! bound as associated data, so a token cannot be replayed under a
//! different header. Any token that was tampered with, sealed under another
//! secret, or is structurally broken fails with [`CodecError::InvalidToken`].

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Token header, also used as AEAD associated data.
pub const TOKEN_HEADER: &str = "v1.local.";

/// AES-GCM nonce size in bytes.
const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes.
const TAG_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("token could not be decrypted")]
    InvalidToken,

    #[error("token encryption failed: {0}")]
    Encryption(String),
}

/// Encrypts and decrypts claim maps under a pre-shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Seal a claims map into an opaque token string.
    pub fn encrypt(&self, claims: &Map<String, Value>) -> Result<String, CodecError> {
        let plaintext =
            serde_json::to_vec(claims).map_err(|e| CodecError::Encryption(e.to_string()))?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(nonce.as_slice());
        sealed.extend_from_slice(&ciphertext);

        Ok(format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(sealed)))
    }

    /// Open a token and return its claims map.
    pub fn decrypt(&self, token: &str) -> Result<Map<String, Value>, CodecError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(CodecError::InvalidToken)?;
        let sealed = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| CodecError::InvalidToken)?;

        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CodecError::InvalidToken);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| CodecError::InvalidToken)?;

        serde_json::from_slice(&plaintext).map_err(|_| CodecError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims() -> Map<String, Value> {
        json!({ "subject_id": "42", "exp": 1_900_000_000_i64, "type": "access" })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_returns_claims() {
        let codec = TokenCodec::new("secret-a");
        let token = codec.encrypt(&sample_claims()).unwrap();

        assert!(token.starts_with(TOKEN_HEADER));
        assert_eq!(codec.decrypt(&token).unwrap(), sample_claims());
    }

    #[test]
    fn same_claims_produce_distinct_tokens() {
        let codec = TokenCodec::new("secret-a");
        let first = codec.encrypt(&sample_claims()).unwrap();
        let second = codec.encrypt(&sample_claims()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn foreign_secret_fails() {
        let token = TokenCodec::new("secret-a").encrypt(&sample_claims()).unwrap();
        let result = TokenCodec::new("secret-b").decrypt(&token);
        assert!(matches!(result, Err(CodecError::InvalidToken)));
    }

    #[test]
    fn tampered_token_fails() {
        let codec = TokenCodec::new("secret-a");
        let token = codec.encrypt(&sample_claims()).unwrap();

        let mut sealed = URL_SAFE_NO_PAD
            .decode(token.strip_prefix(TOKEN_HEADER).unwrap())
            .unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        let tampered = format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(sealed));

        assert!(matches!(
            codec.decrypt(&tampered),
            Err(CodecError::InvalidToken)
        ));
    }

    #[test]
    fn malformed_tokens_fail() {
        let codec = TokenCodec::new("secret-a");
        for token in ["", "v1.local.", "v1.local.!!!", "v2.local.AAAA", "v1.local.AAAA"] {
            assert!(
                matches!(codec.decrypt(token), Err(CodecError::InvalidToken)),
                "token {token:?} should be rejected"
            );
        }
    }
}
