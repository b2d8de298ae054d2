//! Invitation tokens
//!
//! The raw token is only handed out inside the confirmation link; the store
//! keeps its SHA-256 digest.

use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

const TOKEN_LENGTH: usize = 32;

/// A freshly generated invitation token and its digest.
#[derive(Debug, Clone)]
pub struct InvitationToken {
    /// Raw token for the confirmation link
    pub token: String,

    /// Digest to persist
    pub hash: String,
}

impl InvitationToken {
    /// Generate a random alphanumeric token.
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        let hash = hash_token(&token);
        Self { token, hash }
    }
}

/// SHA-256 digest of a token, base64url encoded without padding.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}
