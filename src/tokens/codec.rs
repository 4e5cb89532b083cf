//! Signing and verification of the token wire format.
//!
//! Tokens are three dot-separated base64url segments (header, claims,
//! signature). The signature is HMAC-SHA256 over `header.claims` using a
//! secret selected by token type: access and refresh tokens sign with
//! distinct secrets, so a leaked refresh secret cannot forge access tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use super::claims::{Claims, TokenType};

type HmacSha256 = Hmac<Sha256>;

const SUPPORTED_ALG: &str = "HS256";

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("unsupported token algorithm: {0}")]
    UnsupportedFormat(String),
    #[error("token carries no usable claims")]
    EmptyClaims,
    #[error("expected a {expected} token, got {actual}")]
    TokenTypeMismatch {
        expected: TokenType,
        actual: TokenType,
    },
    #[error("session has been revoked")]
    SessionRevoked,
    #[error("revocation store lookup failed: {0}")]
    Store(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Signs and verifies tokens. Stateless; safe to share behind an `Arc`.
pub struct TokenCodec {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        }
    }

    fn secret_for(&self, token_type: TokenType) -> &[u8] {
        match token_type {
            TokenType::Access => &self.access_secret,
            TokenType::Refresh => &self.refresh_secret,
        }
    }

    /// Serialize and sign claims with the secret for the claims' own type.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header {
            alg: SUPPORTED_ALG.to_string(),
            typ: "JWT".to_string(),
        };
        let header_b64 =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).map_err(|_| TokenError::Malformed)?);
        let claims_b64 =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).map_err(|_| TokenError::Malformed)?);

        let signature = self.compute_signature(claims.token_type, &header_b64, &claims_b64);
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{header_b64}.{claims_b64}.{signature_b64}"))
    }

    /// Verify signature, expiry, then the embedded token type.
    ///
    /// Ordering is deliberate: a token that fails structurally or
    /// cryptographically is rejected before any claim content is trusted,
    /// so an attacker learns nothing about session state from a forgery.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (header_b64, claims_b64, signature_b64) =
            match (segments.next(), segments.next(), segments.next()) {
                (Some(h), Some(c), Some(s)) if segments.next().is_none() => (h, c, s),
                _ => return Err(TokenError::Malformed),
            };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
        if header.alg != SUPPORTED_ALG {
            return Err(TokenError::UnsupportedFormat(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        if !self.signature_matches(expected, header_b64, claims_b64, &signature) {
            // The token may be a valid token of the *other* type. Telling
            // that apart from a forgery lets the caller surface
            // TokenTypeMismatch instead of BadSignature.
            return Err(self.classify_signature_failure(
                expected,
                header_b64,
                claims_b64,
                &signature,
            ));
        }

        let claims = decode_claims(claims_b64)?;
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }
        if claims.token_type != expected {
            return Err(TokenError::TokenTypeMismatch {
                expected,
                actual: claims.token_type,
            });
        }

        Ok(claims)
    }

    fn compute_signature(&self, token_type: TokenType, header_b64: &str, claims_b64: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret_for(token_type))
            .expect("HMAC can take key of any size");
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn signature_matches(
        &self,
        token_type: TokenType,
        header_b64: &str,
        claims_b64: &str,
        signature: &[u8],
    ) -> bool {
        let mut mac = HmacSha256::new_from_slice(self.secret_for(token_type))
            .expect("HMAC can take key of any size");
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(signature).is_ok()
    }

    fn classify_signature_failure(
        &self,
        expected: TokenType,
        header_b64: &str,
        claims_b64: &str,
        signature: &[u8],
    ) -> TokenError {
        let Ok(claims) = decode_claims(claims_b64) else {
            return TokenError::BadSignature;
        };
        if claims.token_type != expected
            && self.signature_matches(claims.token_type, header_b64, claims_b64, signature)
        {
            return TokenError::TokenTypeMismatch {
                expected,
                actual: claims.token_type,
            };
        }
        TokenError::BadSignature
    }
}

fn decode_claims(claims_b64: &str) -> Result<Claims, TokenError> {
    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::Malformed)?;
    if claims_bytes.is_empty() {
        return Err(TokenError::EmptyClaims);
    }
    serde_json::from_slice(&claims_bytes).map_err(|_| TokenError::EmptyClaims)
}
