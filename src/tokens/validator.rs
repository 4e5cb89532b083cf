//! Token validation: signature and expiry first, revocation second.

use std::sync::Arc;

use crate::store::RevocationStore;

use super::claims::{Claims, TokenType};
use super::codec::{TokenCodec, TokenError};

/// Validates tokens against the codec and the revocation store.
///
/// Holds no mutable state; safe to call concurrently from every request
/// handler. The revocation lookup runs only after the token has proven
/// structurally valid, so a forgery never observes session state.
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    store: Arc<dyn RevocationStore>,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<dyn RevocationStore>) -> Self {
        Self { codec, store }
    }

    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = self.codec.verify(token, expected)?;

        let revoked = self
            .store
            .is_revoked(&claims.session_id)
            .map_err(|e| TokenError::Store(e.to_string()))?;
        if revoked {
            tracing::debug!(
                session_id = %claims.session_id,
                user_id = claims.user_id,
                "Rejected token for revoked session"
            );
            return Err(TokenError::SessionRevoked);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRevocationStore;
    use crate::testutil::{test_codec, test_token_config};
    use crate::tokens::TokenIssuer;

    fn setup() -> (TokenIssuer, TokenValidator, Arc<MemoryRevocationStore>) {
        let codec = test_codec();
        let store = Arc::new(MemoryRevocationStore::new());
        let issuer = TokenIssuer::new(Arc::clone(&codec), &test_token_config());
        let validator = TokenValidator::new(codec, Arc::clone(&store) as Arc<dyn RevocationStore>);
        (issuer, validator, store)
    }

    #[test]
    fn test_valid_token_passes() {
        let (issuer, validator, _store) = setup();
        let pair = issuer.issue_token_pair(11).unwrap();

        let claims = validator
            .validate(&pair.access_token, TokenType::Access)
            .unwrap();
        assert_eq!(claims.user_id, 11);
        assert_eq!(claims.session_id, pair.session_id);
    }

    #[test]
    fn test_revocation_precedence() {
        let (issuer, validator, store) = setup();
        let pair = issuer.issue_token_pair(11).unwrap();

        // Structurally valid and nowhere near expiry.
        validator
            .validate(&pair.access_token, TokenType::Access)
            .unwrap();

        store.revoke(&pair.session_id, 86_400).unwrap();

        assert_eq!(
            validator
                .validate(&pair.access_token, TokenType::Access)
                .unwrap_err(),
            TokenError::SessionRevoked
        );
        // The refresh token dies with the session too.
        assert_eq!(
            validator
                .validate(&pair.refresh_token, TokenType::Refresh)
                .unwrap_err(),
            TokenError::SessionRevoked
        );
    }

    #[test]
    fn test_structural_failure_skips_store() {
        let (_issuer, validator, store) = setup();
        store.revoke("some-session", 86_400).unwrap();

        // A malformed token reports Malformed, never SessionRevoked.
        assert_eq!(
            validator.validate("a.b.c", TokenType::Access).unwrap_err(),
            TokenError::Malformed
        );
    }
}
