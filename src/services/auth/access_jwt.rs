use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::models::UserRecord;

/// Why a bearer token could not be turned into a username.
///
/// Callers branch on this instead of catching; every variant means "no claimed identity".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    #[error("token expired")]
    Expired,
    #[error("unsupported token: {0}")]
    Unsupported(String),
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl From<jsonwebtoken::errors::Error> for TokenDecodeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => Self::Unsupported(e.to_string()),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

/// Token-validation collaborator used by the authentication filter.
pub trait TokenValidator: Send + Sync {
    /// Decode the token and return its username (`sub`) claim.
    fn decode_username(&self, token: &str) -> Result<String, TokenDecodeError>;

    /// Whether `token` is valid for this specific user right now.
    fn is_valid_for(&self, token: &str, user: &UserRecord) -> bool;
}

#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    #[serde(default)]
    iat: Option<u64>,
}

/// HS512 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtTokenService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtTokenService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtTokenService {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // `exp` is required and checked by jsonwebtoken (with leeway)
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenDecodeError> {
        if token.trim().is_empty() {
            return Err(TokenDecodeError::InvalidArgument("token must not be empty"));
        }

        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.sub.trim().is_empty() {
            return Err(TokenDecodeError::Malformed("empty 'sub' claim".to_string()));
        }

        Ok(data.claims)
    }
}

impl TokenValidator for JwtTokenService {
    fn decode_username(&self, token: &str) -> Result<String, TokenDecodeError> {
        self.verify(token).map(|claims| claims.sub)
    }

    fn is_valid_for(&self, token: &str, user: &UserRecord) -> bool {
        let Ok(claims) = self.verify(token) else {
            return false;
        };

        if claims.sub != user.username || !user.enabled {
            return false;
        }

        // tokens issued before the last password reset are no longer valid
        match (claims.iat, user.last_password_reset) {
            (Some(iat), Some(reset)) => {
                i64::try_from(iat).is_ok_and(|iat| iat >= reset.timestamp())
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::models::Authority;

    const SECRET: &str = "test-secret-with-enough-entropy-for-hs512";

    fn mint(alg: Algorithm, secret: &str, claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn token_for(sub: &str, exp_offset: Duration) -> String {
        let now = Utc::now();
        mint(
            Algorithm::HS512,
            SECRET,
            json!({ "sub": sub, "iat": now.timestamp(), "exp": (now + exp_offset).timestamp() }),
        )
    }

    fn service() -> JwtTokenService {
        JwtTokenService::new(SECRET, 60)
    }

    fn alice() -> UserRecord {
        UserRecord::new(1, "alice", vec![Authority::new("ROLE_USER")])
    }

    #[test]
    fn decodes_username_from_valid_token() {
        let token = token_for("alice", Duration::minutes(10));
        assert_eq!(service().decode_username(&token).unwrap(), "alice");
    }

    #[test]
    fn expired_token_is_classified_as_expired() {
        let token = token_for("alice", Duration::hours(-1));
        assert_eq!(
            service().decode_username(&token),
            Err(TokenDecodeError::Expired)
        );
    }

    #[test]
    fn wrong_secret_is_classified_as_invalid_signature() {
        let exp = (Utc::now() + Duration::minutes(10)).timestamp();
        let token = mint(
            Algorithm::HS512,
            "some-other-secret",
            json!({ "sub": "alice", "exp": exp }),
        );
        assert_eq!(
            service().decode_username(&token),
            Err(TokenDecodeError::InvalidSignature)
        );
    }

    #[test]
    fn unexpected_algorithm_is_unsupported() {
        let exp = (Utc::now() + Duration::minutes(10)).timestamp();
        let token = mint(Algorithm::HS256, SECRET, json!({ "sub": "alice", "exp": exp }));
        assert!(matches!(
            service().decode_username(&token),
            Err(TokenDecodeError::Unsupported(_))
        ));
    }

    #[test]
    fn missing_exp_is_unsupported() {
        let token = mint(Algorithm::HS512, SECRET, json!({ "sub": "alice" }));
        assert!(matches!(
            service().decode_username(&token),
            Err(TokenDecodeError::Unsupported(_))
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            service().decode_username("abc"),
            Err(TokenDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn empty_subject_is_malformed() {
        let token = token_for("", Duration::minutes(10));
        assert!(matches!(
            service().decode_username(&token),
            Err(TokenDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn empty_token_is_invalid_argument() {
        assert!(matches!(
            service().decode_username(""),
            Err(TokenDecodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn valid_for_matching_enabled_user() {
        let token = token_for("alice", Duration::minutes(10));
        assert!(service().is_valid_for(&token, &alice()));
    }

    #[test]
    fn not_valid_for_another_user() {
        let token = token_for("alice", Duration::minutes(10));
        let bob = UserRecord::new(2, "bob", Vec::new());
        assert!(!service().is_valid_for(&token, &bob));
    }

    #[test]
    fn not_valid_for_disabled_user() {
        let token = token_for("alice", Duration::minutes(10));
        let mut user = alice();
        user.enabled = false;
        assert!(!service().is_valid_for(&token, &user));
    }

    #[test]
    fn not_valid_when_issued_before_password_reset() {
        let token = token_for("alice", Duration::minutes(10));
        let mut user = alice();
        user.last_password_reset = Some(Utc::now() + Duration::minutes(1));
        assert!(!service().is_valid_for(&token, &user));
    }

    #[test]
    fn out_of_range_issued_at_is_rejected_after_password_reset() {
        let exp = (Utc::now() + Duration::minutes(10)).timestamp();
        let token = mint(
            Algorithm::HS512,
            SECRET,
            json!({ "sub": "alice", "iat": u64::MAX, "exp": exp }),
        );
        let mut user = alice();
        user.last_password_reset = Some(Utc::now() - Duration::days(1));

        assert!(!service().is_valid_for(&token, &user));
    }

    #[test]
    fn undecodable_token_is_never_valid() {
        assert!(!service().is_valid_for("not.a.jwt", &alice()));
    }
}
