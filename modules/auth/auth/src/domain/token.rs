//! Bearer token issuance and validation.
//!
//! Tokens are compact HS256 JWS strings carrying `sub`, `role`, `iat` and
//! `exp`. A token is valid iff its signature verifies against the configured
//! secret and the current time is strictly before `exp`. There is no leeway.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use parkapi_security::{Principal, Role};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::clock::Clock;
use crate::config::JwtConfig;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Wire claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Claims of a token that passed signature and expiry checks.
///
/// The only way to read a token's subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClaims {
    subject: String,
    role: Role,
    issued_at: OffsetDateTime,
    expires_at: OffsetDateTime,
}

impl ValidatedClaims {
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn issued_at(&self) -> OffsetDateTime {
        self.issued_at
    }

    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }

    #[must_use]
    pub fn into_principal(self) -> Principal {
        Principal::new(self.subject, self.role)
    }
}

/// An issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtToken {
    token: String,
}

impl JwtToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token expired at {expires_at}")]
    Expired { expires_at: OffsetDateTime },

    #[error("failed to encode token: {0}")]
    Encoding(String),

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: time::Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Derive the signing keys from the configured secret.
    #[must_use]
    pub fn new(cfg: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = cfg.secret.expose_secret().as_bytes();

        // Expiry is checked against the injected clock in `verify`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime: cfg.lifetime(),
            clock,
        }
    }

    #[must_use]
    pub fn lifetime(&self) -> time::Duration {
        self.lifetime
    }

    /// Sign a token for `subject` expiring one lifetime from now.
    ///
    /// # Errors
    ///
    /// - `ExpiryOutOfRange` if now plus the lifetime is not a representable date
    /// - `Encoding` if signing fails
    pub fn issue(&self, subject: &str, role: Role) -> Result<JwtToken, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add(self.lifetime)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = JwtClaims {
            sub: subject.to_owned(),
            role,
            iat: issued_at.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        tracing::debug!(subject, %role, exp = claims.exp, "Issued bearer token");
        Ok(JwtToken { token })
    }

    /// Check signature and expiry. An optional `Bearer ` prefix is stripped.
    ///
    /// # Errors
    ///
    /// - `BadSignature` if the token was not signed with this secret
    /// - `Expired` if the current time is at or past `exp`
    /// - `Malformed` for anything that is not a well-formed token
    pub fn verify(&self, raw: &str) -> Result<ValidatedClaims, TokenError> {
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(TokenError::Malformed("empty token".to_owned()));
        }

        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            },
        )?;
        let claims = data.claims;

        let expires_at = timestamp(claims.exp)?;
        if self.clock.now().unix_timestamp() >= claims.exp {
            return Err(TokenError::Expired { expires_at });
        }

        Ok(ValidatedClaims {
            subject: claims.sub,
            role: claims.role,
            issued_at: timestamp(claims.iat)?,
            expires_at,
        })
    }

    /// Like [`verify`](Self::verify) but collapses every failure to `None`.
    ///
    /// The failure is logged here and goes no further.
    #[must_use]
    pub fn decode(&self, raw: &str) -> Option<ValidatedClaims> {
        match self.verify(raw) {
            Ok(claims) => Some(claims),
            Err(err) => {
                tracing::debug!(error = %err, "Rejected bearer token");
                None
            }
        }
    }

    #[must_use]
    pub fn is_valid(&self, raw: &str) -> bool {
        self.decode(raw).is_some()
    }
}

fn timestamp(secs: i64) -> Result<OffsetDateTime, TokenError> {
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| TokenError::Malformed(format!("timestamp out of range: {e}")))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use secrecy::SecretString;

    const SECRET: &str = "unit-test-secret-with-at-least-32-bytes!";
    const ISSUED_AT: i64 = 1_700_000_000;

    fn codec_with(secret: &str) -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            OffsetDateTime::from_unix_timestamp(ISSUED_AT).unwrap(),
        ));
        let cfg = JwtConfig {
            secret: SecretString::from(secret.to_owned()),
            ..JwtConfig::default()
        };
        (TokenCodec::new(&cfg, clock.clone()), clock)
    }

    #[test]
    fn issued_token_decodes_to_subject_and_role() {
        let (codec, _clock) = codec_with(SECRET);
        let token = codec.issue("tody@email.com", Role::Client).unwrap();

        let claims = codec.decode(token.as_str()).unwrap();
        assert_eq!(claims.subject(), "tody@email.com");
        assert_eq!(claims.role(), Role::Client);
        assert_eq!(claims.issued_at().unix_timestamp(), ISSUED_AT);
        assert_eq!(claims.expires_at().unix_timestamp(), ISSUED_AT + 120);
    }

    #[test]
    fn issue_fails_when_expiry_overflows() {
        let clock = Arc::new(ManualClock::new(
            OffsetDateTime::from_unix_timestamp(ISSUED_AT).unwrap(),
        ));
        let cfg = JwtConfig {
            secret: SecretString::from(SECRET.to_owned()),
            expire_days: 4_000_000,
            ..JwtConfig::default()
        };
        let codec = TokenCodec::new(&cfg, clock);

        assert_eq!(
            codec.issue("tody@email.com", Role::Client),
            Err(TokenError::ExpiryOutOfRange)
        );
    }

    #[test]
    fn bearer_prefix_is_optional() {
        let (codec, _clock) = codec_with(SECRET);
        let token = codec.issue("tody@email.com", Role::Admin).unwrap();

        assert!(codec.is_valid(token.as_str()));
        assert!(codec.is_valid(&format!("Bearer {}", token.as_str())));
    }

    #[test]
    fn payload_carries_bare_role_name() {
        let (codec, _clock) = codec_with(SECRET);
        let token = codec.issue("tody@email.com", Role::Client).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<serde_json::Value>(
            token.as_str(),
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();
        assert_eq!(data.claims["role"], "CLIENT");
        assert_eq!(data.claims["sub"], "tody@email.com");
        assert_eq!(data.header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn expiry_boundary_has_no_leeway() {
        let (codec, clock) = codec_with(SECRET);
        let token = codec.issue("tody@email.com", Role::Client).unwrap();

        clock.advance(time::Duration::seconds(119));
        assert!(codec.is_valid(token.as_str()));

        clock.advance(time::Duration::seconds(1));
        assert!(matches!(
            codec.verify(token.as_str()),
            Err(TokenError::Expired { .. })
        ));

        clock.advance(time::Duration::seconds(1));
        assert!(!codec.is_valid(token.as_str()));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (issuer, _c1) = codec_with("another-secret-that-is-also-32-bytes-long");
        let (codec, _c2) = codec_with(SECRET);
        let token = issuer.issue("tody@email.com", Role::Admin).unwrap();

        assert_eq!(codec.verify(token.as_str()), Err(TokenError::BadSignature));
        assert!(codec.decode(token.as_str()).is_none());
    }

    #[test]
    fn garbage_input_is_invalid_without_panicking() {
        let (codec, _clock) = codec_with(SECRET);

        for raw in ["", "Bearer ", "Bearer", "not-a-token", "a.b.c", "....", "Bearer x.y"] {
            assert!(!codec.is_valid(raw), "{raw:?} should be invalid");
        }
        assert!(matches!(codec.verify(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn tampered_payload_fails_signature() {
        let (codec, _clock) = codec_with(SECRET);
        let token = codec.issue("tody@email.com", Role::Client).unwrap();
        let admin = codec.issue("tody@email.com", Role::Admin).unwrap();

        // Splice the admin payload onto the client signature.
        let client_parts: Vec<&str> = token.as_str().split('.').collect();
        let admin_parts: Vec<&str> = admin.as_str().split('.').collect();
        let forged = format!("{}.{}.{}", client_parts[0], admin_parts[1], client_parts[2]);

        assert_eq!(codec.verify(&forged), Err(TokenError::BadSignature));
    }
}
