//! Configuration for the auth core.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Signing secret used when none is configured. Only fit for local development.
pub const DEV_JWT_SECRET: &str = "parkapi-development-secret-change-me-0123456789";

/// Minimum accepted length of the signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Longest accepted token lifetime, in days.
pub const MAX_LIFETIME_DAYS: i64 = 365;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("auth.jwt.secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    SecretTooShort(usize),

    #[error("token lifetime must be greater than zero")]
    ZeroLifetime,

    #[error("token lifetime must not exceed {MAX_LIFETIME_DAYS} days")]
    LifetimeTooLong,

    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),
}

/// Auth section of the application configuration (`auth:`).
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl AuthConfig {
    /// Check the whole section before anything is built from it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.password.validate()
    }
}

/// Token signing and lifetime.
///
/// The lifetime is the sum of `expire_days`, `expire_hours` and
/// `expire_minutes`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct JwtConfig {
    #[serde(
        deserialize_with = "deserialize_secret",
        serialize_with = "serialize_redacted"
    )]
    pub secret: SecretString,
    pub expire_days: u32,
    pub expire_hours: u32,
    pub expire_minutes: u32,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::from(DEV_JWT_SECRET.to_owned()),
            expire_days: 0,
            expire_hours: 0,
            expire_minutes: 2,
        }
    }
}

impl JwtConfig {
    #[must_use]
    pub fn lifetime(&self) -> time::Duration {
        time::Duration::days(i64::from(self.expire_days))
            + time::Duration::hours(i64::from(self.expire_hours))
            + time::Duration::minutes(i64::from(self.expire_minutes))
    }

    #[must_use]
    pub fn uses_dev_secret(&self) -> bool {
        self.secret.expose_secret() == DEV_JWT_SECRET
    }

    /// # Errors
    ///
    /// - `SecretTooShort` if the secret has fewer than [`MIN_SECRET_LEN`] bytes
    /// - `ZeroLifetime` if all lifetime components are zero
    /// - `LifetimeTooLong` if the lifetime exceeds [`MAX_LIFETIME_DAYS`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.secret.expose_secret().len();
        if len < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort(len));
        }
        if self.lifetime() <= time::Duration::ZERO {
            return Err(ConfigError::ZeroLifetime);
        }
        if self.lifetime() > time::Duration::days(MAX_LIFETIME_DAYS) {
            return Err(ConfigError::LifetimeTooLong);
        }
        if self.uses_dev_secret() {
            tracing::warn!(
                "auth.jwt.secret is not configured; using the built-in development secret"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordConfig {
    /// # Errors
    ///
    /// Returns `InvalidBcryptCost` when the cost is outside what bcrypt accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (4..=31).contains(&self.bcrypt_cost) {
            Ok(())
        } else {
            Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost))
        }
    }
}

/// Read a scalar into a [`SecretString`].
///
/// Environment providers type all-digit values as numbers, so numbers and
/// booleans are accepted and kept in their textual form.
///
/// # Errors
///
/// Fails when the value is not a scalar.
pub fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(SecretVisitor)
}

struct SecretVisitor;

impl Visitor<'_> for SecretVisitor {
    type Value = SecretString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(SecretString::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(SecretString::from(v.to_string()))
    }
}

/// Write a fixed placeholder in place of the secret.
///
/// # Errors
///
/// Propagates the serializer's error.
pub fn serialize_redacted<S>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str("[REDACTED]")
}
