use std::fmt;

use serde::{Deserialize, Serialize};

/// Role held by a credential. Exactly one per user.
///
/// Stored and checked as a prefixed authority (`ROLE_ADMIN`), emitted in
/// tokens and API responses by its bare name (`ADMIN`). Deserialization
/// accepts both forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN", alias = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "CLIENT", alias = "ROLE_CLIENT")]
    Client,
}

impl Role {
    /// Bare role name, as embedded in tokens.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Client => "CLIENT",
        }
    }

    /// Prefixed authority string, as stored with the credential.
    #[must_use]
    pub fn authority(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::Client => "ROLE_CLIENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn authority_is_name_with_prefix() {
        for role in [Role::Admin, Role::Client] {
            assert_eq!(role.authority(), format!("ROLE_{}", role.name()));
        }
    }

    #[test]
    fn deserializes_bare_and_prefixed_forms() {
        for (raw, role) in [
            ("\"CLIENT\"", Role::Client),
            ("\"ROLE_CLIENT\"", Role::Client),
            ("\"ADMIN\"", Role::Admin),
        ] {
            assert_eq!(serde_json::from_str::<Role>(raw).unwrap(), role);
        }
    }

    #[test]
    fn rejects_unknown_and_case_mismatch() {
        for raw in ["\"client\"", "\"ROLE_\"", "\"\""] {
            assert!(serde_json::from_str::<Role>(raw).is_err());
        }
    }

    #[test]
    fn serializes_without_prefix() {
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"CLIENT\"");
        let parsed: Role = serde_json::from_str("\"ROLE_ADMIN\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
