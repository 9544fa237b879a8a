//! Account identifier type with `acct_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected identifier strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier {value:?} must start with {prefix:?}")]
    MissingPrefix { value: String, prefix: &'static str },

    #[error("identifier must not be empty")]
    Empty,
}

/// A ledger account, always prefixed with `acct_`.
///
/// The bare prefix (`acct_`) is the null account: it can never hold a balance
/// and is rejected as a mint or transfer recipient.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// The standard prefix for all account identifiers.
    pub const PREFIX: &'static str = "acct_";

    /// Create a new account id from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `acct_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "account id must start with acct_");
        Self(s)
    }

    /// Fallible constructor for untrusted input (config files, command logs).
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let s = raw.into();
        if !s.starts_with(Self::PREFIX) {
            return Err(IdError::MissingPrefix {
                value: s,
                prefix: Self::PREFIX,
            });
        }
        Ok(Self(s))
    }

    /// The null account.
    pub fn null() -> Self {
        Self(Self::PREFIX.to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0 == Self::PREFIX
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_account_is_bare_prefix() {
        let null = AccountId::null();
        assert!(null.is_null());
        assert!(!AccountId::new("acct_alice").is_null());
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = AccountId::parse("alice").unwrap_err();
        assert!(matches!(err, IdError::MissingPrefix { .. }));
    }

    #[test]
    fn deserialize_validates_prefix() {
        let ok: AccountId = serde_json::from_str("\"acct_bob\"").unwrap();
        assert_eq!(ok.as_str(), "acct_bob");
        assert!(serde_json::from_str::<AccountId>("\"bob\"").is_err());
    }
}
