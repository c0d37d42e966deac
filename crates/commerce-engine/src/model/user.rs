use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Canonical user identity: the account email, trimmed and lower-cased.
///
/// Favorites, loyalty points and order history are all keyed by this value,
/// so two spellings of the same address always land on the same records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvalidUserId {
    #[error("Email must not be blank")]
    Blank,

    #[error("Not an email address: {0}")]
    Malformed(String),
}

impl UserId {
    pub fn parse(email: &str) -> Result<Self, InvalidUserId> {
        let canonical = email.trim().to_lowercase();
        if canonical.is_empty() {
            return Err(InvalidUserId::Blank);
        }
        match canonical.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !canonical.contains(char::is_whitespace) =>
            {
                Ok(Self(canonical))
            }
            _ => Err(InvalidUserId::Malformed(email.trim().to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: UserId,
    pub name: String,
}

impl Account {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes_email() {
        let a = UserId::parse("  Alice@Example.COM ").unwrap();
        let b = UserId::parse("alice@example.com").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "alice@example.com");
    }

    #[test]
    fn test_parse_rejects_non_addresses() {
        assert_eq!(UserId::parse("   "), Err(InvalidUserId::Blank));
        assert!(matches!(UserId::parse("alice"), Err(InvalidUserId::Malformed(_))));
        assert!(matches!(UserId::parse("@example.com"), Err(InvalidUserId::Malformed(_))));
        assert!(matches!(UserId::parse("a@b@c"), Err(InvalidUserId::Malformed(_))));
        assert!(matches!(UserId::parse("al ice@x.io"), Err(InvalidUserId::Malformed(_))));
    }
}
