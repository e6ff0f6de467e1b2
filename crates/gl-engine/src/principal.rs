// principal.rs — Caller identity.
//
// A Principal is the identity under which an operation runs. The engine
// never discovers identity on its own (there is no ambient "current user");
// every mutating operation receives the caller explicitly and compares it
// against the record's owner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque caller identity.
///
/// The engine treats principals as equality-comparable tokens: whatever
/// supplies them (an address, a username, a key fingerprint) is an
/// external concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principals_compare_by_value() {
        assert_eq!(Principal::new("alice"), Principal::from("alice"));
        assert_ne!(Principal::new("alice"), Principal::new("bob"));
    }

    #[test]
    fn serializes_as_a_bare_string() {
        let p = Principal::new("deployer");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"deployer\"");
        let restored: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, p);
    }
}
