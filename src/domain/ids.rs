//! Domain identifier types with validation
//!
//! Newtype wrappers for directory identifiers. Each type rejects blank values
//! so an empty scope can never reach a directory search.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organizational scope searched for accounts
///
/// Holds the distinguished name of an organizational unit, e.g.
/// `OU=Users,OU=BEL,DC=contoso,DC=net`.
///
/// # Examples
///
/// ```
/// use roster::domain::ids::Scope;
/// use std::str::FromStr;
///
/// let scope = Scope::from_str("OU=Users,DC=contoso,DC=net").unwrap();
/// assert_eq!(scope.as_str(), "OU=Users,DC=contoso,DC=net");
/// assert!(Scope::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope(String);

impl Scope {
    /// Creates a new Scope, trimming surrounding whitespace
    pub fn new(dn: impl Into<String>) -> Result<Self, String> {
        let dn = dn.into();
        let trimmed = dn.trim();
        if trimmed.is_empty() {
            return Err("Scope cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the scope as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `dn` lives in this scope (the scope itself or any descendant)
    ///
    /// Distinguished names compare case-insensitively.
    pub fn contains(&self, dn: &str) -> bool {
        let dn = dn.to_lowercase();
        let scope = self.0.to_lowercase();
        dn == scope || dn.ends_with(&format!(",{scope}"))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_trims_whitespace() {
        let scope = Scope::new("  OU=Users,DC=contoso,DC=net ").unwrap();
        assert_eq!(scope.as_str(), "OU=Users,DC=contoso,DC=net");
    }

    #[test]
    fn test_scope_rejects_empty() {
        assert!(Scope::new("").is_err());
        assert!(Scope::from_str("\t").is_err());
    }

    #[test]
    fn test_scope_contains_descendants() {
        let scope = Scope::new("OU=BEL,DC=contoso,DC=net").unwrap();
        assert!(scope.contains("CN=Jane Doe,OU=Users,OU=BEL,DC=contoso,DC=net"));
        assert!(scope.contains("cn=john,ou=bel,dc=CONTOSO,dc=net"));
        assert!(scope.contains("OU=BEL,DC=contoso,DC=net"));
        assert!(!scope.contains("CN=Jane Doe,OU=FRA,DC=contoso,DC=net"));
        assert!(!scope.contains("CN=Jane Doe,OU=XBEL,DC=contoso,DC=net"));
    }

    #[test]
    fn test_scope_serde_rejects_blank() {
        let ok: Scope = serde_json::from_str("\"OU=A,DC=x\"").unwrap();
        assert_eq!(ok.as_str(), "OU=A,DC=x");
        assert!(serde_json::from_str::<Scope>("\"\"").is_err());
    }
}
