use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// A permission code such as `user_view` or `article_edit`.
///
/// Codes are compared by exact, case-sensitive equality. The value is kept
/// exactly as given; only codes that are empty after trimming are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PermissionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PermissionCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PermissionCode> for String {
    fn from(code: PermissionCode) -> Self {
        code.0
    }
}

impl AsRef<str> for PermissionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PermissionCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_codes() {
        assert_eq!(PermissionCode::new(""), Err(ValidationError::EmptyCode));
        assert_eq!(PermissionCode::new("   "), Err(ValidationError::EmptyCode));
    }

    #[test]
    fn keeps_code_verbatim() {
        let code = PermissionCode::new("User_View").unwrap();
        assert_eq!(code.as_str(), "User_View");
        assert_ne!(code, PermissionCode::new("user_view").unwrap());
    }

    #[test]
    fn deserialize_validates() {
        let ok: PermissionCode = serde_json::from_str("\"user_view\"").unwrap();
        assert_eq!(ok.as_str(), "user_view");
        assert!(serde_json::from_str::<PermissionCode>("\"  \"").is_err());
    }
}
