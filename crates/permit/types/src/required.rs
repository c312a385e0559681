use serde::{Deserialize, Serialize};

use crate::code::PermissionCode;
use crate::error::{Result, ValidationError};
use crate::mode::Mode;

/// The permissions an operation requires, and how they combine.
///
/// Always holds at least one code. Built once per guarded operation and
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequired")]
pub struct RequiredPermissions {
    codes: Vec<PermissionCode>,
    mode: Mode,
}

#[derive(Deserialize)]
struct RawRequired {
    codes: Vec<PermissionCode>,
    #[serde(default)]
    mode: Mode,
}

impl TryFrom<RawRequired> for RequiredPermissions {
    type Error = ValidationError;

    fn try_from(raw: RawRequired) -> Result<Self> {
        Self::from_codes(raw.codes, raw.mode)
    }
}

impl RequiredPermissions {
    /// Build from raw strings, validating every code.
    pub fn new<I, S>(codes: I, mode: Mode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = codes
            .into_iter()
            .map(PermissionCode::new)
            .collect::<Result<Vec<_>>>()?;
        Self::from_codes(codes, mode)
    }

    pub fn from_codes(codes: Vec<PermissionCode>, mode: Mode) -> Result<Self> {
        if codes.is_empty() {
            return Err(ValidationError::EmptyCodeList);
        }
        Ok(Self { codes, mode })
    }

    /// Build from raw strings and a textual mode (`any` / `all`, any case).
    pub fn parse<I, S>(codes: I, mode: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mode = mode.parse()?;
        Self::new(codes, mode)
    }

    /// A single required code. Mode is irrelevant for one code.
    pub fn one(code: impl Into<String>) -> Result<Self> {
        Self::new([code], Mode::Any)
    }

    pub fn any_of<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(codes, Mode::Any)
    }

    pub fn all_of<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(codes, Mode::All)
    }

    pub fn codes(&self) -> &[PermissionCode] {
        &self.codes
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.codes.len() == 1
    }

    /// Codes as plain strings, in declaration order
    pub fn code_strs(&self) -> Vec<&str> {
        self.codes.iter().map(PermissionCode::as_str).collect()
    }
}
