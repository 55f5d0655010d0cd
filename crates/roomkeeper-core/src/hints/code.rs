use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized hint code: trimmed and upper-cased.
///
/// Construct through [`HintCode::parse`]; two codes that differ only in case
/// or surrounding whitespace are the same code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HintCode(String);

impl HintCode {
    /// Normalize `raw`. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HintCode {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| "hint code must not be blank".to_string())
    }
}

impl From<HintCode> for String {
    fn from(code: HintCode) -> Self {
        code.0
    }
}

/// A single hint as shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    pub title: String,
    /// Free text; newlines are significant.
    pub body: String,
}

impl HintRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
