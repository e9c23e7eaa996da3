// src/gedcom/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cross-reference identifier, held without its surrounding `@` delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Xref(String);

impl Xref {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a pointer value such as `@I12@`.
    #[must_use]
    pub fn from_pointer(value: &str) -> Option<Self> {
        let inner = value.trim().strip_prefix('@')?.strip_suffix('@')?;
        if inner.is_empty() || inner.contains('@') || inner.contains(char::is_whitespace) {
            return None;
        }
        Some(Self(inner.to_string()))
    }

    /// Numeric part of identifiers shaped like `I42` for the given prefix.
    #[must_use]
    pub fn sequence(&self, prefix: char) -> Option<u64> {
        self.0.strip_prefix(prefix)?.parse().ok()
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}@", self.0)
    }
}

/// One logical GEDCOM line: `level [@xref@] TAG [value]`, with `CONT`/`CONC`
/// continuations already folded into `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based physical line the record starts on.
    pub line: usize,
    pub level: usize,
    pub xref: Option<Xref>,
    pub tag: String,
    pub value: Option<String>,
}

impl Record {
    #[must_use]
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// The value interpreted as a pointer, when it has pointer syntax.
    #[must_use]
    pub fn pointer(&self) -> Option<Xref> {
        self.value.as_deref().and_then(Xref::from_pointer)
    }

    #[must_use]
    pub fn is(&self, level: usize, tag: &str) -> bool {
        self.level == level && self.tag == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_syntax() {
        assert_eq!(Xref::from_pointer("@I1@"), Some(Xref::new("I1")));
        assert_eq!(Xref::from_pointer(" @F003@ "), Some(Xref::new("F003")));
        assert_eq!(Xref::from_pointer("@@"), None);
        assert_eq!(Xref::from_pointer("I1"), None);
        assert_eq!(Xref::from_pointer("@I 1@"), None);
    }

    #[test]
    fn test_sequence() {
        assert_eq!(Xref::new("I0042").sequence('I'), Some(42));
        assert_eq!(Xref::new("F7").sequence('I'), None);
        assert_eq!(Xref::new("SUBM1").sequence('I'), None);
    }

    #[test]
    fn test_display_wraps_in_delimiters() {
        assert_eq!(Xref::new("I1").to_string(), "@I1@");
    }
}
