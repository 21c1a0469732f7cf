use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; the encoder still
            /// rejects values that would break the line format.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                static PATTERN: once_cell::sync::Lazy<Regex> = once_cell::sync::Lazy::new(|| {
                    Regex::new($pattern).expect("static identifier pattern")
                });
                let s = value.into();
                if !PATTERN.is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Borrows the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    SubjectId,
    "Identifier of the acknowledged subject (document version owner). Printable, no line breaks.",
    r"^[^\r\n]{1,256}$"
);
newtype!(
    SignerId,
    "Stable identifier of the authenticated signer. Printable, no line breaks.",
    r"^[^\r\n]{1,256}$"
);
newtype!(
    Nonce,
    "Anti-replay nonce, base64url without padding (`[A-Za-z0-9_-]{16,128}`).",
    r"^[A-Za-z0-9_-]{16,128}$"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_rejects_line_breaks() {
        assert!(SubjectId::parse("doc-1").is_ok());
        assert!(SubjectId::parse("doc-1\nsigner_id=mallory").is_err());
        assert!(SubjectId::parse("").is_err());
    }

    #[test]
    fn nonce_requires_url_safe_alphabet() {
        assert!(Nonce::parse("AAAAAAAAAAAAAAAAAAAAAA").is_ok());
        assert!(Nonce::parse("short").is_err());
        assert!(Nonce::parse("has+plus/and=padding==").is_err());
    }
}
