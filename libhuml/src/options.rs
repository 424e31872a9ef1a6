//! Options for HUML encoding.
//!
//! ```rust
//! use libhuml::{stringify, EncodeOptions, Value};
//!
//! let options = EncodeOptions::new().with_version(true);
//! let text = stringify(&Value::from(1i64), &options);
//! assert_eq!(text, "%HUML v0.1.0\n\n1\n");
//! ```

/// Configuration for [`stringify`](crate::stringify) and
/// [`encode`](crate::encode).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Start the output with a `%HUML v0.1.0` header and a blank line.
    pub include_version: bool,
}

impl EncodeOptions {
    /// Default options: no header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the version header is written.
    #[must_use]
    pub fn with_version(mut self, include_version: bool) -> Self {
        self.include_version = include_version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        assert!(!EncodeOptions::new().include_version);
        assert!(EncodeOptions::new().with_version(true).include_version);
        assert_eq!(
            EncodeOptions::new().with_version(true).with_version(false),
            EncodeOptions::default()
        );
    }
}
