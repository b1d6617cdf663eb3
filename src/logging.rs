//! Log redaction helpers
//!
//! Keeps API keys out of log lines and `savvy config show` output.

use std::fmt;

/// API key shown as its first 8 characters followed by `***`
#[derive(Clone, Debug)]
pub struct SensitiveApiKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveApiKey<'a> {
    /// ```
    /// use savvy_it::logging::SensitiveApiKey;
    ///
    /// let key = "AIzaSyD-example-key-1234";
    /// assert_eq!(SensitiveApiKey::new(key).to_string(), "AIzaSyD-***");
    /// ```
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl fmt::Display for SensitiveApiKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.inner.chars().take(8).collect();
        if self.inner.chars().count() <= 8 {
            write!(f, "***")
        } else {
            write!(f, "{}***", visible)
        }
    }
}

/// Mask any non-empty configured secret, whatever its shape
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        SensitiveApiKey::new(value).to_string()
    }
}
