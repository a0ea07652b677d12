//! Secret Strings
//!
//! Wrapper for sensitive text (decrypted API keys) that is zeroized on
//! drop and never printed.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sensitive string with automatic memory zeroization
///
/// ## Security Features
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::secret::SecretString;
///
/// let key = SecretString::new("pkey_test_123".to_string());
/// assert_eq!(key.expose(), "pkey_test_123");
/// assert_eq!(format!("{key:?}"), "SecretString(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Borrow the secret value
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString")
            .field(&"[REDACTED]")
            .finish()
    }
}
