//! Secure credential handling using the secrecy crate
//!
//! Connection strings and the translator subscription key are held in
//! [`SecretString`] values: memory is zeroed on drop, Debug output is
//! redacted, and access requires an explicit `expose_secret()` call, so a
//! stray log line cannot leak a password.
//!
//! # Example
//!
//! ```rust
//! use castor::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("my-subscription-key".to_string());
//!
//! // Debug output is redacted
//! assert!(!format!("{key:?}").contains("my-subscription-key"));
//!
//! // Access the value only where it is needed
//! assert!(!key.expose_secret().is_empty());
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// A string secret: zeroed on drop, redacted in Debug, explicit access
/// through `expose_secret()`.
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`].
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}

/// String newtype carrying the marker traits `Secret` requires.
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

/// Read-only string operations, so callers can validate and redact without
/// copying the secret out of its wrapper.
impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Scheme check for connection strings; does not expose the
    /// credentials portion.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    pub fn split(&self, delimiter: char) -> std::str::Split<'_, char> {
        self.0.split(delimiter)
    }

    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_round_trip_through_expose() {
        let secret = secret_string("test-password".to_string());
        assert_eq!(secret.expose_secret().as_ref(), "test-password");
    }

    #[test]
    fn test_debug_never_prints_the_value() {
        let secret = secret_string("sensitive-data".to_string());
        assert!(!format!("{secret:?}").contains("sensitive-data"));
    }

    #[test]
    fn test_validation_helpers_work_in_place() {
        let secret = secret_string("postgresql://u:p@localhost/db".to_string());
        let value = secret.expose_secret();

        assert!(!value.is_empty());
        assert!(value.starts_with("postgresql://"));
        assert_eq!(value.split('@').count(), 2);
    }

    #[test]
    fn test_serde_preserves_the_inner_string() {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize)]
        struct Carrier {
            password: SecretString,
        }

        let json = serde_json::to_string(&Carrier {
            password: secret_string("test123".to_string()),
        })
        .unwrap();
        assert!(json.contains("test123"));

        let back: Carrier = serde_json::from_str(&json).unwrap();
        assert_eq!(back.password.expose_secret().as_ref(), "test123");
    }
}
