//! Resolved credential material.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A resolved CDP access key / private key pair.
///
/// Produced once per invocation by [`CredentialSource::resolve`] (or
/// constructed directly when the caller already holds the pair) and immutable
/// thereafter. The private key is the base64-encoded Ed25519 seed issued by
/// the CDP console; it is zeroized when the credentials are dropped and never
/// printed by `Debug`.
///
/// ## Example
///
/// ```rust
/// use cdp_control::Credentials;
///
/// let creds = Credentials::new("altus_access_key", "bm90LWEtcmVhbC1rZXk=");
/// assert_eq!(creds.access_key(), "altus_access_key");
/// assert!(!format!("{:?}", creds).contains("bm90"));
/// ```
///
/// [`CredentialSource::resolve`]: crate::CredentialSource::resolve
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    private_key: PrivateKey,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct PrivateKey(String);

impl Credentials {
    /// Creates credentials from an access key and a base64 private key.
    pub fn new(access_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            private_key: PrivateKey(private_key.into()),
        }
    }

    /// Returns the access key ID.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Returns the base64-encoded private key.
    pub(crate) fn private_key(&self) -> &str {
        &self.private_key.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let creds = Credentials::new("ak", "cGs=");
        assert_eq!(creds.access_key(), "ak");
        assert_eq!(creds.private_key(), "cGs=");
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let creds = Credentials::new("visible_key", "secret_material");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("visible_key"));
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret_material"));
    }

    #[test]
    fn test_clone() {
        let creds = Credentials::new("ak", "cGs=");
        let cloned = creds.clone();
        assert_eq!(cloned.access_key(), "ak");
    }
}
