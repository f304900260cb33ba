//! CDP `ed25519v1` request signing.
//!
//! Every request carries two headers: `x-altus-date` (RFC 1123 timestamp)
//! and `x-altus-auth`. The auth header is the URL-safe base64 of a small
//! JSON metadata object (access key ID plus auth method), a dot, and the
//! URL-safe base64 Ed25519 signature over
//! `method\ncontent-type\ndate\npath\ned25519v1`.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signer as _, SigningKey};

use crate::error::Error;

use super::Credentials;

/// Auth method identifier recognized by the control plane.
const AUTH_METHOD: &str = "ed25519v1";

/// Header carrying the request timestamp.
pub(crate) const DATE_HEADER: &str = "x-altus-date";
/// Header carrying the signature.
pub(crate) const AUTH_HEADER: &str = "x-altus-auth";

/// Signed header values for one request.
pub(crate) struct SignedHeaders {
    pub date: String,
    pub auth: String,
}

/// Signs control plane requests with the resolved credentials.
pub(crate) struct RequestSigner {
    credentials: Credentials,
    signing_key: SigningKey,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("credentials", &self.credentials)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl RequestSigner {
    /// Builds a signer, decoding the private key once up front.
    ///
    /// A key that does not decode to an Ed25519 seed is a configuration
    /// error, surfaced before any network call.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        let signing_key = decode_seed(credentials.private_key())?;
        Ok(Self {
            credentials,
            signing_key,
        })
    }

    /// Returns the access key these requests are signed as.
    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// Signs one request.
    pub fn sign(&self, method: &str, content_type: &str, path: &str) -> SignedHeaders {
        self.sign_at(method, content_type, path, Utc::now())
    }

    /// Signing with an injectable clock, for tests.
    fn sign_at(
        &self,
        method: &str,
        content_type: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> SignedHeaders {
        let date = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}\n{}",
            method, content_type, date, path, AUTH_METHOD
        );
        let signature = self.signing_key.sign(string_to_sign.as_bytes());
        let signature_b64 = URL_SAFE.encode(signature.to_bytes());

        let metadata = serde_json::json!({
            "access_key_id": self.credentials.access_key(),
            "auth_method": AUTH_METHOD,
        });
        let metadata_b64 = URL_SAFE.encode(metadata.to_string());

        SignedHeaders {
            date,
            auth: format!("{}.{}", metadata_b64, signature_b64),
        }
    }
}

/// Decodes the base64 private key into an Ed25519 signing key.
///
/// The CDP console hands out the 32-byte seed; some tooling exports the
/// 64-byte seed-plus-public form, whose first half is the seed.
fn decode_seed(private_key: &str) -> Result<SigningKey, Error> {
    let cleaned: String = private_key
        .replace("\\n", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| Error::configuration(format!("private_key is not valid base64: {}", e)))?;

    let mut seed = [0u8; 32];
    match bytes.len() {
        32 | 64 => seed.copy_from_slice(&bytes[..32]),
        n => {
            return Err(Error::configuration(format!(
                "private_key decodes to {} bytes, expected an Ed25519 seed (32 or 64)",
                n
            )))
        }
    }

    Ok(SigningKey::from_bytes(&seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};

    fn test_credentials() -> Credentials {
        // Fixed 32-byte seed, base64-encoded
        let seed = [7u8; 32];
        Credentials::new("test_access_key", STANDARD.encode(seed))
    }

    #[test]
    fn test_signer_rejects_bad_base64() {
        let err = RequestSigner::new(Credentials::new("ak", "!!not-base64!!")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_signer_rejects_wrong_length() {
        let err =
            RequestSigner::new(Credentials::new("ak", STANDARD.encode([1u8; 16]))).unwrap_err();
        assert!(err.to_string().contains("16 bytes"));
    }

    #[test]
    fn test_accepts_64_byte_form() {
        let seed = [9u8; 32];
        let key = SigningKey::from_bytes(&seed);
        let mut long = seed.to_vec();
        long.extend_from_slice(key.verifying_key().as_bytes());
        assert!(RequestSigner::new(Credentials::new("ak", STANDARD.encode(long))).is_ok());
    }

    #[test]
    fn test_accepts_escaped_newlines() {
        let encoded = STANDARD.encode([7u8; 32]);
        let wrapped = format!("{}\\n{}", &encoded[..10], &encoded[10..]);
        assert!(RequestSigner::new(Credentials::new("ak", wrapped)).is_ok());
    }

    #[test]
    fn test_signature_verifies() {
        let signer = RequestSigner::new(test_credentials()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let headers = signer.sign_at("POST", "application/json", "/iam/listGroups", now);

        assert_eq!(headers.date, "Wed, 01 May 2024 12:00:00 GMT");

        let (meta_b64, sig_b64) = headers.auth.split_once('.').unwrap();
        let meta: serde_json::Value =
            serde_json::from_slice(&URL_SAFE.decode(meta_b64).unwrap()).unwrap();
        assert_eq!(meta["access_key_id"], "test_access_key");
        assert_eq!(meta["auth_method"], "ed25519v1");

        let sig_bytes: [u8; 64] = URL_SAFE.decode(sig_b64).unwrap().try_into().unwrap();
        let verifying = VerifyingKey::from(&SigningKey::from_bytes(&[7u8; 32]));
        let string_to_sign = format!(
            "POST\napplication/json\n{}\n/iam/listGroups\ned25519v1",
            headers.date
        );
        verifying
            .verify(string_to_sign.as_bytes(), &Signature::from_bytes(&sig_bytes))
            .unwrap();
    }

    #[test]
    fn test_signature_is_deterministic_per_instant() {
        let signer = RequestSigner::new(test_credentials()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let a = signer.sign_at("POST", "application/json", "/iam/getAccount", now);
        let b = signer.sign_at("POST", "application/json", "/iam/getAccount", now);
        assert_eq!(a.auth, b.auth);
    }
}
