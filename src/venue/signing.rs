//! Request signing for venue B.
//!
//! Grounded on `original_source/kalshi_client.py`'s `_sign_request` /
//! `_get_headers`: message = `timestamp_ms || METHOD || path || body`,
//! signed with PKCS#1 v1.5 padding over a SHA-256 digest, base64-encoded.
//! The timestamp is generated fresh on every call, including retries, so a
//! retried request never reuses a stale signature.

use base64::Engine;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

const ACCESS_KEY_HEADER: &str = "ACCESS-KEY";
const ACCESS_SIGNATURE_HEADER: &str = "ACCESS-SIGNATURE";
const ACCESS_TIMESTAMP_HEADER: &str = "ACCESS-TIMESTAMP";

/// Holds the loaded signing key and static access-key identifier; one
/// instance is shared across every venue-B request.
pub struct RequestSigner {
    access_key: String,
    private_key: RsaPrivateKey,
}

/// The three headers a signed request carries, per spec.md §6.
pub struct SignedHeaders {
    pub access_key: (&'static str, String),
    pub access_signature: (&'static str, String),
    pub access_timestamp: (&'static str, String),
}

impl RequestSigner {
    /// Loads a PKCS#8 PEM-encoded RSA private key from disk.
    pub fn load(access_key: impl Into<String>, pem_path: &std::path::Path) -> Result<Self> {
        let pem = std::fs::read_to_string(pem_path)?;
        let private_key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .map_err(|e| Error::Signing(format!("invalid signing key at {pem_path:?}: {e}")))?;
        Ok(Self {
            access_key: access_key.into(),
            private_key,
        })
    }

    /// Signs one request, returning the three headers the adapter attaches.
    ///
    /// `timestamp_ms` is the caller's current-time sample — passed in
    /// rather than read here so a retry that refreshes the timestamp
    /// (spec.md §4.2) does so by calling this again with a new value.
    pub fn sign(
        &self,
        timestamp_ms: i64,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<SignedHeaders> {
        let message = format!("{timestamp_ms}{method}{path}{body}");
        let digest = Sha256::digest(message.as_bytes());
        let signature = self
            .private_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| Error::Signing(format!("failed to sign request: {e}")))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(signature);

        Ok(SignedHeaders {
            access_key: (ACCESS_KEY_HEADER, self.access_key.clone()),
            access_signature: (ACCESS_SIGNATURE_HEADER, encoded),
            access_timestamp: (ACCESS_TIMESTAMP_HEADER, timestamp_ms.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::EncodePrivateKey;

    fn test_signer() -> RequestSigner {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        RequestSigner {
            access_key: "test-key".into(),
            private_key,
        }
    }

    #[test]
    fn signing_is_deterministic_for_the_same_timestamp() {
        let signer = test_signer();
        let a = signer.sign(1_700_000_000_000, "GET", "/markets", "").unwrap();
        let b = signer.sign(1_700_000_000_000, "GET", "/markets", "").unwrap();
        assert_eq!(a.access_signature.1, b.access_signature.1);
    }

    #[test]
    fn different_timestamps_change_the_signature() {
        let signer = test_signer();
        let a = signer.sign(1_700_000_000_000, "GET", "/markets", "").unwrap();
        let b = signer.sign(1_700_000_000_001, "GET", "/markets", "").unwrap();
        assert_ne!(a.access_signature.1, b.access_signature.1);
    }

    #[test]
    fn headers_carry_the_expected_names() {
        let signer = test_signer();
        let headers = signer.sign(1_700_000_000_000, "GET", "/markets", "").unwrap();
        assert_eq!(headers.access_key.0, "ACCESS-KEY");
        assert_eq!(headers.access_signature.0, "ACCESS-SIGNATURE");
        assert_eq!(headers.access_timestamp.0, "ACCESS-TIMESTAMP");
        assert_eq!(headers.access_timestamp.1, "1700000000000");
    }

    #[test]
    fn rejects_a_malformed_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pem");
        std::fs::write(&path, "not a key").unwrap();
        let err = RequestSigner::load("k", &path).unwrap_err();
        assert!(matches!(err, Error::Signing(_)));
    }

    #[test]
    fn loads_a_real_pkcs8_key_from_disk() {
        let mut rng = rand::thread_rng();
        let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let pem = key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap()
            .to_string();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pem");
        std::fs::write(&path, pem).unwrap();
        assert!(RequestSigner::load("k", &path).is_ok());
    }
}
