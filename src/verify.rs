//! Authenticity check for inbound interaction webhooks.
//!
//! Discord signs every interaction with the application's ed25519 key over `timestamp + body`.
//! Requests that fail this check must be rejected before anything looks at the body.

use crate::error::AuthError;
use anyhow::{anyhow, Result};
use serenity::interactions_endpoint::Verifier;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

pub struct SignatureVerifier {
    /// `None` when no public key is configured; every request is then rejected.
    verifier: Option<Verifier>,
}

impl SignatureVerifier {
    /// Build a verifier from the hex encoded public key in the application's dashboard.
    ///
    /// A key that is present but malformed is a configuration error and is reported at startup
    /// rather than on every request.
    pub fn new(public_key: Option<&str>) -> Result<Self> {
        let verifier = match public_key {
            Some(key) => {
                let bytes: [u8; 32] = hex::decode(key.trim())
                    .map_err(|e| anyhow!("Public key is not valid hex: {}", e))?
                    .try_into()
                    .map_err(|b: Vec<u8>| {
                        anyhow!("Public key must be 32 bytes, got {}", b.len())
                    })?;
                Some(Verifier::try_new(bytes).map_err(|e| anyhow!("{}", e))?)
            }
            None => None,
        };

        Ok(Self { verifier })
    }

    pub fn verify(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> Result<(), AuthError> {
        let (Some(verifier), Some(signature), Some(timestamp)) =
            (&self.verifier, signature, timestamp)
        else {
            return Err(AuthError::MissingCredentials);
        };

        verifier
            .verify(signature, timestamp, body)
            .map_err(|()| AuthError::BadSignature)
    }
}
