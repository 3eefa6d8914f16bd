//! Crypto error types.

use thiserror::Error;

/// Errors from key parsing and signature checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Public key is not 33 compressed SEC1 bytes on the curve.
    #[error("invalid public key")]
    InvalidPublicKey,
    /// Secret key is not a valid 32-byte scalar.
    #[error("invalid private key")]
    InvalidPrivateKey,
    /// Signature bytes are malformed.
    #[error("invalid signature encoding")]
    InvalidSignature,
    /// Well-formed signature that does not verify.
    #[error("signature verification failed")]
    VerificationFailed,
}
