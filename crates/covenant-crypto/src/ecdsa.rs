//! ECDSA over secp256k1 with hex wire encoding.
//!
//! Signing is deterministic (RFC 6979), so a keypair signing the same
//! message twice yields the same signature. Verification is total: malformed
//! hex, a wrong-length signature, or an off-curve key all report an error
//! rather than panicking, and [`verify`] flattens every failure to `false`.

use crate::errors::CryptoError;
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use zeroize::Zeroize;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    /// Parse from 66 hex characters (compressed SEC1, leading 0x02/0x03).
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(s).map_err(|_| CryptoError::InvalidPublicKey)?;
        let bytes: [u8; 33] = raw.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
        // Reject encodings that are not a valid curve point
        VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Hex wire form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Verify a hex-encoded signature over the UTF-8 bytes of `message`.
    pub fn verify(&self, message: &str, signature_hex: &str) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let raw = hex::decode(signature_hex).map_err(|_| CryptoError::InvalidSignature)?;
        let sig = Signature::from_slice(&raw).map_err(|_| CryptoError::InvalidSignature)?;

        verifying_key
            .verify(message.as_bytes(), &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

/// secp256k1 keypair.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Restore from a 64-hex-character secret key.
    pub fn from_private_hex(s: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(s).map_err(|_| CryptoError::InvalidPrivateKey)?;
        let bytes: [u8; 32] = raw.try_into().map_err(|_| CryptoError::InvalidPrivateKey)?;
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Public half.
    ///
    /// # Panics
    ///
    /// Does not panic - SEC1 compression always yields exactly 33 bytes.
    pub fn public_key(&self) -> PublicKey {
        let sec1_bytes = self.signing_key.verifying_key().to_sec1_bytes();
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(&sec1_bytes[..33]);
        PublicKey(bytes)
    }

    /// Hex form of the public key, as carried on the wire.
    pub fn public_key_hex(&self) -> String {
        self.public_key().to_hex()
    }

    /// Hex form of the secret key, for persistence.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Sign the UTF-8 bytes of `message`; returns the 128-hex signature.
    pub fn sign(&self, message: &str) -> String {
        let sig: Signature = self.signing_key.sign(message.as_bytes());
        hex::encode(sig.to_bytes())
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

/// Total verification: `true` iff `signature_hex` is a valid signature over
/// `message` under `public_key_hex`. Malformed inputs are `false`, never an
/// error.
pub fn verify(signature_hex: &str, message: &str, public_key_hex: &str) -> bool {
    match PublicKey::from_hex(public_key_hex) {
        Ok(key) => key.verify(message, signature_hex).is_ok(),
        Err(_) => false,
    }
}
