//! # Covenant Crypto - Signing Primitives
//!
//! secp256k1/ECDSA signing and verification for the covenant protocol.
//!
//! ## Components
//!
//! | Module | Contents |
//! |--------|----------|
//! | `ecdsa` | Keypairs, public keys, hex wire encoding |
//! | `errors` | `CryptoError` |
//!
//! ## Protocol form
//!
//! Every signed message is a plain string: fixed-order fields concatenated
//! with no separator. Signing hashes the UTF-8 bytes with SHA-256 and
//! produces an RFC 6979 deterministic ECDSA signature, encoded as 128 hex
//! characters (64-byte r||s). Public keys travel as 66 hex characters
//! (33-byte compressed SEC1).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;

pub use ecdsa::{verify, Keypair, PublicKey};
pub use errors::CryptoError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
