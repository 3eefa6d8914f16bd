//! User records.
//!
//! A user is the binding between an externally-assigned uuid and a caller
//! public key. Contract operations authenticate against the public key
//! carried in the request; the user record exists so callers can recover
//! their assigned uuid.

use serde::{Deserialize, Serialize};

/// A registered caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Assigned identifier.
    pub uuid: String,
    /// The caller's public key.
    #[serde(alias = "pub_key")]
    pub pub_key: String,
    /// Epoch milliseconds, string encoded.
    #[serde(alias = "created_at")]
    pub created_at: String,
    /// Epoch milliseconds, string encoded.
    #[serde(alias = "updated_at")]
    pub updated_at: String,
}
