//! Adapters: concrete implementations of the outbound ports plus the
//! replicated-store composition.

pub mod cos;
pub mod keyring;
pub mod replicated;
pub mod store;

pub use cos::CosClient;
pub use keyring::KeyRegistry;
pub use replicated::ReplicatedStore;
pub use store::{FileContractStore, FileUserStore};
