//! Local document stores.

pub mod file;

pub use file::{FileContractStore, FileUserStore};
