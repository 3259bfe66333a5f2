pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod shell;
pub mod store;

pub use entry::CredentialEntry;
pub use error::{StoreError, StoreResult};
pub use store::{CredentialStorage, CredentialStore};
