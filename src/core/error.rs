//! Store error types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The (website, login) pair is already stored; `update` replaces it instead.
    #[error("Entry already exists for website: {website} and login: {login}")]
    DuplicateEntry { website: String, login: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
