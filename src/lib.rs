//! Cred Locker - An in-memory credential locker
//!
//! This crate provides a thread-safe credential store keyed by website and
//! login, with masked bulk listing and code-word gated retrieval of the raw
//! password, plus the interactive shell used by the `cred-locker` binary.

pub mod core;
