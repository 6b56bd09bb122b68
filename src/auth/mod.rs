//! Authentication module for managing stored credentials.
//!
//! This module provides:
//! - `CredentialStore`: the injected contract the request executor reads
//!   tokens through
//! - `KeyringStore`: secure OS-level credential storage via keyring
//! - `MemoryStore`: in-process storage for tests and ephemeral sessions
//!
//! Tokens are written at sign-in, read on every outbound request, replaced
//! as a pair after a successful refresh, and cleared at sign-out.

pub mod credentials;

pub use credentials::{Credential, CredentialError, CredentialStore, KeyringStore, MemoryStore};
