//! Client core for the Worth point-of-sale and customer-loyalty service.
//!
//! This crate is the layer a register or mobile UI sits on: it holds the
//! signed-in credential, talks JSON to the Worth backend, and exposes typed
//! wrappers for the customer, card, transaction, and history endpoints.
//!
//! The pieces:
//!
//! - [`auth::CredentialStore`]: durable holder of the access/refresh token
//!   pair, backed by the OS keychain in production and by memory in tests.
//! - [`api::ApiClient`]: builds requests against the configured endpoint,
//!   attaches the bearer credential, and retries exactly once after a 401
//!   by refreshing the token pair.
//! - [`models`]: wire types for the backend's JSON, including its
//!   fractional-seconds timestamp format.
//! - [`config::Config`]: fixed endpoint configuration with file persistence
//!   and environment overrides.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, Envelope, Request, RequestBody};
pub use auth::{Credential, CredentialStore, KeyringStore, MemoryStore};
pub use config::Config;
