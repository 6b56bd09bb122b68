//! REST API client module for the Worth backend.
//!
//! This module provides the `ApiClient` for authenticated JSON exchanges
//! with the Worth point-of-sale service: customer search, customer and card
//! creation, balance and reward transactions, and account history.
//!
//! The API uses bearer token authentication. A 401 triggers a single
//! refresh-and-retry pass; every other status is the caller's concern.

pub mod client;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::{Envelope, Request, RequestBody};
