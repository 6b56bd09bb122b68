//! Data models for Worth backend entities.
//!
//! This module contains the wire types exchanged with the point-of-sale
//! API:
//!
//! - `CustomerDetail`, `NewCustomer`, `NewCard`, `CustomerAccount`:
//!   customer and card records
//! - `BalanceTransactionRequest`, `RewardTransactionRequest`: balance and
//!   reward adjustments
//! - `CreditTransaction`, `PointTransaction`, `CustomerHistory`: account
//!   history
//!
//! The backend writes timestamps with fractional seconds; the `timestamp`
//! module holds the serde codec for that format.

pub mod customer;
pub mod timestamp;
pub mod transaction;

pub use customer::{CustomerAccount, CustomerDetail, NewCard, NewCustomer};
pub use transaction::{
    BalanceTransactionRequest, CreditTransaction, CustomerHistory, PointTransaction,
    RewardTransactionRequest,
};
