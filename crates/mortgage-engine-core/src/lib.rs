//! Deterministic mortgage cost engine.
//!
//! Pure functions that turn a borrower/property input and a caller-supplied
//! rate/fee book into a monthly-payment breakdown, a sectioned closing-cost
//! breakdown, and a cash-to-close figure, for Conventional, FHA and VA
//! loans in purchase and refinance scenarios, plus a config-free seller
//! net-proceeds sheet. No I/O, no shared state: every entry point is a pure
//! function of `(input, book)` and returns a fresh result record.

pub mod closing;
pub mod config;
pub mod conventional;
pub mod error;
pub mod fha;
pub mod primitives;
pub mod seller_net;
pub mod types;
pub mod va;

pub use error::MortgageEngineError;
pub use types::*;

/// Standard result type for all engine operations.
pub type MortgageResult<T> = Result<T, MortgageEngineError>;
