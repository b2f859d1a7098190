//! VA loan engine: purchase and refinance with the tiered funding fee and
//! the disabled-veteran waiver. VA loans carry no monthly mortgage
//! insurance under any circumstance.

pub mod funding_fee;
pub mod purchase;
pub mod refinance;

pub use purchase::{calculate_va_purchase, VaPurchaseInput};
pub use refinance::{calculate_va_refinance, VaRefinanceInput};
