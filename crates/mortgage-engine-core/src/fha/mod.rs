//! FHA loan engine: purchase and refinance with financed upfront MIP,
//! tiered annual MIP, and a disclosure APR.

pub mod apr;
pub mod mip;
pub mod purchase;
pub mod refinance;

pub use purchase::{calculate_fha_purchase, FhaPurchaseInput};
pub use refinance::{calculate_fha_refinance, FhaRefinanceInput};
