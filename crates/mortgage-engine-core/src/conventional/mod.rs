//! Conventional loan engine: purchase and refinance with tiered private
//! mortgage insurance.

pub mod pmi;
pub mod purchase;
pub mod refinance;

pub use purchase::{calculate_conventional_purchase, ConventionalPurchaseInput};
pub use refinance::{calculate_conventional_refinance, ConventionalRefinanceInput};
