//! FHA mortgage insurance premium math.
//!
//! UFMIP is computed on the base loan amount and financed into the total.
//! Annual MIP is tiered on the base balance against the program's
//! high-balance threshold; streamline refinances carry their own flat rate.

use rust_decimal_macros::dec;

use crate::config::FhaMipRates;
use crate::primitives::round_to_cents;
use crate::types::{Money, Rate};

/// Upfront MIP on the base loan, rounded to cents.
pub fn ufmip_amount(base_loan: Money, ufmip_rate: Rate) -> Money {
    round_to_cents(base_loan * ufmip_rate / dec!(100))
}

/// Annual MIP rate for the loan.
pub fn annual_mip_rate(rates: &FhaMipRates, base_loan: Money, streamline: bool) -> Rate {
    if streamline {
        rates.annual_streamline
    } else if base_loan > rates.high_balance_threshold {
        rates.annual_high_balance
    } else {
        rates.annual_base
    }
}

/// Monthly MIP on the base loan at the annual rate, rounded to cents.
pub fn monthly_mip_premium(base_loan: Money, annual_rate: Rate) -> Money {
    round_to_cents(base_loan * annual_rate / dec!(100) / dec!(12))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
