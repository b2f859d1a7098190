//! Private mortgage insurance rate lookup and premium math.
//!
//! PMI is required whenever the down payment is under 20% or the LTV is
//! above 80. The rate comes from a jumbo/conforming split on the conforming
//! loan limit, then an LTV-band table by credit tier, with a high-balance
//! sub-split for conforming loans at LTV ≥ 95.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::PmiRateTable;
use crate::primitives::round_to_cents;
use crate::types::{CreditTier, Money, Percent, Rate};

/// Whether PMI applies at all.
pub fn pmi_required(down_payment_percent: Percent, ltv: Percent) -> bool {
    down_payment_percent < dec!(20) || ltv > dec!(80)
}

/// Annual PMI rate (percentage) for the loan, or zero when PMI is not
/// required. Refinance callers substitute `100 − LTV` for the down-payment
/// percent.
pub fn annual_pmi_rate(
    table: &PmiRateTable,
    conforming_limit: Money,
    loan_amount: Money,
    ltv: Percent,
    down_payment_percent: Percent,
    tier: CreditTier,
) -> Rate {
    if !pmi_required(down_payment_percent, ltv) {
        return Decimal::ZERO;
    }

    let conforming = loan_amount <= conforming_limit;

    // Conforming high-balance sub-split applies only at LTV ≥ 95.
    if conforming && ltv >= dec!(95) && loan_amount > table.high_balance_threshold {
        return table.conforming_high_balance_gte_95.for_tier(tier);
    }

    let bands = if conforming {
        &table.conforming
    } else {
        &table.jumbo
    };

    if ltv >= dec!(95) {
        bands.ltv_gte_95.for_tier(tier)
    } else if ltv >= dec!(90) {
        bands.ltv_gte_90.for_tier(tier)
    } else {
        bands.ltv_gt_80.for_tier(tier)
    }
}

/// Ongoing monthly PMI premium. The monthly rate fraction is truncated to
/// 8 decimal places before multiplying by the balance, and the dollar
/// result is truncated to 2 — this sequence is not equivalent to naive
/// rounding and is preserved deliberately.
pub fn monthly_pmi_premium(loan_amount: Money, annual_rate: Rate) -> Money {
    let monthly_rate = (annual_rate / dec!(100) / dec!(12)).trunc_with_scale(8);
    (loan_amount * monthly_rate).trunc_with_scale(2)
}

/// One-time single-premium PMI on the base loan, rounded to cents.
pub fn single_pmi_premium(loan_amount: Money, annual_rate: Rate, multiplier: Decimal) -> Money {
    round_to_cents(loan_amount * annual_rate / dec!(100) * multiplier)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
