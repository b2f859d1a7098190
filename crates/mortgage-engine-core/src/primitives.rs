//! Arithmetic primitives shared by every program engine.
//!
//! All math in `rust_decimal::Decimal`. Rates arrive as annual percentages
//! (7.0 = 7%), never fractions. Currency results are rounded to cents at the
//! line-item level; section totals are sums of already-rounded cents, never
//! rounded after summing.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::MortgageEngineError;
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

/// Day-count basis for prepaid interest and tax proration.
const DAYS_PER_YEAR: Decimal = dec!(365);

/// Round half-up to 2 decimal places. Applied to every currency subtotal
/// before assembly into totals.
pub fn round_to_cents(value: Decimal) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard level-pay amortisation: `P·r·(1+r)^n / ((1+r)^n − 1)` with
/// `r = annual_rate/100/12` and `n = term_years × 12`. A zero rate falls
/// back to straight-line `P/n`.
pub fn monthly_principal_and_interest(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
) -> MortgageResult<Money> {
    let n = term_years * 12;
    if n == 0 {
        return Err(MortgageEngineError::DivisionByZero {
            context: "amortisation term".into(),
        });
    }

    if annual_rate <= Decimal::ZERO {
        return Ok(round_to_cents(principal / Decimal::from(n)));
    }

    let monthly_rate = annual_rate / dec!(100) / dec!(12);
    let factor = (Decimal::ONE + monthly_rate)
        .checked_powi(i64::from(n))
        .ok_or_else(|| MortgageEngineError::Overflow {
            context: "amortisation compounding factor".into(),
        })?;
    let denominator = factor - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return Err(MortgageEngineError::DivisionByZero {
            context: "amortisation denominator".into(),
        });
    }

    Ok(round_to_cents(principal * monthly_rate * factor / denominator))
}

/// Loan-to-value as a percentage (80 = 80%). A zero property value is a
/// structural division by zero, not a propagated non-finite number.
pub fn loan_to_value(loan_amount: Money, property_value: Money) -> MortgageResult<Percent> {
    if property_value.is_zero() {
        return Err(MortgageEngineError::DivisionByZero {
            context: "loan-to-value".into(),
        });
    }
    Ok(loan_amount / property_value * dec!(100))
}

/// `price × percent / 100`, rounded to cents.
pub fn down_payment_from_percent(price: Money, percent: Percent) -> Money {
    round_to_cents(price * percent / dec!(100))
}

/// Base loan amount: price less down payment, floored at zero. Program
/// minimums are the caller's validation concern.
pub fn loan_amount(price: Money, down_payment: Money) -> Money {
    let amount = price - down_payment;
    if amount < Decimal::ZERO {
        Decimal::ZERO
    } else {
        amount
    }
}

/// Interest collected at closing: `loan × (rate/100) / 365 × days`, cents.
pub fn prepaid_interest(loan_amount: Money, annual_rate: Rate, days: u32) -> Money {
    round_to_cents(loan_amount * annual_rate / dec!(100) / DAYS_PER_YEAR * Decimal::from(days))
}

/// The one manual-override resolution rule: an override wins only when it is
/// present and strictly positive; otherwise the computed fallback is used.
pub fn resolve_override(manual: Option<Decimal>, fallback: Decimal) -> Decimal {
    match manual {
        Some(value) if value > Decimal::ZERO => value,
        _ => fallback,
    }
}

/// Monthly escrow figure (tax or insurance): an explicit monthly amount
/// wins, then one twelfth of an explicit annual amount, then the
/// price-driven estimate `price × annual_rate/100 / 12`.
pub fn monthly_escrow_figure(
    monthly: Option<Money>,
    annual: Option<Money>,
    price: Money,
    annual_rate: Rate,
) -> Money {
    let from_annual = resolve_override(annual, price * annual_rate / dec!(100)) / dec!(12);
    round_to_cents(resolve_override(monthly, from_annual))
}

/// Reserve deposit: `monthly × months`, unless an explicit non-zero amount
/// was supplied, which always wins.
pub fn escrow_reserve(explicit_amount: Option<Money>, monthly: Money, months: u32) -> Money {
    round_to_cents(resolve_override(
        explicit_amount,
        monthly * Decimal::from(months),
    ))
}

/// Signed tax proration from a closing date: the seller's share of the
/// year's taxes accrued from January 1 through closing, on a 365-day basis.
/// Positive means the seller owes at closing.
pub fn tax_proration(annual_tax: Money, closing_date: NaiveDate) -> Money {
    let days_elapsed = Decimal::from(closing_date.ordinal());
    round_to_cents(annual_tax * days_elapsed / DAYS_PER_YEAR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
