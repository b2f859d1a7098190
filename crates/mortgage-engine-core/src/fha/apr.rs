//! Disclosure APR: a simple effective-rate approximation, not a regulatory
//! TILA calculation.
//!
//! The APR is the annualised monthly rate at which the P&I payment stream
//! discounts back to the amount actually financed (total loan less total
//! fees). The present value is monotone decreasing in the rate, so a
//! bisection solve is exact enough and cannot diverge the way Newton steps
//! can on flat regions.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::MortgageEngineError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// One cent: the solve is done when the discounted stream is within a cent
/// of the amount financed.
const APR_VALUE_TOLERANCE: Decimal = dec!(0.01);

/// Stop narrowing once the monthly-rate interval is this small.
const APR_RATE_INTERVAL: Decimal = dec!(0.000000000001);

const MAX_APR_ITERATIONS: u32 = 200;

/// Effective annual percentage rate from total fees, loan amount, monthly
/// P&I and term. Returns an annual percentage rounded to 3 decimals.
pub fn effective_apr(
    total_loan_amount: Money,
    total_fees: Money,
    monthly_payment: Money,
    term_years: u32,
) -> MortgageResult<Rate> {
    let n = term_years * 12;
    if n == 0 {
        return Err(MortgageEngineError::DivisionByZero {
            context: "APR term".into(),
        });
    }

    let amount_financed = total_loan_amount - total_fees;
    if amount_financed <= Decimal::ZERO {
        return Err(MortgageEngineError::InvalidInput {
            field: "total_fees".into(),
            reason: "Fees meet or exceed the loan amount".into(),
        });
    }

    // A payment stream that never exceeds the amount financed carries no
    // cost of credit.
    if monthly_payment * Decimal::from(n) <= amount_financed {
        return Ok(Decimal::ZERO);
    }

    let mut low = Decimal::ZERO;
    let mut high = Decimal::ONE;
    let mut iterations = 0u32;
    let mut last_delta = Decimal::ZERO;

    while iterations < MAX_APR_ITERATIONS && high - low > APR_RATE_INTERVAL {
        let mid = (low + high) / dec!(2);
        let pv = present_value(monthly_payment, mid, n);
        last_delta = pv - amount_financed;
        if last_delta > Decimal::ZERO {
            low = mid;
        } else {
            high = mid;
        }
        iterations += 1;
    }

    let monthly_rate = (low + high) / dec!(2);
    let pv = present_value(monthly_payment, monthly_rate, n);
    if (pv - amount_financed).abs() > APR_VALUE_TOLERANCE {
        return Err(MortgageEngineError::ConvergenceFailure {
            function: "effective_apr".into(),
            iterations,
            last_delta,
        });
    }

    Ok((monthly_rate * dec!(12) * dec!(100)).round_dp(3))
}

/// Present value of a level payment stream at a monthly rate fraction.
///
/// Total over the whole bracket: when `(1 + r)^n` exceeds Decimal's range
/// its reciprocal is zero to 28 digits, so the annuity collapses to the
/// perpetuity value `payment / r`. The wide early bisection midpoints land
/// here instead of overflowing.
fn present_value(payment: Money, monthly_rate: Decimal, months: u32) -> Money {
    if monthly_rate.is_zero() {
        return payment * Decimal::from(months);
    }
    match (Decimal::ONE + monthly_rate).checked_powi(i64::from(months)) {
        Some(factor) => payment * (Decimal::ONE - Decimal::ONE / factor) / monthly_rate,
        None => payment / monthly_rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
