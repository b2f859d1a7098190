//! Conventional purchase calculation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::closing::{assemble_closing_costs, purchase_cash_to_close, ClosingCostInputs};
use crate::config::RateBook;
use crate::conventional::pmi;
use crate::primitives::{
    down_payment_from_percent, escrow_reserve, loan_amount, loan_to_value, monthly_escrow_figure,
    monthly_principal_and_interest, prepaid_interest, resolve_override, round_to_cents,
};
use crate::types::{
    with_metadata, ComputationOutput, CreditInputs, CreditTier, FeeOverrides,
    LoanCalculationResult, Money, MonthlyPaymentBreakdown, Percent, PmiType, PrepaidLines,
    PrepaidOverrides, Program, Rate, Scenario,
};
use crate::MortgageResult;

/// Conventional purchase input. All overridable values are optional; a
/// `Some` that is strictly positive wins over the computed fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConventionalPurchaseInput {
    pub sale_price: Money,
    /// Flat down payment. Wins over the percentage form when positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment_percent: Option<Percent>,
    /// Annual note rate as a percentage (7.0 = 7%).
    pub interest_rate: Rate,
    pub term_years: u32,
    pub credit_tier: CreditTier,
    pub pmi_type: PmiType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_taxes: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_taxes: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_insurance: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_insurance: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_hoa: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_flood: Option<Money>,
    /// Earnest-money deposit already in escrow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<Money>,
    /// Manual total that replaces the calculated closing-cost figure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_costs_total: Option<Money>,
    #[serde(flatten)]
    pub fees: FeeOverrides,
    #[serde(flatten)]
    pub prepaids: PrepaidOverrides,
    #[serde(flatten)]
    pub credits: CreditInputs,
}

/// Calculate a Conventional purchase: payment breakdown, sectioned closing
/// costs, and cash to close.
pub fn calculate_conventional_purchase(
    input: &ConventionalPurchaseInput,
    book: &RateBook,
) -> MortgageResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let price = input.sale_price;
    let down_payment = round_to_cents(resolve_override(
        input.down_payment,
        down_payment_from_percent(price, input.down_payment_percent.unwrap_or(Decimal::ZERO)),
    ));
    let base_loan = loan_amount(price, down_payment);
    let ltv = loan_to_value(base_loan, price)?;
    let down_payment_percent = down_payment / price * dec!(100);

    let pmi_rate = pmi::annual_pmi_rate(
        &book.pmi,
        book.conforming_loan_limit,
        base_loan,
        ltv,
        down_payment_percent,
        input.credit_tier,
    );
    if pmi_rate > Decimal::ZERO && ltv >= dec!(95) {
        warnings.push(format!("High-LTV PMI band at LTV {ltv}; annual rate {pmi_rate}%"));
    }

    let single_premium =
        pmi::single_pmi_premium(base_loan, pmi_rate, book.pmi.single_premium_multiplier);
    let (total_loan_amount, monthly_mi, misc_fee, program_fee) = match input.pmi_type {
        PmiType::Monthly => (
            base_loan,
            pmi::monthly_pmi_premium(base_loan, pmi_rate),
            Decimal::ZERO,
            None,
        ),
        PmiType::SingleFinanced => (
            base_loan + single_premium,
            Decimal::ZERO,
            Decimal::ZERO,
            (single_premium > Decimal::ZERO).then_some(single_premium),
        ),
        PmiType::SingleCash => (
            base_loan,
            Decimal::ZERO,
            single_premium,
            (single_premium > Decimal::ZERO).then_some(single_premium),
        ),
    };

    let principal_and_interest =
        monthly_principal_and_interest(total_loan_amount, input.interest_rate, input.term_years)?;

    let monthly_taxes = monthly_escrow_figure(
        input.monthly_taxes,
        input.annual_taxes,
        price,
        book.reserves.annual_tax_rate,
    );
    let monthly_insurance = monthly_escrow_figure(
        input.monthly_insurance,
        input.annual_insurance,
        price,
        book.reserves.annual_insurance_rate,
    );
    let hoa = round_to_cents(input.monthly_hoa.unwrap_or_default());
    let flood = round_to_cents(input.monthly_flood.unwrap_or_default());

    let monthly_payment = MonthlyPaymentBreakdown {
        principal_and_interest,
        mortgage_insurance: monthly_mi,
        taxes: monthly_taxes,
        insurance: monthly_insurance,
        hoa,
        flood,
        total: principal_and_interest + monthly_mi + monthly_taxes + monthly_insurance + hoa + flood,
    };

    let interest_days = input
        .prepaids
        .interest_days
        .unwrap_or(book.reserves.prepaid_interest_days);
    let tax_months = input
        .prepaids
        .tax_reserve_months
        .unwrap_or(book.reserves.tax_reserve_months);
    let insurance_months = input
        .prepaids
        .insurance_reserve_months
        .unwrap_or(book.reserves.insurance_reserve_months);

    // Conventional prepaid interest accrues on the base loan amount.
    let prepaids = PrepaidLines {
        prepaid_interest: round_to_cents(resolve_override(
            input.prepaids.prepaid_interest_amount,
            prepaid_interest(base_loan, input.interest_rate, interest_days),
        )),
        tax_reserves: escrow_reserve(input.prepaids.tax_reserve_amount, monthly_taxes, tax_months),
        insurance_reserves: escrow_reserve(
            input.prepaids.insurance_reserve_amount,
            monthly_insurance,
            insurance_months,
        ),
    };

    let closing_costs = assemble_closing_costs(
        &ClosingCostInputs {
            defaults: book
                .fees
                .for_program(Program::Conventional, Scenario::Purchase),
            overrides: &input.fees,
            prepaids,
            misc_fee,
            price_basis: price,
            credits: &input.credits,
            total_override: input.closing_costs_total,
        },
        &mut warnings,
    );

    let cash_to_close = purchase_cash_to_close(
        down_payment,
        closing_costs.total_closing_costs,
        closing_costs.total_credits,
        round_to_cents(input.deposit_amount.unwrap_or_default()),
    );

    let result = LoanCalculationResult {
        loan_amount: base_loan,
        total_loan_amount,
        ltv,
        down_payment,
        monthly_payment,
        closing_costs,
        cash_to_close,
        program_fee,
        apr: None,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "pmi_type": input.pmi_type,
        "annual_pmi_rate_percent": pmi_rate,
        "prepaid_interest_days": interest_days,
        "tax_reserve_months": tax_months,
        "insurance_reserve_months": insurance_months,
        "prepaid_interest_basis": "base_loan_amount",
    });
    Ok(with_metadata(
        "Conventional Purchase (level-pay amortisation, tiered PMI)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= TOL,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn twenty_percent_down() -> ConventionalPurchaseInput {
        ConventionalPurchaseInput {
            sale_price: dec!(500_000),
            down_payment_percent: Some(dec!(20)),
            interest_rate: dec!(7.0),
            term_years: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_scenario() {
        let book = RateBook::default();
        let result = calculate_conventional_purchase(&twenty_percent_down(), &book)
            .unwrap()
            .result;

        assert_eq!(result.down_payment, dec!(100_000));
        assert_eq!(result.loan_amount, dec!(400_000));
        assert_eq!(result.total_loan_amount, dec!(400_000));
        assert_eq!(result.ltv, dec!(80));
        assert_eq!(result.monthly_payment.mortgage_insurance, Decimal::ZERO);
        assert_eq!(result.program_fee, None);
        assert_close(
            result.monthly_payment.principal_and_interest,
            dec!(2661.21),
            "P&I",
        );
    }

    #[test]
    fn test_idempotent() {
        let book = RateBook::default();
        let input = twenty_percent_down();
        let a = calculate_conventional_purchase(&input, &book).unwrap().result;
        let b = calculate_conventional_purchase(&input, &book).unwrap().result;
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_down_payment_wins_over_percent() {
        let book = RateBook::default();
        let input = ConventionalPurchaseInput {
            down_payment: Some(dec!(125_000)),
            ..twenty_percent_down()
        };
        let result = calculate_conventional_purchase(&input, &book).unwrap().result;
        assert_eq!(result.down_payment, dec!(125_000));
        assert_eq!(result.loan_amount, dec!(375_000));
        assert_eq!(result.ltv, dec!(75));
    }

    #[test]
    fn test_monthly_pmi_below_twenty_percent() {
        let book = RateBook::default();
        let input = ConventionalPurchaseInput {
            down_payment_percent: Some(dec!(10)),
            ..twenty_percent_down()
        };
        let result = calculate_conventional_purchase(&input, &book).unwrap().result;
        // Loan 450,000 at LTV 90: conforming excellent rate 0.46%.
        // 0.46/1200 truncated = 0.00038333; 450,000 × 0.00038333 = 172.4985
        // → truncated 172.49.
        assert_eq!(result.monthly_payment.mortgage_insurance, dec!(172.49));
        assert_eq!(result.total_loan_amount, result.loan_amount);
    }

    #[test]
    fn test_single_financed_premium_changes_amortised_amount() {
        let book = RateBook::default();
        let base = ConventionalPurchaseInput {
            down_payment_percent: Some(dec!(10)),
            ..twenty_percent_down()
        };
        let financed = ConventionalPurchaseInput {
            pmi_type: PmiType::SingleFinanced,
            ..base.clone()
        };
        let monthly = calculate_conventional_purchase(&base, &book).unwrap().result;
        let result = calculate_conventional_purchase(&financed, &book).unwrap().result;

        // 450,000 × 0.46% × 3.4 = 7,038.00, financed on top of the base loan.
        assert_eq!(result.program_fee, Some(dec!(7038)));
        assert_eq!(result.total_loan_amount, dec!(457_038));
        assert_eq!(result.monthly_payment.mortgage_insurance, Decimal::ZERO);
        assert_eq!(result.closing_costs.misc_fee, Decimal::ZERO);
        assert!(
            result.monthly_payment.principal_and_interest
                > monthly.monthly_payment.principal_and_interest
        );
    }

    #[test]
    fn test_single_cash_premium_lands_in_closing_costs() {
        let book = RateBook::default();
        let input = ConventionalPurchaseInput {
            down_payment_percent: Some(dec!(10)),
            pmi_type: PmiType::SingleCash,
            ..twenty_percent_down()
        };
        let result = calculate_conventional_purchase(&input, &book).unwrap().result;
        assert_eq!(result.total_loan_amount, result.loan_amount);
        assert_eq!(result.closing_costs.misc_fee, dec!(7038));
        assert_eq!(result.program_fee, Some(dec!(7038)));
        assert_eq!(result.monthly_payment.mortgage_insurance, Decimal::ZERO);
    }

    #[test]
    fn test_cash_to_close_components() {
        let book = RateBook::default();
        let input = ConventionalPurchaseInput {
            deposit_amount: Some(dec!(5_000)),
            credits: CreditInputs {
                seller_credit: Some(dec!(3_000)),
                ..Default::default()
            },
            ..twenty_percent_down()
        };
        let result = calculate_conventional_purchase(&input, &book).unwrap().result;
        let expected = result.down_payment + result.closing_costs.total_closing_costs
            - dec!(3_000)
            - dec!(5_000);
        assert_eq!(result.cash_to_close, expected);
    }

    #[test]
    fn test_zero_property_value_rejected() {
        let book = RateBook::default();
        let input = ConventionalPurchaseInput {
            sale_price: Decimal::ZERO,
            ..twenty_percent_down()
        };
        let err = calculate_conventional_purchase(&input, &book).unwrap_err();
        assert!(matches!(
            err,
            crate::MortgageEngineError::DivisionByZero { .. }
        ));
    }
}
