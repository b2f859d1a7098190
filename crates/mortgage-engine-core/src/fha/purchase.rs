//! FHA purchase calculation.
//!
//! UFMIP is computed on the base loan and financed: the amortised amount is
//! `base + UFMIP`, and prepaid interest accrues on that financed total —
//! unlike the Conventional engine, which accrues on the base. Both are
//! deliberate program rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::closing::{assemble_closing_costs, purchase_cash_to_close, ClosingCostInputs};
use crate::config::RateBook;
use crate::fha::{apr, mip};
use crate::primitives::{
    down_payment_from_percent, escrow_reserve, loan_amount, loan_to_value, monthly_escrow_figure,
    monthly_principal_and_interest, prepaid_interest, resolve_override, round_to_cents,
};
use crate::types::{
    with_metadata, ComputationOutput, CreditInputs, FeeOverrides, LoanCalculationResult, Money,
    MonthlyPaymentBreakdown, Percent, PrepaidLines, PrepaidOverrides, Program, Rate, Scenario,
};
use crate::MortgageResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FhaPurchaseInput {
    pub sale_price: Money,
    /// Flat down payment. Wins over the percentage form when positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment_percent: Option<Percent>,
    /// Annual note rate as a percentage (6.5 = 6.5%).
    pub interest_rate: Rate,
    pub term_years: u32,
    /// Explicit monthly MIP; wins over the tiered rate when positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_mip_override: Option<Money>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_costs_total: Option<Money>,
    #[serde(flatten)]
    pub fees: FeeOverrides,
    #[serde(flatten)]
    pub prepaids: PrepaidOverrides,
    #[serde(flatten)]
    pub credits: CreditInputs,
}

/// Calculate an FHA purchase: financed UFMIP, tiered annual MIP, payment
/// and closing-cost breakdowns, cash to close, and the disclosure APR.
pub fn calculate_fha_purchase(
    input: &FhaPurchaseInput,
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

    let ufmip = mip::ufmip_amount(base_loan, book.fha.ufmip_purchase);
    let total_loan_amount = base_loan + ufmip;

    let principal_and_interest =
        monthly_principal_and_interest(total_loan_amount, input.interest_rate, input.term_years)?;

    let mip_rate = mip::annual_mip_rate(&book.fha, base_loan, false);
    let monthly_mi = round_to_cents(resolve_override(
        input.monthly_mip_override,
        mip::monthly_mip_premium(base_loan, mip_rate),
    ));

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

    // FHA prepaid interest accrues on the financed total, UFMIP included.
    let prepaids = PrepaidLines {
        prepaid_interest: round_to_cents(resolve_override(
            input.prepaids.prepaid_interest_amount,
            prepaid_interest(total_loan_amount, input.interest_rate, interest_days),
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
            defaults: book.fees.for_program(Program::Fha, Scenario::Purchase),
            overrides: &input.fees,
            prepaids,
            misc_fee: Decimal::ZERO,
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

    // The APR is advisory; a solve failure downgrades to a warning rather
    // than discarding the payment and closing-cost breakdowns.
    let apr = match apr::effective_apr(
        total_loan_amount,
        closing_costs.total_closing_costs,
        principal_and_interest,
        input.term_years,
    ) {
        Ok(rate) => Some(rate),
        Err(err) => {
            warnings.push(format!("APR omitted: {err}"));
            None
        }
    };

    let result = LoanCalculationResult {
        loan_amount: base_loan,
        total_loan_amount,
        ltv,
        down_payment,
        monthly_payment,
        closing_costs,
        cash_to_close,
        program_fee: Some(ufmip),
        apr,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ufmip_rate_percent": book.fha.ufmip_purchase,
        "annual_mip_rate_percent": mip_rate,
        "prepaid_interest_days": interest_days,
        "tax_reserve_months": tax_months,
        "insurance_reserve_months": insurance_months,
        "prepaid_interest_basis": "total_loan_amount",
        "apr": "effective-rate approximation, not TILA",
    });
    Ok(with_metadata(
        "FHA Purchase (financed UFMIP, tiered annual MIP)",
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

    fn minimum_down() -> FhaPurchaseInput {
        FhaPurchaseInput {
            sale_price: dec!(400_000),
            down_payment_percent: Some(dec!(3.5)),
            interest_rate: dec!(6.5),
            term_years: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_ufmip_financing() {
        let book = RateBook::default();
        let result = calculate_fha_purchase(&minimum_down(), &book).unwrap().result;

        assert_eq!(result.down_payment, dec!(14_000));
        assert_eq!(result.loan_amount, dec!(386_000));
        assert_eq!(result.program_fee, Some(dec!(6755)));
        assert_eq!(result.total_loan_amount, dec!(392_755));
    }

    #[test]
    fn test_pi_amortises_the_financed_total() {
        let book = RateBook::default();
        let result = calculate_fha_purchase(&minimum_down(), &book).unwrap().result;
        let expected = monthly_principal_and_interest(dec!(392_755), dec!(6.5), 30).unwrap();
        assert_eq!(result.monthly_payment.principal_and_interest, expected);
    }

    #[test]
    fn test_monthly_mip_tier_and_override() {
        let book = RateBook::default();
        let tiered = calculate_fha_purchase(&minimum_down(), &book).unwrap().result;
        // 386,000 × 0.55% / 12 = 176.92
        assert_eq!(tiered.monthly_payment.mortgage_insurance, dec!(176.92));

        let overridden = FhaPurchaseInput {
            monthly_mip_override: Some(dec!(150)),
            ..minimum_down()
        };
        let result = calculate_fha_purchase(&overridden, &book).unwrap().result;
        assert_eq!(result.monthly_payment.mortgage_insurance, dec!(150));
    }

    #[test]
    fn test_prepaid_interest_on_financed_total() {
        let book = RateBook::default();
        let result = calculate_fha_purchase(&minimum_down(), &book).unwrap().result;
        let expected = prepaid_interest(dec!(392_755), dec!(6.5), 15);
        assert_eq!(result.closing_costs.prepaids.prepaid_interest, expected);
        // And strictly more than the base-loan accrual.
        assert!(expected > prepaid_interest(dec!(386_000), dec!(6.5), 15));
    }

    #[test]
    fn test_apr_present_and_above_note_rate() {
        let book = RateBook::default();
        let result = calculate_fha_purchase(&minimum_down(), &book).unwrap().result;
        let apr = result.apr.unwrap();
        assert!(apr > dec!(6.5));
        assert!(apr < dec!(8));
    }

    #[test]
    fn test_apr_failure_degrades_to_warning() {
        // A total override larger than the financed amount makes the APR
        // unsolvable; the breakdowns still come back.
        let book = RateBook::default();
        let input = FhaPurchaseInput {
            sale_price: dec!(8_000),
            closing_costs_total: Some(dec!(10_000)),
            ..minimum_down()
        };
        let output = calculate_fha_purchase(&input, &book).unwrap();
        assert_eq!(output.result.apr, None);
        assert!(output.warnings.iter().any(|w| w.contains("APR omitted")));
        assert!(output.result.monthly_payment.total > Decimal::ZERO);
        assert_eq!(output.result.closing_costs.total_closing_costs, dec!(10_000));
    }

    #[test]
    fn test_idempotent() {
        let book = RateBook::default();
        let input = minimum_down();
        let a = calculate_fha_purchase(&input, &book).unwrap().result;
        let b = calculate_fha_purchase(&input, &book).unwrap().result;
        assert_eq!(a, b);
    }
}
