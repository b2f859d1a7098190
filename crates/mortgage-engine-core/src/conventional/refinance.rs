//! Conventional refinance calculation.
//!
//! Same PMI lookup as purchase with `100 − LTV` standing in for the
//! down-payment percent. Cash to close is the amount needed to retire the
//! existing balance and pay net costs, less the new loan; a negative result
//! is cash back to the borrower.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::closing::{assemble_closing_costs, refinance_cash_to_close, ClosingCostInputs};
use crate::config::RateBook;
use crate::conventional::pmi;
use crate::primitives::{
    escrow_reserve, loan_to_value, monthly_escrow_figure, monthly_principal_and_interest,
    prepaid_interest, resolve_override, round_to_cents,
};
use crate::types::{
    with_metadata, ComputationOutput, CreditInputs, CreditTier, FeeOverrides,
    LoanCalculationResult, Money, MonthlyPaymentBreakdown, PmiType, PrepaidLines,
    PrepaidOverrides, Program, Rate, Scenario,
};
use crate::MortgageResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConventionalRefinanceInput {
    pub property_value: Money,
    /// New base loan amount.
    pub loan_amount: Money,
    pub existing_loan_balance: Money,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_costs_total: Option<Money>,
    #[serde(flatten)]
    pub fees: FeeOverrides,
    #[serde(flatten)]
    pub prepaids: PrepaidOverrides,
    #[serde(flatten)]
    pub credits: CreditInputs,
}

/// Calculate a Conventional rate/term refinance.
pub fn calculate_conventional_refinance(
    input: &ConventionalRefinanceInput,
    book: &RateBook,
) -> MortgageResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base_loan = input.loan_amount;
    let ltv = loan_to_value(base_loan, input.property_value)?;
    // Refinance substitutes equity for the down-payment percent.
    let equity_percent = dec!(100) - ltv;

    let pmi_rate = pmi::annual_pmi_rate(
        &book.pmi,
        book.conforming_loan_limit,
        base_loan,
        ltv,
        equity_percent,
        input.credit_tier,
    );
    if pmi_rate > Decimal::ZERO && ltv >= dec!(95) {
        warnings.push(format!("High-LTV PMI band at LTV {ltv}; annual rate {pmi_rate}%"));
    }

    let single_premium =
        pmi::single_pmi_premium(base_loan, pmi_rate, book.pmi.single_premium_multiplier);
    let (total_loan_amount, monthly_mi, misc_fee, financed_premium, program_fee) =
        match input.pmi_type {
            PmiType::Monthly => (
                base_loan,
                pmi::monthly_pmi_premium(base_loan, pmi_rate),
                Decimal::ZERO,
                Decimal::ZERO,
                None,
            ),
            PmiType::SingleFinanced => (
                base_loan + single_premium,
                Decimal::ZERO,
                Decimal::ZERO,
                single_premium,
                (single_premium > Decimal::ZERO).then_some(single_premium),
            ),
            PmiType::SingleCash => (
                base_loan,
                Decimal::ZERO,
                single_premium,
                Decimal::ZERO,
                (single_premium > Decimal::ZERO).then_some(single_premium),
            ),
        };

    let principal_and_interest =
        monthly_principal_and_interest(total_loan_amount, input.interest_rate, input.term_years)?;

    let monthly_taxes = monthly_escrow_figure(
        input.monthly_taxes,
        input.annual_taxes,
        input.property_value,
        book.reserves.annual_tax_rate,
    );
    let monthly_insurance = monthly_escrow_figure(
        input.monthly_insurance,
        input.annual_insurance,
        input.property_value,
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
                .for_program(Program::Conventional, Scenario::Refinance),
            overrides: &input.fees,
            prepaids,
            misc_fee,
            price_basis: input.property_value,
            credits: &input.credits,
            total_override: input.closing_costs_total,
        },
        &mut warnings,
    );

    let cash_to_close = refinance_cash_to_close(
        input.existing_loan_balance,
        closing_costs.net_closing_costs,
        financed_premium,
        total_loan_amount,
    );

    let result = LoanCalculationResult {
        loan_amount: base_loan,
        total_loan_amount,
        ltv,
        down_payment: Decimal::ZERO,
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
        "down_payment_percent_substitute": equity_percent,
        "prepaid_interest_days": interest_days,
        "tax_reserve_months": tax_months,
        "insurance_reserve_months": insurance_months,
        "prepaid_interest_basis": "base_loan_amount",
    });
    Ok(with_metadata(
        "Conventional Refinance (level-pay amortisation, tiered PMI on equity)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
