//! VA refinance calculation: IRRRL, cash-out, or ordinary rate/term.
//!
//! Cash-out is detected by a positive `cash_out_amount`. For ordinary
//! rate/term refinances the down-payment tier is driven by equity
//! (`100 − LTV`), mirroring the Conventional refinance substitution.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::closing::{assemble_closing_costs, refinance_cash_to_close, ClosingCostInputs};
use crate::config::RateBook;
use crate::primitives::{
    escrow_reserve, loan_to_value, monthly_escrow_figure, monthly_principal_and_interest,
    prepaid_interest, resolve_override, round_to_cents,
};
use crate::types::{
    with_metadata, ComputationOutput, CreditInputs, FeeOverrides, LoanCalculationResult, Money,
    MonthlyPaymentBreakdown, PrepaidLines, PrepaidOverrides, Program, Rate, Scenario, VaUsage,
};
use crate::va::funding_fee::{funding_fee_amount, funding_fee_rate, FundingFeeTerms};
use crate::MortgageResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaRefinanceInput {
    pub property_value: Money,
    /// New base loan amount, before the financed funding fee.
    pub loan_amount: Money,
    pub existing_loan_balance: Money,
    /// Annual note rate as a percentage (6.0 = 6%).
    pub interest_rate: Rate,
    pub term_years: u32,
    pub usage: VaUsage,
    pub is_disabled_veteran: bool,
    /// Interest Rate Reduction Refinance Loan (streamline).
    pub is_irrrl: bool,
    /// Cash taken out at closing; any positive amount selects the cash-out
    /// funding-fee rates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_out_amount: Option<Money>,
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

/// Calculate a VA refinance.
pub fn calculate_va_refinance(
    input: &VaRefinanceInput,
    book: &RateBook,
) -> MortgageResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base_loan = input.loan_amount;
    let ltv = loan_to_value(base_loan, input.property_value)?;
    let equity_percent = dec!(100) - ltv;
    let is_cash_out = input.cash_out_amount.unwrap_or(Decimal::ZERO) > Decimal::ZERO;

    let fee_rate = funding_fee_rate(
        &book.va,
        FundingFeeTerms {
            usage: input.usage,
            is_disabled_veteran: input.is_disabled_veteran,
            is_irrrl: input.is_irrrl,
            is_cash_out,
        },
        equity_percent,
    );
    let funding_fee = funding_fee_amount(base_loan, fee_rate);
    let total_loan_amount = base_loan + funding_fee;

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

    // No monthly mortgage insurance on VA loans, ever.
    let monthly_payment = MonthlyPaymentBreakdown {
        principal_and_interest,
        mortgage_insurance: Decimal::ZERO,
        taxes: monthly_taxes,
        insurance: monthly_insurance,
        hoa,
        flood,
        total: principal_and_interest + monthly_taxes + monthly_insurance + hoa + flood,
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

    // VA prepaid interest accrues on the financed total, funding fee included.
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
            defaults: book.fees.for_program(Program::Va, Scenario::Refinance),
            overrides: &input.fees,
            prepaids,
            misc_fee: Decimal::ZERO,
            price_basis: input.property_value,
            credits: &input.credits,
            total_override: input.closing_costs_total,
        },
        &mut warnings,
    );

    let cash_to_close = refinance_cash_to_close(
        input.existing_loan_balance,
        closing_costs.net_closing_costs,
        funding_fee,
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
        program_fee: Some(funding_fee),
        apr: None,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "usage": input.usage,
        "is_disabled_veteran": input.is_disabled_veteran,
        "is_irrrl": input.is_irrrl,
        "is_cash_out": is_cash_out,
        "funding_fee_rate_percent": fee_rate,
        "down_payment_percent_substitute": equity_percent,
        "prepaid_interest_days": interest_days,
        "tax_reserve_months": tax_months,
        "insurance_reserve_months": insurance_months,
        "prepaid_interest_basis": "total_loan_amount",
    });
    Ok(with_metadata(
        "VA Refinance (IRRRL/cash-out aware funding fee)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
