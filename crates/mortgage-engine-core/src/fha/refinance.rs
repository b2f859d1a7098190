//! FHA refinance calculation, standard and streamline.
//!
//! The streamline flag selects both the UFMIP rate and the flat streamline
//! annual MIP. The financed UFMIP sits on both sides of the cash-to-close
//! equation — inside `total_loan_amount` and in the amount needed — so it
//! cancels; the tests pin that interaction rather than assuming it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::closing::{assemble_closing_costs, refinance_cash_to_close, ClosingCostInputs};
use crate::config::RateBook;
use crate::fha::{apr, mip};
use crate::primitives::{
    escrow_reserve, loan_to_value, monthly_escrow_figure, monthly_principal_and_interest,
    prepaid_interest, resolve_override, round_to_cents,
};
use crate::types::{
    with_metadata, ComputationOutput, CreditInputs, FeeOverrides, LoanCalculationResult, Money,
    MonthlyPaymentBreakdown, PrepaidLines, PrepaidOverrides, Program, Rate, Scenario,
};
use crate::MortgageResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FhaRefinanceInput {
    pub property_value: Money,
    /// New base loan amount, before the financed UFMIP.
    pub loan_amount: Money,
    pub existing_loan_balance: Money,
    /// Annual note rate as a percentage (6.0 = 6%).
    pub interest_rate: Rate,
    pub term_years: u32,
    /// Streamline refinance (reduced UFMIP, flat annual MIP, lender relies
    /// on the existing FHA case).
    pub is_streamline: bool,
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
    pub closing_costs_total: Option<Money>,
    #[serde(flatten)]
    pub fees: FeeOverrides,
    #[serde(flatten)]
    pub prepaids: PrepaidOverrides,
    #[serde(flatten)]
    pub credits: CreditInputs,
}

/// Calculate an FHA refinance (standard or streamline).
pub fn calculate_fha_refinance(
    input: &FhaRefinanceInput,
    book: &RateBook,
) -> MortgageResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base_loan = input.loan_amount;
    let ltv = loan_to_value(base_loan, input.property_value)?;

    let ufmip_rate = if input.is_streamline {
        book.fha.ufmip_streamline_refinance
    } else {
        book.fha.ufmip_standard_refinance
    };
    let ufmip = mip::ufmip_amount(base_loan, ufmip_rate);
    let total_loan_amount = base_loan + ufmip;

    let principal_and_interest =
        monthly_principal_and_interest(total_loan_amount, input.interest_rate, input.term_years)?;

    let mip_rate = mip::annual_mip_rate(&book.fha, base_loan, input.is_streamline);
    let monthly_mi = round_to_cents(resolve_override(
        input.monthly_mip_override,
        mip::monthly_mip_premium(base_loan, mip_rate),
    ));

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
            defaults: book.fees.for_program(Program::Fha, Scenario::Refinance),
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
        ufmip,
        total_loan_amount,
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
        down_payment: Decimal::ZERO,
        monthly_payment,
        closing_costs,
        cash_to_close,
        program_fee: Some(ufmip),
        apr,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "is_streamline": input.is_streamline,
        "ufmip_rate_percent": ufmip_rate,
        "annual_mip_rate_percent": mip_rate,
        "prepaid_interest_days": interest_days,
        "tax_reserve_months": tax_months,
        "insurance_reserve_months": insurance_months,
        "prepaid_interest_basis": "total_loan_amount",
        "apr": "effective-rate approximation, not TILA",
    });
    Ok(with_metadata(
        "FHA Refinance (financed UFMIP, streamline-aware MIP)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
