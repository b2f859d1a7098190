//! Closing-cost assembly, the override/adjustment reconciliation rule, and
//! cash-to-close. One implementation shared by all three program engines so
//! the semantics cannot drift.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::FeeDefaults;
use crate::primitives::{resolve_override, round_to_cents};
use crate::types::{
    ClosingCostBreakdown, CreditInputs, FeeOverrides, LenderFeeLines, Money, PrepaidLines,
    ThirdPartyFeeLines,
};

/// Everything an engine has resolved before the shared assembly runs.
/// Prepaid lines arrive already rounded to cents.
pub struct ClosingCostInputs<'a> {
    pub defaults: &'a FeeDefaults,
    pub overrides: &'a FeeOverrides,
    pub prepaids: PrepaidLines,
    /// Program-specific cash item (e.g. single-premium PMI paid at closing).
    pub misc_fee: Money,
    /// Basis for a percentage-form seller credit (sale price or value).
    pub price_basis: Money,
    pub credits: &'a CreditInputs,
    /// Manual total override; replaces the displayed total when positive.
    pub total_override: Option<Money>,
}

/// Assemble the sectioned breakdown: per-line override-or-default, section
/// subtotals of rounded lines, the reconciliation adjustment, credits, and
/// the net figure.
pub fn assemble_closing_costs(
    inputs: &ClosingCostInputs<'_>,
    warnings: &mut Vec<String>,
) -> ClosingCostBreakdown {
    let d = inputs.defaults;
    let o = inputs.overrides;

    let line = |manual: Option<Money>, fallback: Money| round_to_cents(resolve_override(manual, fallback));

    let lender_fees = LenderFeeLines {
        processing: line(o.processing, d.processing),
        underwriting: line(o.underwriting, d.underwriting),
    };
    let third_party_fees = ThirdPartyFeeLines {
        appraisal: line(o.appraisal, d.appraisal),
        credit_report: line(o.credit_report, d.credit_report),
        flood_certification: line(o.flood_certification, d.flood_certification),
        tax_service: line(o.tax_service, d.tax_service),
        title: line(o.title, d.title),
        escrow: line(o.escrow, d.escrow),
        recording: line(o.recording, d.recording),
    };

    let total_lender_fees = lender_fees.processing + lender_fees.underwriting;
    let total_third_party_fees = third_party_fees.appraisal
        + third_party_fees.credit_report
        + third_party_fees.flood_certification
        + third_party_fees.tax_service
        + third_party_fees.title
        + third_party_fees.escrow
        + third_party_fees.recording;
    let total_prepaids = inputs.prepaids.prepaid_interest
        + inputs.prepaids.tax_reserves
        + inputs.prepaids.insurance_reserves;

    let misc_fee = round_to_cents(inputs.misc_fee);
    let calculated_total_closing_costs =
        total_lender_fees + total_third_party_fees + total_prepaids + misc_fee;

    // A positive manual total replaces the displayed figure; the signed
    // difference is always surfaced, never discarded.
    let (total_closing_costs, adjustment) = match inputs.total_override {
        Some(manual) if manual > Decimal::ZERO => {
            let total = round_to_cents(manual);
            let adjustment = total - calculated_total_closing_costs;
            if !adjustment.is_zero() {
                warnings.push(format!(
                    "Closing-cost total override {total} differs from calculated {calculated_total_closing_costs} by {adjustment}"
                ));
            }
            (total, adjustment)
        }
        _ => (calculated_total_closing_costs, Decimal::ZERO),
    };

    let seller_credit = round_to_cents(resolve_override(
        inputs.credits.seller_credit,
        inputs.price_basis * inputs.credits.seller_credit_percent.unwrap_or(Decimal::ZERO)
            / dec!(100),
    ));
    let lender_credit = round_to_cents(inputs.credits.lender_credit.unwrap_or(Decimal::ZERO));
    let total_credits = seller_credit + lender_credit;

    ClosingCostBreakdown {
        lender_fees,
        third_party_fees,
        prepaids: inputs.prepaids.clone(),
        misc_fee,
        total_lender_fees,
        total_third_party_fees,
        total_prepaids,
        calculated_total_closing_costs,
        total_closing_costs,
        adjustment,
        seller_credit,
        lender_credit,
        total_credits,
        net_closing_costs: total_closing_costs - total_credits,
    }
}

/// Purchase: `down payment + closing costs − credits − deposit`, cents.
pub fn purchase_cash_to_close(
    down_payment: Money,
    total_closing_costs: Money,
    total_credits: Money,
    deposit_amount: Money,
) -> Money {
    round_to_cents(down_payment + total_closing_costs - total_credits - deposit_amount)
}

/// Refinance: `(existing balance + net closing costs + financed program
/// fee) − total loan amount`. Negative means cash back to the borrower.
pub fn refinance_cash_to_close(
    existing_loan_balance: Money,
    net_closing_costs: Money,
    financed_program_fee: Money,
    total_loan_amount: Money,
) -> Money {
    round_to_cents(existing_loan_balance + net_closing_costs + financed_program_fee - total_loan_amount)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
