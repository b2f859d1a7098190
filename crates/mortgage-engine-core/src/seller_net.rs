//! Seller net-proceeds sheet.
//!
//! Independent of the loan engines and of the rate book: debits and credits
//! against the sale price. All raw inputs default to zero when absent, and
//! a negative net is a valid, meaningful result — the seller brings cash to
//! closing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::primitives::{round_to_cents, tax_proration};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SellerNetInput {
    pub sales_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_mortgage_payoff: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_mortgage_payoff: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_liens: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_percent: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_tax: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_warranty: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repairs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc_costs: Option<Money>,
    /// Signed tax proration: positive means the seller owes at closing,
    /// negative means the seller is reimbursed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_proration: Option<Money>,
    /// Used with `closing_date` to derive the proration when no signed
    /// figure is supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_taxes: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,
    /// Credits owed to the seller at closing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_credits: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerNetResult {
    pub sales_price: Money,
    pub total_payoffs: Money,
    pub commission: Money,
    pub total_fixed_costs: Money,
    /// Positive proration owed by the seller, zero otherwise.
    pub proration_debit: Money,
    /// Reimbursement to the seller when the proration is negative.
    pub proration_credit: Money,
    pub total_credits: Money,
    pub net_proceeds: Money,
}

/// Calculate seller net proceeds.
pub fn calculate_seller_net(
    input: &SellerNetInput,
) -> MortgageResult<ComputationOutput<SellerNetResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let amount = |v: Option<Money>| round_to_cents(v.unwrap_or(Decimal::ZERO));

    let sales_price = round_to_cents(input.sales_price);
    let total_payoffs = amount(input.first_mortgage_payoff)
        + amount(input.second_mortgage_payoff)
        + amount(input.other_liens);

    let commission = round_to_cents(
        sales_price * input.commission_percent.unwrap_or(Decimal::ZERO) / dec!(100),
    );
    let total_fixed_costs = amount(input.escrow_fee)
        + amount(input.title_fee)
        + amount(input.recording_fee)
        + amount(input.transfer_tax)
        + amount(input.home_warranty)
        + amount(input.repairs)
        + amount(input.misc_costs);

    // The signed proration splits into a debit (seller owes) or a credit
    // (seller receives). An explicit figure wins; otherwise it is derived
    // from the closing date when the inputs allow.
    let proration = match input.tax_proration {
        Some(value) => round_to_cents(value),
        None => match (input.annual_taxes, input.closing_date) {
            (Some(annual), Some(date)) => tax_proration(annual, date),
            _ => Decimal::ZERO,
        },
    };
    let proration_debit = proration.max(Decimal::ZERO);
    let proration_credit = (-proration).max(Decimal::ZERO);

    let total_credits = amount(input.seller_credits);

    let net_proceeds = round_to_cents(
        sales_price - total_payoffs - (commission + total_fixed_costs) - proration_debit
            + total_credits
            + proration_credit,
    );
    if net_proceeds < Decimal::ZERO {
        warnings.push(format!(
            "Net proceeds are negative ({net_proceeds}); the seller brings cash to closing"
        ));
    }

    let result = SellerNetResult {
        sales_price,
        total_payoffs,
        commission,
        total_fixed_costs,
        proration_debit,
        proration_credit,
        total_credits,
        net_proceeds,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "absent_inputs_default_to_zero": true,
        "proration_day_count": "365",
    });
    Ok(with_metadata(
        "Seller Net Proceeds (debit/credit sheet)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
