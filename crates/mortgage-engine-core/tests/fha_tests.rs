use mortgage_engine_core::config::RateBook;
use mortgage_engine_core::fha::{
    calculate_fha_purchase, calculate_fha_refinance, FhaPurchaseInput, FhaRefinanceInput,
};
use mortgage_engine_core::primitives::{monthly_principal_and_interest, prepaid_interest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn minimum_down_purchase() -> FhaPurchaseInput {
    // $400,000 at the 3.5% FHA minimum, 6.5% for 30 years.
    FhaPurchaseInput {
        sale_price: dec!(400_000),
        down_payment_percent: Some(dec!(3.5)),
        interest_rate: dec!(6.5),
        term_years: 30,
        ..Default::default()
    }
}

#[test]
fn test_reference_ufmip_scenario() {
    let book = RateBook::default();
    let result = calculate_fha_purchase(&minimum_down_purchase(), &book)
        .unwrap()
        .result;

    // base = 400,000 − 14,000; UFMIP = 386,000 × 1.75% = 6,755.00.
    assert_eq!(result.down_payment, dec!(14_000));
    assert_eq!(result.loan_amount, dec!(386_000));
    assert_eq!(result.program_fee, Some(dec!(6755)));
    assert_eq!(result.total_loan_amount, dec!(392_755));
}

#[test]
fn test_pi_and_prepaid_interest_use_financed_total() {
    let book = RateBook::default();
    let result = calculate_fha_purchase(&minimum_down_purchase(), &book)
        .unwrap()
        .result;

    let pi_on_total = monthly_principal_and_interest(dec!(392_755), dec!(6.5), 30).unwrap();
    assert_eq!(result.monthly_payment.principal_and_interest, pi_on_total);

    let accrual_on_total = prepaid_interest(dec!(392_755), dec!(6.5), 15);
    assert_eq!(result.closing_costs.prepaids.prepaid_interest, accrual_on_total);
}

#[test]
fn test_high_balance_mip_tier() {
    let book = RateBook::default();
    let input = FhaPurchaseInput {
        sale_price: dec!(800_000),
        down_payment_percent: Some(dec!(3.5)),
        ..minimum_down_purchase()
    };
    let result = calculate_fha_purchase(&input, &book).unwrap().result;
    // base = 772,000 > 720,000 threshold: 772,000 × 0.75% / 12 = 482.50.
    assert_eq!(result.loan_amount, dec!(772_000));
    assert_eq!(result.monthly_payment.mortgage_insurance, dec!(482.50));
}

#[test]
fn test_monthly_mip_override_wins() {
    let book = RateBook::default();
    let input = FhaPurchaseInput {
        monthly_mip_override: Some(dec!(199.99)),
        ..minimum_down_purchase()
    };
    let result = calculate_fha_purchase(&input, &book).unwrap().result;
    assert_eq!(result.monthly_payment.mortgage_insurance, dec!(199.99));
}

#[test]
fn test_apr_reported_above_note_rate() {
    let book = RateBook::default();
    let result = calculate_fha_purchase(&minimum_down_purchase(), &book)
        .unwrap()
        .result;
    let apr = result.apr.expect("FHA results carry an APR");
    assert!(apr > dec!(6.5), "APR {apr} should exceed the note rate");
}

#[test]
fn test_streamline_refinance_rates() {
    let book = RateBook::default();
    let input = FhaRefinanceInput {
        property_value: dec!(450_000),
        loan_amount: dec!(380_000),
        existing_loan_balance: dec!(370_000),
        interest_rate: dec!(6.0),
        term_years: 30,
        is_streamline: true,
        ..Default::default()
    };
    let result = calculate_fha_refinance(&input, &book).unwrap().result;
    // Streamline UFMIP 0.55%: 380,000 × 0.55% = 2,090.
    assert_eq!(result.program_fee, Some(dec!(2090)));
    assert_eq!(result.total_loan_amount, dec!(382_090));
}

#[test]
fn test_refinance_cash_to_close_interaction() {
    // The financed UFMIP appears in both the amount needed and the new
    // loan; the pinned expectation is existing + net costs − base.
    let book = RateBook::default();
    let input = FhaRefinanceInput {
        property_value: dec!(450_000),
        loan_amount: dec!(380_000),
        existing_loan_balance: dec!(370_000),
        interest_rate: dec!(6.0),
        term_years: 30,
        ..Default::default()
    };
    let result = calculate_fha_refinance(&input, &book).unwrap().result;
    let expected = dec!(370_000) + result.closing_costs.net_closing_costs - dec!(380_000);
    assert_eq!(result.cash_to_close, expected);
}

#[test]
fn test_refinance_reconciliation_override() {
    let book = RateBook::default();
    let input = FhaRefinanceInput {
        property_value: dec!(450_000),
        loan_amount: dec!(380_000),
        existing_loan_balance: dec!(370_000),
        interest_rate: dec!(6.0),
        term_years: 30,
        closing_costs_total: Some(dec!(7_500)),
        ..Default::default()
    };
    let output = calculate_fha_refinance(&input, &book).unwrap();
    let c = &output.result.closing_costs;
    assert_eq!(c.total_closing_costs, dec!(7_500));
    assert_eq!(c.adjustment, dec!(7_500) - c.calculated_total_closing_costs);
    assert!(output.warnings.iter().any(|w| w.contains("override")));
}
