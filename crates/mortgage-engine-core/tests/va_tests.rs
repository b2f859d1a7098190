use mortgage_engine_core::config::RateBook;
use mortgage_engine_core::va::{
    calculate_va_purchase, calculate_va_refinance, VaPurchaseInput, VaRefinanceInput,
};
use mortgage_engine_core::VaUsage;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn zero_down_purchase() -> VaPurchaseInput {
    VaPurchaseInput {
        sale_price: dec!(400_000),
        interest_rate: dec!(6.25),
        term_years: 30,
        ..Default::default()
    }
}

#[test]
fn test_funding_fee_financed_like_ufmip() {
    let book = RateBook::default();
    let result = calculate_va_purchase(&zero_down_purchase(), &book).unwrap().result;
    // First use, zero down: 400,000 × 2.15% = 8,600.
    assert_eq!(result.program_fee, Some(dec!(8600)));
    assert_eq!(result.total_loan_amount, dec!(408_600));
}

#[test]
fn test_no_monthly_mortgage_insurance_ever() {
    let book = RateBook::default();
    for usage in [VaUsage::First, VaUsage::Subsequent] {
        for down in [None, Some(dec!(3)), Some(dec!(15))] {
            let input = VaPurchaseInput {
                usage,
                down_payment_percent: down,
                ..zero_down_purchase()
            };
            let result = calculate_va_purchase(&input, &book).unwrap().result;
            assert_eq!(result.monthly_payment.mortgage_insurance, Decimal::ZERO);
        }
    }
}

#[test]
fn test_disabled_veteran_waiver_across_flags() {
    let book = RateBook::default();

    // Purchase, any usage and down payment.
    for usage in [VaUsage::First, VaUsage::Subsequent] {
        for down in [None, Some(dec!(7)), Some(dec!(20))] {
            let input = VaPurchaseInput {
                usage,
                is_disabled_veteran: true,
                down_payment_percent: down,
                ..zero_down_purchase()
            };
            let result = calculate_va_purchase(&input, &book).unwrap().result;
            assert_eq!(result.program_fee, Some(Decimal::ZERO));
            assert_eq!(result.total_loan_amount, result.loan_amount);
        }
    }

    // Refinance, IRRRL and cash-out alike.
    for (irrrl, cash_out) in [(false, None), (true, None), (false, Some(dec!(40_000)))] {
        let input = VaRefinanceInput {
            property_value: dec!(450_000),
            loan_amount: dec!(360_000),
            existing_loan_balance: dec!(350_000),
            interest_rate: dec!(6.0),
            term_years: 30,
            is_disabled_veteran: true,
            is_irrrl: irrrl,
            cash_out_amount: cash_out,
            ..Default::default()
        };
        let result = calculate_va_refinance(&input, &book).unwrap().result;
        assert_eq!(result.program_fee, Some(Decimal::ZERO));
    }
}

#[test]
fn test_subsequent_use_zero_down_rate() {
    let book = RateBook::default();
    let input = VaPurchaseInput {
        usage: VaUsage::Subsequent,
        ..zero_down_purchase()
    };
    let result = calculate_va_purchase(&input, &book).unwrap().result;
    // 400,000 × 3.30% = 13,200.
    assert_eq!(result.program_fee, Some(dec!(13_200)));
}

#[test]
fn test_irrrl_refinance_fee_and_cash_to_close() {
    let book = RateBook::default();
    let input = VaRefinanceInput {
        property_value: dec!(450_000),
        loan_amount: dec!(360_000),
        existing_loan_balance: dec!(350_000),
        interest_rate: dec!(6.0),
        term_years: 30,
        is_irrrl: true,
        ..Default::default()
    };
    let result = calculate_va_refinance(&input, &book).unwrap().result;
    assert_eq!(result.program_fee, Some(dec!(1800)));
    // Financed fee cancels: existing + net costs − base loan.
    let expected = dec!(350_000) + result.closing_costs.net_closing_costs - dec!(360_000);
    assert_eq!(result.cash_to_close, expected);
}

#[test]
fn test_cash_out_refinance_detection() {
    let book = RateBook::default();
    let base = VaRefinanceInput {
        property_value: dec!(450_000),
        loan_amount: dec!(360_000),
        existing_loan_balance: dec!(300_000),
        interest_rate: dec!(6.0),
        term_years: 30,
        ..Default::default()
    };

    let cash_out = VaRefinanceInput {
        cash_out_amount: Some(dec!(60_000)),
        ..base.clone()
    };
    let with_cash = calculate_va_refinance(&cash_out, &book).unwrap().result;
    let without = calculate_va_refinance(&base, &book).unwrap().result;

    // Cash-out first use 2.15% vs the ≥10%-equity rate-term tier 1.25%.
    assert_eq!(with_cash.program_fee, Some(dec!(7740)));
    assert_eq!(without.program_fee, Some(dec!(4500)));
}
