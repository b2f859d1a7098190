//! VA funding-fee rate lookup.
//!
//! Tier order: the disabled-veteran waiver beats everything, IRRRL beats
//! cash-out, cash-out beats the ordinary down-payment tiers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::VaFundingFeeTable;
use crate::primitives::round_to_cents;
use crate::types::{Money, Percent, Rate, VaUsage};

/// Flags describing the loan for rate selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundingFeeTerms {
    pub usage: VaUsage,
    pub is_disabled_veteran: bool,
    pub is_irrrl: bool,
    pub is_cash_out: bool,
}

/// Funding-fee rate (annual-percentage form applied once to the base loan).
/// Exactly zero for disabled veterans regardless of every other flag.
pub fn funding_fee_rate(
    table: &VaFundingFeeTable,
    terms: FundingFeeTerms,
    down_payment_percent: Percent,
) -> Rate {
    if terms.is_disabled_veteran {
        return Decimal::ZERO;
    }
    if terms.is_irrrl {
        return table.irrrl;
    }
    if terms.is_cash_out {
        return table.cash_out_rate(terms.usage);
    }
    table.tiers_for(terms.usage).for_down_payment(down_payment_percent)
}

/// One-time funding fee on the base loan, rounded to cents.
pub fn funding_fee_amount(base_loan: Money, rate: Rate) -> Money {
    round_to_cents(base_loan * rate / dec!(100))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateBook;

    fn table() -> VaFundingFeeTable {
        RateBook::default().va
    }

    #[test]
    fn test_disabled_veteran_waiver_beats_every_tier() {
        let t = table();
        for usage in [VaUsage::First, VaUsage::Subsequent] {
            for (irrrl, cash_out) in [(false, false), (true, false), (false, true)] {
                let terms = FundingFeeTerms {
                    usage,
                    is_disabled_veteran: true,
                    is_irrrl: irrrl,
                    is_cash_out: cash_out,
                };
                assert_eq!(funding_fee_rate(&t, terms, dec!(0)), Decimal::ZERO);
                assert_eq!(funding_fee_rate(&t, terms, dec!(20)), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_purchase_tiers() {
        let t = table();
        let first = FundingFeeTerms::default();
        assert_eq!(funding_fee_rate(&t, first, dec!(0)), dec!(2.15));
        assert_eq!(funding_fee_rate(&t, first, dec!(5)), dec!(1.50));
        assert_eq!(funding_fee_rate(&t, first, dec!(10)), dec!(1.25));

        let subsequent = FundingFeeTerms {
            usage: VaUsage::Subsequent,
            ..Default::default()
        };
        assert_eq!(funding_fee_rate(&t, subsequent, dec!(0)), dec!(3.30));
        assert_eq!(funding_fee_rate(&t, subsequent, dec!(10)), dec!(1.25));
    }

    #[test]
    fn test_irrrl_rate_ignores_down_payment() {
        let t = table();
        let terms = FundingFeeTerms {
            is_irrrl: true,
            ..Default::default()
        };
        assert_eq!(funding_fee_rate(&t, terms, dec!(0)), dec!(0.50));
        assert_eq!(funding_fee_rate(&t, terms, dec!(15)), dec!(0.50));
    }

    #[test]
    fn test_cash_out_rates_by_usage() {
        let t = table();
        let first = FundingFeeTerms {
            is_cash_out: true,
            ..Default::default()
        };
        let subsequent = FundingFeeTerms {
            usage: VaUsage::Subsequent,
            is_cash_out: true,
            ..Default::default()
        };
        assert_eq!(funding_fee_rate(&t, first, dec!(0)), dec!(2.15));
        assert_eq!(funding_fee_rate(&t, subsequent, dec!(0)), dec!(3.30));
    }

    #[test]
    fn test_fee_amount() {
        // 400,000 × 2.15% = 8,600.00
        assert_eq!(funding_fee_amount(dec!(400_000), dec!(2.15)), dec!(8600));
    }
}
