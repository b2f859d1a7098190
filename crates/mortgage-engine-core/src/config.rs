//! The rate-and-fee book supplied by the caller on every calculation.
//!
//! The engine never fetches configuration itself: a `RateBook` is always
//! passed in, read-only for the duration of the call. `RateBook::default()`
//! carries the historical book so tests and offline tooling can run without
//! a configuration service.
//!
//! Every rate in the book is an annual percentage (`dec!(0.55)` = 0.55%),
//! never a fraction.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{CreditTier, Money, Percent, Program, Rate, Scenario, VaUsage};

// ---------------------------------------------------------------------------
// PMI (Conventional)
// ---------------------------------------------------------------------------

/// Annual PMI rates by borrower credit tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTierRates {
    pub excellent: Rate,
    pub good: Rate,
    pub fair: Rate,
}

impl CreditTierRates {
    pub fn for_tier(&self, tier: CreditTier) -> Rate {
        match tier {
            CreditTier::Excellent => self.excellent,
            CreditTier::Good => self.good,
            CreditTier::Fair => self.fair,
        }
    }
}

/// PMI rates by LTV band for one loan class (conforming or jumbo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmiBandRates {
    /// LTV ≥ 95.
    pub ltv_gte_95: CreditTierRates,
    /// 90 ≤ LTV < 95.
    pub ltv_gte_90: CreditTierRates,
    /// 80 < LTV < 90.
    pub ltv_gt_80: CreditTierRates,
}

/// Full PMI lookup table: conforming/jumbo split on the conforming loan
/// limit, LTV bands, credit tiers, and the conforming high-balance sub-split
/// at LTV ≥ 95.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmiRateTable {
    pub conforming: PmiBandRates,
    pub jumbo: PmiBandRates,
    /// Conforming balances above this get the high-balance rates at LTV ≥ 95.
    pub high_balance_threshold: Money,
    pub conforming_high_balance_gte_95: CreditTierRates,
    /// One-time single-premium PMI = annual rate × this multiplier.
    pub single_premium_multiplier: Decimal,
}

// ---------------------------------------------------------------------------
// FHA
// ---------------------------------------------------------------------------

/// FHA upfront and annual mortgage insurance premium rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhaMipRates {
    pub ufmip_purchase: Rate,
    pub ufmip_standard_refinance: Rate,
    pub ufmip_streamline_refinance: Rate,
    /// Annual MIP for base loans at or below the high-balance threshold.
    pub annual_base: Rate,
    /// Annual MIP for base loans above the high-balance threshold.
    pub annual_high_balance: Rate,
    pub high_balance_threshold: Money,
    pub annual_streamline: Rate,
}

/// FHA loan limits. Carried for callers and validators; the engine itself
/// does not enforce them (bounds validation is external).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhaLoanLimits {
    pub standard: Money,
    pub high_cost: Money,
}

// ---------------------------------------------------------------------------
// VA
// ---------------------------------------------------------------------------

/// VA funding-fee rates by down-payment tier for one usage class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaDownPaymentTiers {
    /// Down payment below 5%.
    pub down_lt_5: Rate,
    /// Down payment 5–9.99%.
    pub down_5_to_10: Rate,
    /// Down payment 10% or more.
    pub down_gte_10: Rate,
}

impl VaDownPaymentTiers {
    pub fn for_down_payment(&self, down_payment_percent: Percent) -> Rate {
        if down_payment_percent >= dec!(10) {
            self.down_gte_10
        } else if down_payment_percent >= dec!(5) {
            self.down_5_to_10
        } else {
            self.down_lt_5
        }
    }
}

/// VA funding-fee table: usage tiers, the flat IRRRL rate, and the separate
/// cash-out rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaFundingFeeTable {
    pub first_use: VaDownPaymentTiers,
    pub subsequent_use: VaDownPaymentTiers,
    /// Fixed rate for Interest Rate Reduction Refinance Loans, independent of
    /// down payment.
    pub irrrl: Rate,
    pub cash_out_first_use: Rate,
    pub cash_out_subsequent_use: Rate,
}

impl VaFundingFeeTable {
    pub fn tiers_for(&self, usage: VaUsage) -> &VaDownPaymentTiers {
        match usage {
            VaUsage::First => &self.first_use,
            VaUsage::Subsequent => &self.subsequent_use,
        }
    }

    pub fn cash_out_rate(&self, usage: VaUsage) -> Rate {
        match usage {
            VaUsage::First => self.cash_out_first_use,
            VaUsage::Subsequent => self.cash_out_subsequent_use,
        }
    }
}

// ---------------------------------------------------------------------------
// Fee defaults
// ---------------------------------------------------------------------------

/// Default closing-fee amounts for one {program, scenario} pair. Every line
/// is overridable per field on the calculation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDefaults {
    pub processing: Money,
    pub underwriting: Money,
    pub appraisal: Money,
    pub credit_report: Money,
    pub flood_certification: Money,
    pub tax_service: Money,
    pub title: Money,
    pub escrow: Money,
    pub recording: Money,
}

/// One fee-defaults table keyed by {program, scenario}, replacing the
/// historical per-engine literal blocks. The slight per-program variations
/// are data, not code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDefaultsTable {
    pub conventional_purchase: FeeDefaults,
    pub conventional_refinance: FeeDefaults,
    pub fha_purchase: FeeDefaults,
    pub fha_refinance: FeeDefaults,
    pub va_purchase: FeeDefaults,
    pub va_refinance: FeeDefaults,
}

impl FeeDefaultsTable {
    pub fn for_program(&self, program: Program, scenario: Scenario) -> &FeeDefaults {
        match (program, scenario) {
            (Program::Conventional, Scenario::Purchase) => &self.conventional_purchase,
            (Program::Conventional, Scenario::Refinance) => &self.conventional_refinance,
            (Program::Fha, Scenario::Purchase) => &self.fha_purchase,
            (Program::Fha, Scenario::Refinance) => &self.fha_refinance,
            (Program::Va, Scenario::Purchase) => &self.va_purchase,
            (Program::Va, Scenario::Refinance) => &self.va_refinance,
        }
    }
}

// ---------------------------------------------------------------------------
// Reserve defaults
// ---------------------------------------------------------------------------

/// Default prepaid periods and the price-driven escrow fallback rates used
/// when no monthly tax/insurance figure is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveDefaults {
    pub prepaid_interest_days: u32,
    pub tax_reserve_months: u32,
    pub insurance_reserve_months: u32,
    /// Annual property-tax estimate as a percentage of price (1.25 = 1.25%/yr).
    pub annual_tax_rate: Rate,
    /// Annual hazard-insurance estimate as a percentage of price.
    pub annual_insurance_rate: Rate,
}

// ---------------------------------------------------------------------------
// The book
// ---------------------------------------------------------------------------

/// The complete rate/fee book. Immutable per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBook {
    pub conforming_loan_limit: Money,
    pub fha_loan_limits: FhaLoanLimits,
    pub pmi: PmiRateTable,
    pub fha: FhaMipRates,
    pub va: VaFundingFeeTable,
    pub fees: FeeDefaultsTable,
    pub reserves: ReserveDefaults,
}

impl Default for RateBook {
    fn default() -> Self {
        RateBook {
            conforming_loan_limit: dec!(766_550),
            fha_loan_limits: FhaLoanLimits {
                standard: dec!(498_257),
                high_cost: dec!(1_149_825),
            },
            pmi: PmiRateTable {
                conforming: PmiBandRates {
                    ltv_gte_95: CreditTierRates {
                        excellent: dec!(0.58),
                        good: dec!(0.78),
                        fair: dec!(0.96),
                    },
                    ltv_gte_90: CreditTierRates {
                        excellent: dec!(0.46),
                        good: dec!(0.62),
                        fair: dec!(0.78),
                    },
                    ltv_gt_80: CreditTierRates {
                        excellent: dec!(0.32),
                        good: dec!(0.44),
                        fair: dec!(0.58),
                    },
                },
                jumbo: PmiBandRates {
                    ltv_gte_95: CreditTierRates {
                        excellent: dec!(0.75),
                        good: dec!(0.95),
                        fair: dec!(1.15),
                    },
                    ltv_gte_90: CreditTierRates {
                        excellent: dec!(0.62),
                        good: dec!(0.80),
                        fair: dec!(0.98),
                    },
                    ltv_gt_80: CreditTierRates {
                        excellent: dec!(0.48),
                        good: dec!(0.60),
                        fair: dec!(0.75),
                    },
                },
                high_balance_threshold: dec!(500_000),
                conforming_high_balance_gte_95: CreditTierRates {
                    excellent: dec!(0.70),
                    good: dec!(0.90),
                    fair: dec!(1.10),
                },
                single_premium_multiplier: dec!(3.4),
            },
            fha: FhaMipRates {
                ufmip_purchase: dec!(1.75),
                ufmip_standard_refinance: dec!(1.75),
                ufmip_streamline_refinance: dec!(0.55),
                annual_base: dec!(0.55),
                annual_high_balance: dec!(0.75),
                high_balance_threshold: dec!(720_000),
                annual_streamline: dec!(0.55),
            },
            va: VaFundingFeeTable {
                first_use: VaDownPaymentTiers {
                    down_lt_5: dec!(2.15),
                    down_5_to_10: dec!(1.50),
                    down_gte_10: dec!(1.25),
                },
                subsequent_use: VaDownPaymentTiers {
                    down_lt_5: dec!(3.30),
                    down_5_to_10: dec!(1.50),
                    down_gte_10: dec!(1.25),
                },
                irrrl: dec!(0.50),
                cash_out_first_use: dec!(2.15),
                cash_out_subsequent_use: dec!(3.30),
            },
            fees: FeeDefaultsTable {
                conventional_purchase: FeeDefaults {
                    processing: dec!(995),
                    underwriting: dec!(995),
                    appraisal: dec!(550),
                    credit_report: dec!(65),
                    flood_certification: dec!(18),
                    tax_service: dec!(85),
                    title: dec!(1250),
                    escrow: dec!(850),
                    recording: dec!(185),
                },
                conventional_refinance: FeeDefaults {
                    processing: dec!(995),
                    underwriting: dec!(995),
                    appraisal: dec!(550),
                    credit_report: dec!(65),
                    flood_certification: dec!(18),
                    tax_service: dec!(85),
                    title: dec!(950),
                    escrow: dec!(650),
                    recording: dec!(125),
                },
                fha_purchase: FeeDefaults {
                    processing: dec!(995),
                    underwriting: dec!(895),
                    appraisal: dec!(600),
                    credit_report: dec!(65),
                    flood_certification: dec!(18),
                    tax_service: dec!(85),
                    title: dec!(1250),
                    escrow: dec!(850),
                    recording: dec!(185),
                },
                fha_refinance: FeeDefaults {
                    processing: dec!(995),
                    underwriting: dec!(895),
                    appraisal: dec!(600),
                    credit_report: dec!(65),
                    flood_certification: dec!(18),
                    tax_service: dec!(85),
                    title: dec!(950),
                    escrow: dec!(650),
                    recording: dec!(125),
                },
                va_purchase: FeeDefaults {
                    processing: dec!(995),
                    underwriting: dec!(925),
                    appraisal: dec!(650),
                    credit_report: dec!(65),
                    flood_certification: dec!(18),
                    tax_service: dec!(85),
                    title: dec!(1250),
                    escrow: dec!(850),
                    recording: dec!(185),
                },
                va_refinance: FeeDefaults {
                    processing: dec!(995),
                    underwriting: dec!(925),
                    appraisal: dec!(650),
                    credit_report: dec!(65),
                    flood_certification: dec!(18),
                    tax_service: dec!(85),
                    title: dec!(950),
                    escrow: dec!(650),
                    recording: dec!(125),
                },
            },
            reserves: ReserveDefaults {
                prepaid_interest_days: 15,
                tax_reserve_months: 3,
                insurance_reserve_months: 12,
                annual_tax_rate: dec!(1.25),
                annual_insurance_rate: dec!(0.35),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_book_anchors() {
        let book = RateBook::default();
        assert_eq!(book.conforming_loan_limit, dec!(766_550));
        assert_eq!(book.pmi.high_balance_threshold, dec!(500_000));
        assert_eq!(book.fha.ufmip_purchase, dec!(1.75));
        assert_eq!(book.fha.high_balance_threshold, dec!(720_000));
        assert_eq!(book.va.irrrl, dec!(0.50));
    }

    #[test]
    fn test_va_tier_boundaries() {
        let tiers = RateBook::default().va.first_use;
        assert_eq!(tiers.for_down_payment(dec!(10)), dec!(1.25));
        assert_eq!(tiers.for_down_payment(dec!(9.99)), dec!(1.50));
        assert_eq!(tiers.for_down_payment(dec!(5)), dec!(1.50));
        assert_eq!(tiers.for_down_payment(dec!(4.99)), dec!(2.15));
        assert_eq!(tiers.for_down_payment(dec!(0)), dec!(2.15));
    }

    #[test]
    fn test_fee_table_keying() {
        let book = RateBook::default();
        let conv = book
            .fees
            .for_program(Program::Conventional, Scenario::Purchase);
        let va_refi = book.fees.for_program(Program::Va, Scenario::Refinance);
        assert_eq!(conv.title, dec!(1250));
        assert_eq!(va_refi.title, dec!(950));
        assert_eq!(va_refi.underwriting, dec!(925));
    }

    #[test]
    fn test_book_round_trips_through_json() {
        let book = RateBook::default();
        let json = serde_json::to_string(&book).unwrap();
        let back: RateBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }
}
