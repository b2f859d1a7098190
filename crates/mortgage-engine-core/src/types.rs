use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as annual percentages (0.55 = 0.55%). Never as fractions.
pub type Rate = Decimal;

/// Percentages of a price or value (20 = 20%).
pub type Percent = Decimal;

/// Loan program family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    Conventional,
    Fha,
    Va,
}

/// Calculation scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Purchase,
    Refinance,
}

/// Borrower credit tier used for PMI rate lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    /// 740+ FICO.
    #[default]
    Excellent,
    /// 680–739 FICO.
    Good,
    /// Below 680 FICO.
    Fair,
}

/// How private mortgage insurance is paid on a Conventional loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PmiType {
    /// Ongoing monthly premium in the payment.
    #[default]
    Monthly,
    /// One-time premium financed into the loan principal.
    SingleFinanced,
    /// One-time premium paid in cash at closing.
    SingleCash,
}

/// VA entitlement usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaUsage {
    #[default]
    First,
    Subsequent,
}

// ---------------------------------------------------------------------------
// Shared input sub-records
// ---------------------------------------------------------------------------

/// Per-field closing-fee overrides. A `Some` value that is strictly positive
/// replaces the configured default for that line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underwriting: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appraisal: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_report: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flood_certification: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_service: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording: Option<Money>,
}

/// Prepaid-period and prepaid-amount overrides. Periods replace the
/// configured defaults outright; amounts win over the computed reserve only
/// when strictly positive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrepaidOverrides {
    /// Days of prepaid interest collected at closing (default 15).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_reserve_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_reserve_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepaid_interest_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_reserve_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_reserve_amount: Option<Money>,
}

/// Seller and lender credits applied against closing costs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditInputs {
    /// Flat seller credit. Wins over the percentage form when positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_credit: Option<Money>,
    /// Seller credit as a percentage of the sale price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_credit_percent: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lender_credit: Option<Money>,
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Monthly housing payment, line by line. Every line is rounded to cents
/// before `total` is summed from the rounded lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPaymentBreakdown {
    pub principal_and_interest: Money,
    pub mortgage_insurance: Money,
    pub taxes: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub flood: Money,
    pub total: Money,
}

/// Lender-charged closing fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenderFeeLines {
    pub processing: Money,
    pub underwriting: Money,
}

/// Third-party closing fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyFeeLines {
    pub appraisal: Money,
    pub credit_report: Money,
    pub flood_certification: Money,
    pub tax_service: Money,
    pub title: Money,
    pub escrow: Money,
    pub recording: Money,
}

/// Prepaid items collected at closing to seed the servicing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaidLines {
    pub prepaid_interest: Money,
    pub tax_reserves: Money,
    pub insurance_reserves: Money,
}

/// Sectioned closing-cost breakdown with the shared override/adjustment
/// reconciliation applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingCostBreakdown {
    pub lender_fees: LenderFeeLines,
    pub third_party_fees: ThirdPartyFeeLines,
    pub prepaids: PrepaidLines,
    /// Program-specific cash item (e.g. single-premium PMI paid at closing).
    pub misc_fee: Money,
    pub total_lender_fees: Money,
    pub total_third_party_fees: Money,
    pub total_prepaids: Money,
    /// Sum of the section subtotals before any manual total override.
    pub calculated_total_closing_costs: Money,
    /// The displayed total: the manual override when one was supplied and
    /// positive, otherwise the calculated total.
    pub total_closing_costs: Money,
    /// Signed `override − calculated` difference; zero when no override.
    pub adjustment: Money,
    pub seller_credit: Money,
    pub lender_credit: Money,
    pub total_credits: Money,
    /// `total_closing_costs − total_credits`.
    pub net_closing_costs: Money,
}

/// One complete calculation result. A value record: constructed once, never
/// mutated, safe to hand straight to display and PDF consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCalculationResult {
    /// Base loan amount before any financed premium.
    pub loan_amount: Money,
    /// Loan amount actually amortised (base plus any financed UFMIP,
    /// funding fee, or single-premium PMI).
    pub total_loan_amount: Money,
    /// Loan-to-value as a percentage of property value (80 = 80%).
    pub ltv: Percent,
    pub down_payment: Money,
    pub monthly_payment: MonthlyPaymentBreakdown,
    pub closing_costs: ClosingCostBreakdown,
    pub cash_to_close: Money,
    /// UFMIP (FHA), funding fee (VA) or single-premium PMI (Conventional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_fee: Option<Money>,
    /// Disclosure APR, populated by the FHA engine only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apr: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Computation envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
