use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Currency amounts. Plain binary64 so results match the dashboard bit for bit.
pub type Money = f64;

/// Rates expressed in percentage points (10.0 = 10%). Never as decimals.
pub type Percent = f64;

/// Year counts. Fractional values are accepted on input, see `timeframe`.
pub type Years = f64;

/// The five caller-supplied SROI parameters, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SroiField {
    InitialInvestment,
    AnnualBenefits,
    AnnualCosts,
    Timeframe,
    DiscountRate,
}

impl SroiField {
    pub const ALL: [SroiField; 5] = [
        SroiField::InitialInvestment,
        SroiField::AnnualBenefits,
        SroiField::AnnualCosts,
        SroiField::Timeframe,
        SroiField::DiscountRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SroiField::InitialInvestment => "initial_investment",
            SroiField::AnnualBenefits => "annual_benefits",
            SroiField::AnnualCosts => "annual_costs",
            SroiField::Timeframe => "timeframe",
            SroiField::DiscountRate => "discount_rate",
        }
    }
}

impl fmt::Display for SroiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SroiField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial_investment" | "initialInvestment" => Ok(SroiField::InitialInvestment),
            "annual_benefits" | "annualBenefits" => Ok(SroiField::AnnualBenefits),
            "annual_costs" | "annualCosts" => Ok(SroiField::AnnualCosts),
            "timeframe" => Ok(SroiField::Timeframe),
            "discount_rate" | "discountRate" => Ok(SroiField::DiscountRate),
            other => Err(format!("Unknown SROI parameter '{other}'")),
        }
    }
}

/// Per-field validation failures, keyed in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<SroiField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: SroiField, reason: impl Into<String>) {
        self.0.insert(field, reason.into());
    }

    pub fn get(&self, field: SroiField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: SroiField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = SroiField> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, reason)| format!("{field}: {reason}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
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
            precision: "ieee754_binary64".to_string(),
        },
    }
}
