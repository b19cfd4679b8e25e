use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::SroiError;
use crate::sroi::projection::{discounted_break_even_year, project_annual, ProjectionYear};
use crate::sroi::validation::validate;
use crate::time_value::{discount_factor, projection_years};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, SroiField, Years};
use crate::SroiEngineResult;

/// Lower bound of the discount-rate band most social-value appraisals use.
pub const TYPICAL_DISCOUNT_RATE_MIN: Percent = 5.0;
/// Upper bound of the typical discount-rate band.
pub const TYPICAL_DISCOUNT_RATE_MAX: Percent = 15.0;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Investment parameters for one SROI computation.
///
/// Values are taken as given; nothing here enforces the field constraints.
/// Run [`validate`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SroiInput {
    /// Up-front investment at year 0
    #[serde(alias = "initialInvestment")]
    pub initial_investment: Money,
    /// Benefits received at the end of every year
    #[serde(alias = "annualBenefits")]
    pub annual_benefits: Money,
    /// Running costs paid at the end of every year
    #[serde(alias = "annualCosts")]
    pub annual_costs: Money,
    /// Projection horizon in years
    pub timeframe: Years,
    /// Discount rate in percentage points (10 = 10%)
    #[serde(alias = "discountRate")]
    pub discount_rate: Percent,
}

impl Default for SroiInput {
    /// Representative programme: 50k up front, 30k benefits and 5k costs a
    /// year for five years at 10%.
    fn default() -> Self {
        SroiInput {
            initial_investment: 50_000.0,
            annual_benefits: 30_000.0,
            annual_costs: 5_000.0,
            timeframe: 5.0,
            discount_rate: 10.0,
        }
    }
}

impl SroiInput {
    pub fn get(&self, field: SroiField) -> f64 {
        match field {
            SroiField::InitialInvestment => self.initial_investment,
            SroiField::AnnualBenefits => self.annual_benefits,
            SroiField::AnnualCosts => self.annual_costs,
            SroiField::Timeframe => self.timeframe,
            SroiField::DiscountRate => self.discount_rate,
        }
    }

    /// Copy of `self` with one field replaced.
    pub fn with(mut self, field: SroiField, value: f64) -> Self {
        match field {
            SroiField::InitialInvestment => self.initial_investment = value,
            SroiField::AnnualBenefits => self.annual_benefits = value,
            SroiField::AnnualCosts => self.annual_costs = value,
            SroiField::Timeframe => self.timeframe = value,
            SroiField::DiscountRate => self.discount_rate = value,
        }
        self
    }
}

/// The five headline SROI metrics. No rounding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SroiResult {
    /// Net benefit over initial investment, in percent
    pub sroi: Percent,
    /// PV of benefits less initial investment and PV of costs
    pub net_benefit: Money,
    /// PV of benefits over initial investment plus PV of costs
    pub benefit_cost_ratio: f64,
    /// Undiscounted years to recover the initial investment; 0 when never
    pub payback_period: Years,
    /// PV of benefits over the timeframe
    pub present_value: Money,
}

/// Discounted sums of the two annual streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountedStreams {
    pub present_value_benefits: Money,
    pub present_value_costs: Money,
}

/// Reading of the SROI figure for a non-specialist audience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interpretation {
    /// Every unit invested returns `return_per_unit_invested` units.
    PositiveReturn { return_per_unit_invested: f64 },
    NoPositiveReturn,
}

/// Full report produced by [`calculate_sroi`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SroiReport {
    pub metrics: SroiResult,
    /// PV of the annual running costs
    pub present_value_costs: Money,
    /// Initial investment plus PV of costs
    pub total_costs: Money,
    pub interpretation: Interpretation,
    /// First year the cumulative discounted net turns non-negative
    pub discounted_break_even_year: Option<u32>,
    /// One row per whole year, for benefit/cost and cumulative charts
    pub annual_projection: Vec<ProjectionYear>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Discount both annual streams over years `1..=timeframe`.
///
/// The first flow is discounted by one full period; there is no year-0 flow
/// other than the initial investment.
pub fn discount_streams(input: &SroiInput) -> DiscountedStreams {
    let mut present_value_benefits = 0.0;
    let mut present_value_costs = 0.0;

    for year in projection_years(input.timeframe) {
        let factor = discount_factor(input.discount_rate, year);
        present_value_benefits += input.annual_benefits * factor;
        present_value_costs += input.annual_costs * factor;
    }

    DiscountedStreams {
        present_value_benefits,
        present_value_costs,
    }
}

/// Compute the SROI metrics for already-validated input.
///
/// SROI = (PV(benefits) - (I0 + PV(costs))) / I0 * 100
/// BCR = PV(benefits) / (I0 + PV(costs))
/// Payback = I0 / (benefits - costs), or 0 when the annual net is not positive
///
/// Only a zero initial investment is rejected here. Any other constraint
/// violation is the caller's responsibility: a non-positive total cost, for
/// instance, flows straight into the ratio as an IEEE-754 division.
pub fn compute(input: &SroiInput) -> SroiEngineResult<SroiResult> {
    if input.initial_investment == 0.0 {
        tracing::warn!("sroi compute called with zero initial investment");
        return Err(SroiError::InvalidInput {
            field: SroiField::InitialInvestment.to_string(),
            reason: "Initial investment must be non-zero to express SROI as a percentage".into(),
        });
    }

    let streams = discount_streams(input);

    let total_costs = input.initial_investment + streams.present_value_costs;
    let net_benefit = streams.present_value_benefits - total_costs;
    let sroi = (net_benefit / input.initial_investment) * 100.0;
    let benefit_cost_ratio = streams.present_value_benefits / total_costs;

    let annual_net_benefit = input.annual_benefits - input.annual_costs;
    let payback_period = if annual_net_benefit > 0.0 {
        input.initial_investment / annual_net_benefit
    } else {
        0.0
    };

    Ok(SroiResult {
        sroi,
        net_benefit,
        benefit_cost_ratio,
        payback_period: payback_period.max(0.0),
        present_value: streams.present_value_benefits,
    })
}

/// Classify an SROI figure.
pub fn interpret(result: &SroiResult) -> Interpretation {
    if result.sroi > 0.0 {
        Interpretation::PositiveReturn {
            return_per_unit_invested: 1.0 + result.sroi / 100.0,
        }
    } else {
        Interpretation::NoPositiveReturn
    }
}

/// Validate, compute and project in one call.
///
/// Validation failures come back as [`SroiError::Validation`] carrying every
/// failing field.
pub fn calculate_sroi(input: &SroiInput) -> SroiEngineResult<ComputationOutput<SroiReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input).into_result().map_err(SroiError::Validation)?;

    let metrics = compute(input)?;
    let streams = discount_streams(input);
    let annual_projection = project_annual(input);

    // --- Reasonableness warnings ---
    if input.discount_rate < TYPICAL_DISCOUNT_RATE_MIN
        || input.discount_rate > TYPICAL_DISCOUNT_RATE_MAX
    {
        warnings.push(format!(
            "Discount rate of {}% is outside the typical {}-{}% range",
            input.discount_rate, TYPICAL_DISCOUNT_RATE_MIN, TYPICAL_DISCOUNT_RATE_MAX
        ));
    }
    if input.timeframe.fract() != 0.0 {
        warnings.push(format!(
            "Timeframe of {} years is not a whole number; only {} full years are discounted",
            input.timeframe,
            annual_projection.len()
        ));
    }
    if input.annual_benefits - input.annual_costs <= 0.0 {
        warnings.push(
            "Annual costs meet or exceed annual benefits; the investment is never paid back"
                .to_string(),
        );
    }

    tracing::debug!(
        sroi = metrics.sroi,
        net_benefit = metrics.net_benefit,
        years = annual_projection.len(),
        "sroi computed"
    );

    let report = SroiReport {
        interpretation: interpret(&metrics),
        discounted_break_even_year: discounted_break_even_year(&annual_projection),
        present_value_costs: streams.present_value_costs,
        total_costs: input.initial_investment + streams.present_value_costs,
        metrics,
        annual_projection,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "SROI via discounted cash flow (end-of-year discounting)",
        input,
        warnings,
        elapsed,
        report,
    ))
}
