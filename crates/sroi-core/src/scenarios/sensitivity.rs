use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::SroiError;
use crate::sroi::engine::{compute, SroiInput, SroiResult};
use crate::sroi::validation::{validate, ValidationOutcome};
use crate::types::*;
use crate::SroiEngineResult;

/// Upper bound on points per axis; guards against a step of 1e-20.
const MAX_SWEEP_POINTS: usize = 1_000;

/// One swept input parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityAxis {
    pub parameter: SroiField,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl FromStr for SensitivityAxis {
    type Err = SroiError;

    /// Parses `parameter:min:max:step`, e.g. `discount_rate:5:15:2.5`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 4 {
            return Err(SroiError::InvalidInput {
                field: "axis".into(),
                reason: format!("Sensitivity axis must be parameter:min:max:step, got '{spec}'"),
            });
        }
        let parameter = parts[0]
            .parse::<SroiField>()
            .map_err(|reason| SroiError::InvalidInput {
                field: "axis".into(),
                reason,
            })?;
        let number = |raw: &str| {
            Decimal::from_str(raw).map_err(|e| SroiError::InvalidInput {
                field: format!("axis:{}", parameter),
                reason: format!("'{raw}' is not a number: {e}"),
            })
        };
        Ok(SensitivityAxis {
            parameter,
            min: number(parts[1])?,
            max: number(parts[2])?,
            step: number(parts[3])?,
        })
    }
}

/// Which headline metric fills the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SroiMetric {
    Sroi,
    NetBenefit,
    BenefitCostRatio,
    PaybackPeriod,
    PresentValue,
}

impl SroiMetric {
    pub fn value(&self, result: &SroiResult) -> f64 {
        match self {
            SroiMetric::Sroi => result.sroi,
            SroiMetric::NetBenefit => result.net_benefit,
            SroiMetric::BenefitCostRatio => result.benefit_cost_ratio,
            SroiMetric::PaybackPeriod => result.payback_period,
            SroiMetric::PresentValue => result.present_value,
        }
    }
}

impl fmt::Display for SroiMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SroiMetric::Sroi => "sroi",
            SroiMetric::NetBenefit => "net_benefit",
            SroiMetric::BenefitCostRatio => "benefit_cost_ratio",
            SroiMetric::PaybackPeriod => "payback_period",
            SroiMetric::PresentValue => "present_value",
        };
        f.write_str(name)
    }
}

impl FromStr for SroiMetric {
    type Err = SroiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sroi" => Ok(SroiMetric::Sroi),
            "net_benefit" | "netBenefit" => Ok(SroiMetric::NetBenefit),
            "benefit_cost_ratio" | "benefitCostRatio" | "bcr" => Ok(SroiMetric::BenefitCostRatio),
            "payback_period" | "paybackPeriod" | "payback" => Ok(SroiMetric::PaybackPeriod),
            "present_value" | "presentValue" | "pv" => Ok(SroiMetric::PresentValue),
            other => Err(SroiError::InvalidInput {
                field: "output_metric".into(),
                reason: format!("Unknown metric '{other}'"),
            }),
        }
    }
}

/// Input for a 2-way SROI sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SroiSensitivityInput {
    /// Base case; every cell overrides the two swept fields only
    pub base_inputs: SroiInput,
    pub variable_1: SensitivityAxis,
    pub variable_2: SensitivityAxis,
    pub output_metric: SroiMetric,
}

/// Output of 2-way sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: SroiField,
    pub variable_2_name: SroiField,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: SroiMetric,
    /// Matrix[i][j] = metric when variable_1 = variable_1_values[i] and
    /// variable_2 = variable_2_values[j]; `None` where the inputs are invalid
    pub matrix: Vec<Vec<Option<f64>>>,
    /// Value at the grid point nearest the base case
    pub base_case_value: Option<f64>,
    /// Position of the base case in the matrix (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for an axis from min to max with step.
pub fn generate_sweep_values(axis: &SensitivityAxis) -> SroiEngineResult<Vec<Decimal>> {
    if axis.step <= Decimal::ZERO {
        return Err(SroiError::InvalidInput {
            field: format!("variable:{}", axis.parameter),
            reason: "Step must be positive".into(),
        });
    }
    if axis.min > axis.max {
        return Err(SroiError::InvalidInput {
            field: format!("variable:{}", axis.parameter),
            reason: "Min must be <= max".into(),
        });
    }

    let too_many = || SroiError::InvalidInput {
        field: format!("variable:{}", axis.parameter),
        reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points; increase the step"),
    };

    let mut values = Vec::new();
    let mut current = axis.min;
    while current <= axis.max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(too_many());
        }
        values.push(current);
        current += axis.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < axis.max {
            values.push(axis.max);
        }
    }
    if values.len() > MAX_SWEEP_POINTS {
        return Err(too_many());
    }

    Ok(values)
}

/// Find the index of the value closest to `target`.
fn closest_index(values: &[f64], target: f64) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn to_f64_values(axis: &SensitivityAxis, values: &[Decimal]) -> SroiEngineResult<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.to_f64().ok_or_else(|| SroiError::InvalidInput {
                field: format!("variable:{}", axis.parameter),
                reason: format!("{v} is not representable as f64"),
            })
        })
        .collect()
}

/// Evaluate a 2-way grid with a caller-supplied model.
///
/// `eval_fn` receives (variable_1_value, variable_2_value). A cell whose
/// evaluation fails is left as `None` and the failure is returned as a
/// warning string.
pub fn evaluate_sensitivity<F>(
    v1_values: &[f64],
    v2_values: &[f64],
    eval_fn: F,
) -> (Vec<Vec<Option<f64>>>, Vec<String>)
where
    F: Fn(f64, f64) -> SroiEngineResult<f64>,
{
    let mut warnings: Vec<String> = Vec::new();
    let mut matrix = Vec::with_capacity(v1_values.len());

    for v1 in v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in v2_values {
            match eval_fn(*v1, *v2) {
                Ok(val) => row.push(Some(val)),
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({v1}, {v2}): {e}"));
                    row.push(None);
                }
            }
        }
        matrix.push(row);
    }

    (matrix, warnings)
}

/// Sweep two SROI inputs and tabulate one output metric.
pub fn run_sroi_sensitivity(
    input: &SroiSensitivityInput,
) -> SroiEngineResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();

    if input.variable_1.parameter == input.variable_2.parameter {
        return Err(SroiError::InvalidInput {
            field: "variable_2".into(),
            reason: format!(
                "Both axes sweep '{}'; choose two different parameters",
                input.variable_1.parameter
            ),
        });
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;
    if v1_values.is_empty() || v2_values.is_empty() {
        return Err(SroiError::InsufficientData(
            "Sensitivity axes produced no values".into(),
        ));
    }
    let v1_f64 = to_f64_values(&input.variable_1, &v1_values)?;
    let v2_f64 = to_f64_values(&input.variable_2, &v2_values)?;

    let p1 = input.variable_1.parameter;
    let p2 = input.variable_2.parameter;
    let metric = input.output_metric;
    let base = input.base_inputs;

    let (matrix, warnings) = evaluate_sensitivity(&v1_f64, &v2_f64, |a, b| {
        let cell = base.with(p1, a).with(p2, b);
        if let ValidationOutcome::Invalid(errors) = validate(&cell) {
            return Err(SroiError::Validation(errors));
        }
        compute(&cell).map(|result| metric.value(&result))
    });

    let base_row = closest_index(&v1_f64, base.get(p1));
    let base_col = closest_index(&v2_f64, base.get(p2));
    let base_case_value = matrix[base_row][base_col];

    tracing::debug!(
        rows = v1_values.len(),
        cols = v2_values.len(),
        failed_cells = warnings.len(),
        "sroi sensitivity evaluated"
    );

    let output = SensitivityOutput {
        variable_1_name: p1,
        variable_2_name: p2,
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way SROI Sensitivity Analysis",
        &serde_json::json!({
            "base_inputs": base,
            "variable_1": p1,
            "variable_2": p2,
            "output_metric": metric,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> SroiSensitivityInput {
        SroiSensitivityInput {
            base_inputs: SroiInput::default(),
            variable_1: SensitivityAxis {
                parameter: SroiField::DiscountRate,
                min: dec!(5),
                max: dec!(15),
                step: dec!(2.5),
            },
            variable_2: SensitivityAxis {
                parameter: SroiField::Timeframe,
                min: dec!(3),
                max: dec!(7),
                step: dec!(1),
            },
            output_metric: SroiMetric::Sroi,
        }
    }

    #[test]
    fn test_sweep_values_exact_decimal_steps() {
        let axis = SensitivityAxis {
            parameter: SroiField::DiscountRate,
            min: dec!(0.1),
            max: dec!(0.5),
            step: dec!(0.1),
        };
        let values = generate_sweep_values(&axis).unwrap();
        assert_eq!(
            values,
            vec![dec!(0.1), dec!(0.2), dec!(0.3), dec!(0.4), dec!(0.5)]
        );
    }

    #[test]
    fn test_sweep_values_appends_max() {
        let axis = SensitivityAxis {
            parameter: SroiField::Timeframe,
            min: dec!(1),
            max: dec!(10),
            step: dec!(4),
        };
        let values = generate_sweep_values(&axis).unwrap();
        assert_eq!(values, vec![dec!(1), dec!(5), dec!(9), dec!(10)]);
    }

    #[test]
    fn test_sweep_rejects_bad_step() {
        let mut axis = sample_input().variable_1;
        axis.step = Decimal::ZERO;
        assert!(generate_sweep_values(&axis).is_err());

        axis.step = dec!(0.000001);
        assert!(generate_sweep_values(&axis).is_err());
    }

    #[test]
    fn test_sweep_limit_counts_appended_max() {
        // 0, 1, ..., 999 is exactly the limit
        let mut axis = SensitivityAxis {
            parameter: SroiField::AnnualCosts,
            min: dec!(0),
            max: dec!(999),
            step: dec!(1),
        };
        assert_eq!(generate_sweep_values(&axis).unwrap().len(), MAX_SWEEP_POINTS);

        // An off-step max would make it 1001
        axis.max = dec!(999.5);
        assert!(generate_sweep_values(&axis).is_err());
    }

    #[test]
    fn test_axis_from_str() {
        let axis: SensitivityAxis = "discountRate:0:20:5".parse().unwrap();
        assert_eq!(axis.parameter, SroiField::DiscountRate);
        assert_eq!(axis.max, dec!(20));
        assert!("discount_rate:0:20".parse::<SensitivityAxis>().is_err());
        assert!("irr:0:20:5".parse::<SensitivityAxis>().is_err());
        assert!("timeframe:a:20:5".parse::<SensitivityAxis>().is_err());
    }

    #[test]
    fn test_grid_dimensions_and_base_case() {
        let output = run_sroi_sensitivity(&sample_input()).unwrap();
        let out = &output.result;
        // 5, 7.5, 10, 12.5, 15 x 3..=7
        assert_eq!(out.matrix.len(), 5);
        assert_eq!(out.matrix[0].len(), 5);
        assert_eq!(out.base_case_position, (2, 2));

        let base = compute(&SroiInput::default()).unwrap();
        assert_eq!(out.base_case_value, Some(base.sroi));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_sroi_falls_with_rate_and_rises_with_timeframe() {
        let output = run_sroi_sensitivity(&sample_input()).unwrap();
        let m = &output.result.matrix;
        for col in 0..m[0].len() {
            for row in 1..m.len() {
                assert!(m[row][col].unwrap() < m[row - 1][col].unwrap());
            }
        }
        for row in m {
            for col in 1..row.len() {
                assert!(row[col].unwrap() > row[col - 1].unwrap());
            }
        }
    }

    #[test]
    fn test_invalid_cells_are_none_with_warning() {
        let mut input = sample_input();
        input.variable_2 = SensitivityAxis {
            parameter: SroiField::Timeframe,
            min: dec!(0),
            max: dec!(2),
            step: dec!(1),
        };
        let output = run_sroi_sensitivity(&input).unwrap();
        for row in &output.result.matrix {
            assert_eq!(row[0], None);
            assert!(row[1].is_some());
        }
        assert_eq!(output.warnings.len(), 5);
        assert!(output.warnings[0].contains("timeframe"));
    }

    #[test]
    fn test_same_parameter_twice_rejected() {
        let mut input = sample_input();
        input.variable_2.parameter = SroiField::DiscountRate;
        assert!(run_sroi_sensitivity(&input).is_err());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("bcr".parse::<SroiMetric>().unwrap(), SroiMetric::BenefitCostRatio);
        assert_eq!(
            "paybackPeriod".parse::<SroiMetric>().unwrap(),
            SroiMetric::PaybackPeriod
        );
        assert!("irr".parse::<SroiMetric>().is_err());
    }
}
