use serde::{Deserialize, Serialize};

use crate::sroi::engine::SroiInput;
use crate::time_value::MAX_PROJECTION_YEARS;
use crate::types::{FieldErrors, SroiField};

/// Result of checking an `SroiInput` against its field constraints.
///
/// Failures are data, not errors: every violated field is reported in one
/// pass so a form can flag all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Field errors, empty when valid.
    pub fn errors(&self) -> FieldErrors {
        match self {
            ValidationOutcome::Valid => FieldErrors::default(),
            ValidationOutcome::Invalid(errors) => errors.clone(),
        }
    }

    /// Convert into a `Result`, for callers that want `?`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(errors) => Err(errors),
        }
    }
}

pub const MUST_BE_POSITIVE: &str = "Must be greater than 0";
pub const CANNOT_BE_NEGATIVE: &str = "Cannot be negative";
pub const MUST_BE_FINITE: &str = "Must be a finite number";
pub const HORIZON_TOO_LONG: &str = "Must be at most 1000 years";

/// Check every field independently; never short-circuits.
///
/// | field                | rule  |
/// |----------------------|-------|
/// | `initial_investment` | `> 0` |
/// | `annual_benefits`    | `> 0` |
/// | `annual_costs`       | `>= 0`|
/// | `timeframe`          | `> 0`, `<= 1000` |
/// | `discount_rate`      | `>= 0`|
///
/// Fractional timeframes pass; nothing rounds or truncates them here.
pub fn validate(input: &SroiInput) -> ValidationOutcome {
    let mut errors = FieldErrors::default();

    for field in SroiField::ALL {
        if let Some(reason) = check_field(field, input.get(field)) {
            errors.insert(field, reason);
        }
    }

    if errors.is_empty() {
        ValidationOutcome::Valid
    } else {
        tracing::debug!(failed = errors.len(), "sroi input rejected: {errors}");
        ValidationOutcome::Invalid(errors)
    }
}

fn check_field(field: SroiField, value: f64) -> Option<&'static str> {
    if !value.is_finite() {
        return Some(MUST_BE_FINITE);
    }
    match field {
        SroiField::Timeframe if value > f64::from(MAX_PROJECTION_YEARS) => Some(HORIZON_TOO_LONG),
        SroiField::InitialInvestment | SroiField::AnnualBenefits | SroiField::Timeframe => {
            (value <= 0.0).then_some(MUST_BE_POSITIVE)
        }
        SroiField::AnnualCosts | SroiField::DiscountRate => {
            (value < 0.0).then_some(CANNOT_BE_NEGATIVE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_input_is_valid() {
        assert_eq!(validate(&SroiInput::default()), ValidationOutcome::Valid);
    }

    #[test]
    fn test_zero_costs_and_zero_rate_allowed() {
        let input = SroiInput {
            annual_costs: 0.0,
            discount_rate: 0.0,
            ..SroiInput::default()
        };
        assert!(validate(&input).is_valid());
    }

    #[test]
    fn test_zero_investment_rejected() {
        let input = SroiInput {
            initial_investment: 0.0,
            ..SroiInput::default()
        };
        let errors = validate(&input).errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(SroiField::InitialInvestment),
            Some(MUST_BE_POSITIVE)
        );
    }

    #[test]
    fn test_fractional_timeframe_passes() {
        let input = SroiInput {
            timeframe: 2.5,
            ..SroiInput::default()
        };
        assert!(validate(&input).is_valid());
    }

    #[test]
    fn test_horizon_beyond_cap_rejected() {
        let input = SroiInput {
            timeframe: 4_294_967_296.0,
            ..SroiInput::default()
        };
        let errors = validate(&input).errors();
        assert_eq!(errors.get(SroiField::Timeframe), Some(HORIZON_TOO_LONG));

        let at_cap = SroiInput {
            timeframe: 1_000.0,
            ..SroiInput::default()
        };
        assert!(validate(&at_cap).is_valid());

        let just_over = SroiInput {
            timeframe: 1_000.5,
            ..SroiInput::default()
        };
        assert!(!validate(&just_over).is_valid());
    }

    #[test]
    fn test_non_finite_rejected() {
        let input = SroiInput {
            annual_benefits: f64::NAN,
            discount_rate: f64::INFINITY,
            ..SroiInput::default()
        };
        let errors = validate(&input).errors();
        assert_eq!(errors.get(SroiField::AnnualBenefits), Some(MUST_BE_FINITE));
        assert_eq!(errors.get(SroiField::DiscountRate), Some(MUST_BE_FINITE));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let input = SroiInput {
            timeframe: 0.0,
            ..SroiInput::default()
        };
        let json = serde_json::to_value(validate(&input)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "invalid",
                "errors": { "timeframe": "Must be greater than 0" }
            })
        );
    }
}
