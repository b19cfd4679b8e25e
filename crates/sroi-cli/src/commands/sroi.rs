use clap::Args;
use serde_json::{json, Value};

use sroi_core::sroi::engine::{self, SroiInput};
use sroi_core::sroi::validation::{self, ValidationOutcome};

use crate::display::DisplayBlock;
use crate::input;

/// SROI parameters. Unset flags take the representative defaults
/// (50000 / 30000 / 5000 / 5 years / 10%).
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SroiArgs {
    /// Initial investment at year 0
    #[arg(long)]
    pub initial_investment: Option<f64>,

    /// Benefits received each year
    #[arg(long)]
    pub annual_benefits: Option<f64>,

    /// Running costs paid each year
    #[arg(long)]
    pub annual_costs: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    pub timeframe: Option<f64>,

    /// Discount rate in percent (e.g. 10 for 10%)
    #[arg(long)]
    pub discount_rate: Option<f64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the full SROI report
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub params: SroiArgs,

    /// Omit the year-by-year projection from the output
    #[arg(long)]
    pub no_projection: bool,
}

/// Arguments for input validation only
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub params: SroiArgs,
}

/// File, then piped stdin, then flags over defaults.
fn resolve_input(args: &SroiArgs) -> Result<SroiInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin::<SroiInput>()? {
        return Ok(data);
    }
    Ok(from_flags(args))
}

fn from_flags(args: &SroiArgs) -> SroiInput {
    let defaults = SroiInput::default();
    SroiInput {
        initial_investment: args.initial_investment.unwrap_or(defaults.initial_investment),
        annual_benefits: args.annual_benefits.unwrap_or(defaults.annual_benefits),
        annual_costs: args.annual_costs.unwrap_or(defaults.annual_costs),
        timeframe: args.timeframe.unwrap_or(defaults.timeframe),
        discount_rate: args.discount_rate.unwrap_or(defaults.discount_rate),
    }
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sroi_input = resolve_input(&args.params)?;
    let mut output = engine::calculate_sroi(&sroi_input)?;
    let display = DisplayBlock::from_report(&output.result);

    if args.no_projection {
        output.result.annual_projection.clear();
    }

    let mut value = serde_json::to_value(&output)?;
    if let Value::Object(ref mut map) = value {
        map.insert("display".into(), serde_json::to_value(display)?);
    }
    Ok(value)
}

/// Process exit code for `sroi validate`: 1 when any field failed.
pub fn validation_exit_code(valid: bool) -> i32 {
    if valid {
        0
    } else {
        1
    }
}

/// Returns the outcome as JSON together with the process exit code.
pub fn run_validate(args: ValidateArgs) -> Result<(Value, i32), Box<dyn std::error::Error>> {
    let sroi_input = resolve_input(&args.params)?;
    let outcome = validation::validate(&sroi_input);
    let valid = outcome.is_valid();
    let errors = match outcome {
        ValidationOutcome::Valid => json!({}),
        ValidationOutcome::Invalid(errors) => serde_json::to_value(errors)?,
    };
    Ok((
        json!({ "valid": valid, "errors": errors }),
        validation_exit_code(valid),
    ))
}
