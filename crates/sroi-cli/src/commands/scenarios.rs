use clap::Args;
use serde_json::Value;

use sroi_core::scenarios::sensitivity::{
    self, SensitivityAxis, SroiMetric, SroiSensitivityInput,
};
use sroi_core::sroi::engine::SroiInput;

use crate::input;

/// Arguments for sensitivity analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    /// Path to JSON file with a complete sensitivity request
    #[arg(long)]
    pub input: Option<String>,

    /// First axis in format parameter:min:max:step
    /// (e.g. "discount_rate:5:15:2.5")
    #[arg(long, default_value = "discount_rate:5:15:2.5")]
    pub var1: String,

    /// Second axis in format parameter:min:max:step
    #[arg(long, default_value = "timeframe:3:10:1")]
    pub var2: String,

    /// Metric to tabulate: sroi, net_benefit, benefit_cost_ratio,
    /// payback_period, present_value
    #[arg(long, default_value = "sroi")]
    pub metric: String,

    /// Path to JSON file with base case SROI inputs (defaults otherwise)
    #[arg(long)]
    pub base_inputs: Option<String>,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SroiSensitivityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else {
        let base_inputs: SroiInput = match args.base_inputs {
            Some(ref path) => input::file::read_json(path)?,
            None => SroiInput::default(),
        };
        SroiSensitivityInput {
            base_inputs,
            variable_1: args.var1.parse::<SensitivityAxis>()?,
            variable_2: args.var2.parse::<SensitivityAxis>()?,
            output_metric: args.metric.parse::<SroiMetric>()?,
        }
    };

    let result = sensitivity::run_sroi_sensitivity(&request)?;
    Ok(serde_json::to_value(result)?)
}
