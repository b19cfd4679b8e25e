use rust_decimal_macros::dec;
use sroi_core::scenarios::sensitivity::{
    run_sroi_sensitivity, SensitivityAxis, SroiMetric, SroiSensitivityInput,
};
use sroi_core::sroi::engine::SroiInput;
use sroi_core::SroiField;

#[test]
fn test_payback_grid_ignores_discount_rate() {
    let input = SroiSensitivityInput {
        base_inputs: SroiInput::default(),
        variable_1: SensitivityAxis {
            parameter: SroiField::DiscountRate,
            min: dec!(0),
            max: dec!(20),
            step: dec!(5),
        },
        variable_2: SensitivityAxis {
            parameter: SroiField::AnnualCosts,
            min: dec!(0),
            max: dec!(10000),
            step: dec!(5000),
        },
        output_metric: SroiMetric::PaybackPeriod,
    };
    let output = run_sroi_sensitivity(&input).unwrap();
    let m = &output.result.matrix;

    // Payback is undiscounted: every row is identical.
    for row in m {
        assert_eq!(row, &m[0]);
    }
    // 50000 / 30000, 50000 / 25000, 50000 / 20000
    assert_eq!(m[0][1], Some(2.0));
    assert_eq!(m[0][2], Some(2.5));
    assert_eq!(output.result.base_case_position, (2, 1));
}

#[test]
fn test_json_input_round_trip_through_serde() {
    let json = serde_json::json!({
        "base_inputs": {
            "initialInvestment": 50000,
            "annualBenefits": 30000,
            "annualCosts": 5000,
            "timeframe": 5,
            "discountRate": 10
        },
        "variable_1": { "parameter": "discount_rate", "min": "5", "max": "15", "step": "5" },
        "variable_2": { "parameter": "initial_investment", "min": "25000", "max": "75000", "step": "25000" },
        "output_metric": "benefit_cost_ratio"
    });
    let input: SroiSensitivityInput = serde_json::from_value(json).unwrap();
    let output = run_sroi_sensitivity(&input).unwrap();

    assert_eq!(output.result.variable_1_values, vec![dec!(5), dec!(10), dec!(15)]);
    assert_eq!(output.result.base_case_position, (1, 1));
    let bcr = output.result.base_case_value.unwrap();
    assert!((bcr - 1.6493).abs() < 1e-4);
}
