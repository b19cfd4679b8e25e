//! Human-facing rendering of SROI figures.
//!
//! The engine never rounds; this module does, in `Decimal`, so that
//! `2.05` shows as `2.1` rather than falling victim to its binary
//! representation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use sroi_core::sroi::engine::{Interpretation, SroiReport};

const NOT_AVAILABLE: &str = "n/a";

/// Formatted strings for the five headline figures plus the reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBlock {
    pub sroi: String,
    pub net_benefit: String,
    pub benefit_cost_ratio: String,
    pub payback_period: String,
    pub present_value: String,
    pub interpretation: String,
}

impl DisplayBlock {
    pub fn from_report(report: &SroiReport) -> Self {
        let m = &report.metrics;
        DisplayBlock {
            sroi: format_percent(m.sroi),
            net_benefit: format_money(m.net_benefit),
            benefit_cost_ratio: format_ratio(m.benefit_cost_ratio),
            payback_period: format_fixed(m.payback_period, 1),
            present_value: format_money(m.present_value),
            interpretation: describe(&report.interpretation),
        }
    }
}

/// Round half away from zero and pad to exactly `dp` places.
pub fn round_to(value: f64, dp: u32) -> Option<Decimal> {
    let mut rounded = Decimal::from_f64(value)?
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    Some(rounded)
}

pub fn format_fixed(value: f64, dp: u32) -> String {
    round_to(value, dp)
        .map(|d| d.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `89.539` -> `89.5%`
pub fn format_percent(value: f64) -> String {
    match round_to(value, 1) {
        Some(d) => format!("{d}%"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `1.6493` -> `1.65:1`
pub fn format_ratio(value: f64) -> String {
    match round_to(value, 2) {
        Some(d) => format!("{d}:1"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `44769.669` -> `$44,769.67`, `-1500` -> `-$1,500.00`
pub fn format_money(value: f64) -> String {
    let Some(d) = round_to(value, 2) else {
        return NOT_AVAILABLE.to_string();
    };
    let sign = if d.is_sign_negative() && !d.is_zero() { "-" } else { "" };
    let digits = d.abs().to_string();
    let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{frac}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn describe(interpretation: &Interpretation) -> String {
    match interpretation {
        Interpretation::PositiveReturn {
            return_per_unit_invested,
        } => format!(
            "For every $1 invested, you get {} in return.",
            format_money(*return_per_unit_invested)
        ),
        Interpretation::NoPositiveReturn => {
            "The investment does not generate positive returns.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sroi_core::sroi::engine::{calculate_sroi, SroiInput};

    #[test]
    fn test_round_pads_and_rounds_half_away() {
        assert_eq!(format_fixed(2.0, 1), "2.0");
        assert_eq!(format_fixed(2.05, 1), "2.1");
        assert_eq!(format_fixed(-2.05, 1), "-2.1");
        assert_eq!(format_fixed(f64::NAN, 1), "n/a");
    }

    #[test]
    fn test_money_grouping() {
        assert_eq!(format_money(44_769.669), "$44,769.67");
        assert_eq!(format_money(999.0), "$999.00");
        assert_eq!(format_money(1_000.0), "$1,000.00");
        assert_eq!(format_money(-1_500.0), "-$1,500.00");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(-0.001), "$0.00");
    }

    #[test]
    fn test_display_block_for_representative_programme() {
        let output = calculate_sroi(&SroiInput::default()).unwrap();
        let block = DisplayBlock::from_report(&output.result);
        assert_eq!(
            block,
            DisplayBlock {
                sroi: "89.5%".into(),
                net_benefit: "$44,769.67".into(),
                benefit_cost_ratio: "1.65:1".into(),
                payback_period: "2.0".into(),
                present_value: "$113,723.60".into(),
                interpretation: "For every $1 invested, you get $1.90 in return.".into(),
            }
        );
    }

    #[test]
    fn test_no_positive_return_sentence() {
        assert_eq!(
            describe(&Interpretation::NoPositiveReturn),
            "The investment does not generate positive returns."
        );
    }
}
