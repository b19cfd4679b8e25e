use serde::{Deserialize, Serialize};

use crate::sroi::engine::SroiInput;
use crate::time_value::{discount_factor, projection_years};
use crate::types::Money;

/// One year of the discounted benefit/cost schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub discount_factor: f64,
    pub discounted_benefits: Money,
    pub discounted_costs: Money,
    /// Discounted benefits less discounted costs for this year
    pub net_discounted: Money,
    /// Running net position, starting from minus the initial investment
    pub cumulative_net_benefit: Money,
}

/// Year-by-year schedule behind the headline metrics.
///
/// Rows cover the same whole years the engine discounts. The final
/// cumulative figure matches `net_benefit` up to summation order.
pub fn project_annual(input: &SroiInput) -> Vec<ProjectionYear> {
    let mut cumulative = -input.initial_investment;

    projection_years(input.timeframe)
        .map(|year| {
            let factor = discount_factor(input.discount_rate, year);
            let discounted_benefits = input.annual_benefits * factor;
            let discounted_costs = input.annual_costs * factor;
            let net_discounted = discounted_benefits - discounted_costs;
            cumulative += net_discounted;

            ProjectionYear {
                year,
                discount_factor: factor,
                discounted_benefits,
                discounted_costs,
                net_discounted,
                cumulative_net_benefit: cumulative,
            }
        })
        .collect()
}

/// First projection year whose cumulative discounted net turns non-negative.
pub fn discounted_break_even_year(projection: &[ProjectionYear]) -> Option<u32> {
    projection
        .iter()
        .find(|row| row.cumulative_net_benefit >= 0.0)
        .map(|row| row.year)
}
