use crate::types::{Percent, Years};

/// Discount factor for a cash flow received at the end of `year`.
///
/// `(1 + rate/100)^(-year)`. A zero rate yields exactly 1.0 for every year
/// through the power formula itself, no special case.
pub fn discount_factor(rate: Percent, year: u32) -> f64 {
    (1.0 + rate / 100.0).powf(-f64::from(year))
}

/// Longest horizon the engine will discount, in whole years.
pub const MAX_PROJECTION_YEARS: u32 = 1_000;

/// Whole projection years `1, 2, ...` while `year <= timeframe`.
///
/// A fractional timeframe covers only its completed years; a non-positive or
/// NaN timeframe yields nothing. Never yields past `MAX_PROJECTION_YEARS`,
/// which validation enforces as the upper bound on `timeframe`.
pub fn projection_years(timeframe: Years) -> impl Iterator<Item = u32> {
    (1..=MAX_PROJECTION_YEARS).take_while(move |&year| f64::from(year) <= timeframe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_factor_ten_percent() {
        // 1 / 1.1^2 = 0.826446...
        assert!((discount_factor(10.0, 2) - 0.826_446_281).abs() < 1e-9);
    }

    #[test]
    fn test_discount_factor_zero_rate() {
        for year in 1..=30 {
            assert_eq!(discount_factor(0.0, year), 1.0);
        }
    }

    #[test]
    fn test_projection_years_whole() {
        let years: Vec<u32> = projection_years(5.0).collect();
        assert_eq!(years, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_projection_years_fractional() {
        let years: Vec<u32> = projection_years(2.7).collect();
        assert_eq!(years, vec![1, 2]);
        assert_eq!(projection_years(0.5).count(), 0);
        assert_eq!(projection_years(f64::NAN).count(), 0);
        assert_eq!(projection_years(-3.0).count(), 0);
    }

    #[test]
    fn test_projection_years_bounded_beyond_u32() {
        let years: Vec<u32> = projection_years(4_294_967_296.0).collect();
        assert_eq!(years.len(), MAX_PROJECTION_YEARS as usize);
        assert_eq!(years.last(), Some(&MAX_PROJECTION_YEARS));
        assert_eq!(projection_years(f64::INFINITY).count(), 1_000);
    }
}
