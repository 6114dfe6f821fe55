//! Output rounding. Ties round away from zero.

/// Decimal places for rates.
pub const RATE_PLACES: i32 = 6;
/// Decimal places for percentage changes.
pub const PCT_PLACES: i32 = 4;

pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

pub fn round_rate(value: f64) -> f64 {
    round_to(value, RATE_PLACES)
}

pub fn round_pct(value: f64) -> f64 {
    round_to(value, PCT_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rounds_to_six_places() {
        assert_eq!(round_rate(1.0344201234), 1.03442);
        assert_eq!(round_rate(1.0344206), 1.034421);
    }

    #[test]
    fn test_pct_rounds_to_four_places() {
        assert_eq!(round_pct(-0.45001), -0.45);
        assert_eq!(round_pct(-0.44566037), -0.4457);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        // 0.125 and 2.5 are exact in binary, so these are true ties.
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }
}
