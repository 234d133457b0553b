//! Derived ship rating.

use chrono::{Datelike, NaiveDateTime};

use crate::audit::MAX_PROD_YEAR;

/// Compute the ship rating from speed, usage and production year.
///
/// `rating = 80 * speed * k / (3019 - prod_year + 1)` with `k = 0.5` for a
/// used ship and `1.0` otherwise, rounded half-up to two decimals.
///
/// Precondition: the production year has already been audited, so the
/// denominator is at least 1.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: NaiveDateTime) -> f64 {
    let k = if is_used { 0.5 } else { 1.0 };
    let age_factor = f64::from(MAX_PROD_YEAR - prod_date.year() + 1);
    round_half_up(80.0 * speed * k / age_factor)
}

// f64::round is round-half-away-from-zero, which on a non-negative rating is
// exactly round-half-up.
fn round_half_up(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{compute_rating, round_half_up};
    use chrono::{NaiveDate, NaiveDateTime};

    fn prod_date(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 6, 15)
            .expect("valid date")
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn new_ship_rating_matches_formula() {
        // 80 * 0.5 * 1.0 / (3019 - 3000 + 1) = 40 / 20
        assert_eq!(compute_rating(0.5, false, prod_date(3000)), 2.0);
    }

    #[test]
    fn used_ship_rating_is_halved() {
        // 80 * 0.5 * 0.5 / 20
        assert_eq!(compute_rating(0.5, true, prod_date(3000)), 1.0);
    }

    #[test]
    fn newest_year_uses_denominator_one() {
        // 80 * 0.99 / 1
        assert_eq!(compute_rating(0.99, false, prod_date(3019)), 79.2);
    }

    #[test]
    fn rating_rounds_to_two_decimals() {
        // 80 * 0.37 / (3019 - 2900 + 1) = 29.6 / 120 = 0.24666...
        assert_eq!(compute_rating(0.37, false, prod_date(2900)), 0.25);
    }

    #[test]
    fn half_values_round_up() {
        assert_eq!(round_half_up(0.125), 0.13);
        assert_eq!(round_half_up(2.005000001), 2.01);
    }
}
