//! Statistical price estimate over comparable sales
//!
//! Outliers are dropped with the 1.5 x IQR rule and the median of what
//! remains is the estimate.

use crate::model::{PriceEstimate, VehicleRecord};

/// Multiplier applied to the IQR to place the outlier fences
pub const IQR_FENCE: f64 = 1.5;

/// Quantile of an ascending slice using linear interpolation between
/// closest ranks (position `(n - 1) * q`).
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(values);
    quantile(&sorted, 0.5)
}

/// Lower and upper outlier fences: `Q1 - 1.5*IQR` and `Q3 + 1.5*IQR`
pub fn iqr_bounds(prices: &[f64]) -> Option<(f64, f64)> {
    let sorted = sorted_copy(prices);
    let q1 = quantile(&sorted, 0.25)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr))
}

/// Median of the prices inside the IQR fences.
///
/// Falls back to the median of all prices if the fences exclude everything.
/// Returns `None` only for empty input.
pub fn estimate_from_prices(prices: &[f64]) -> Option<f64> {
    let (lower, upper) = iqr_bounds(prices)?;
    let kept: Vec<f64> = prices
        .iter()
        .copied()
        .filter(|p| *p >= lower && *p <= upper)
        .collect();

    if kept.is_empty() {
        median(prices)
    } else {
        median(&kept)
    }
}

pub fn estimate_from_comparables(records: &[VehicleRecord]) -> Option<PriceEstimate> {
    let prices: Vec<f64> = records.iter().map(|r| r.sale_price).collect();
    estimate_from_prices(&prices).map(|price| PriceEstimate::from_comparables(price, records.len()))
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceSource;
    use proptest::prelude::*;

    #[test]
    fn test_quantiles_interpolate_linearly() {
        let sorted = [10000.0, 10500.0, 11000.0, 50000.0];
        assert!((quantile(&sorted, 0.25).unwrap() - 10375.0).abs() < 1e-9);
        assert!((quantile(&sorted, 0.75).unwrap() - 20750.0).abs() < 1e-9);
        assert!((quantile(&sorted, 0.5).unwrap() - 10750.0).abs() < 1e-9);
    }

    #[test]
    fn test_outlier_is_dropped() {
        let estimate = estimate_from_prices(&[10000.0, 10500.0, 11000.0, 50000.0]).unwrap();
        assert!((estimate - 10500.0).abs() < 1e-9);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let estimate = estimate_from_prices(&[50000.0, 11000.0, 10000.0, 10500.0]).unwrap();
        assert!((estimate - 10500.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_comparable_is_exact() {
        assert_eq!(estimate_from_prices(&[12345.67]), Some(12345.67));
        assert_eq!(iqr_bounds(&[12345.67]), Some((12345.67, 12345.67)));
    }

    #[test]
    fn test_empty_input_has_no_estimate() {
        assert_eq!(estimate_from_prices(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_even_count_median_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_estimate_from_comparables_counts_vehicles() {
        let record = |price: f64| VehicleRecord {
            vin: "1HGBH41JXMN109186".to_string(),
            year: 2020,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            sale_price: price,
            run_condition: String::new(),
            title_type: String::new(),
            damage_description: String::new(),
            odometer: Some(0.0),
            fuel_type: String::new(),
        };
        let records = vec![record(8000.0), record(9000.0), record(10000.0)];

        let estimate = estimate_from_comparables(&records).unwrap();
        assert_eq!(estimate.price, 9000.0);
        assert_eq!(estimate.source, PriceSource::Comparables { vehicle_count: 3 });
        assert!(estimate_from_comparables(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_estimate_within_input_range(
            prices in proptest::collection::vec(0.0f64..1_000_000.0, 1..50)
        ) {
            let estimate = estimate_from_prices(&prices).unwrap();
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(estimate >= min && estimate <= max);
        }

        #[test]
        fn prop_repeated_price_is_exact(price in 0.0f64..1_000_000.0, n in 1usize..20) {
            let prices = vec![price; n];
            prop_assert_eq!(estimate_from_prices(&prices), Some(price));
        }
    }
}
