//! Comparable lookup by VIN prefix

use crate::model::VehicleRecord;

/// Number of leading VIN characters two vehicles must share
pub const VIN_PREFIX_LEN: usize = 8;

/// First `VIN_PREFIX_LEN` characters of the trimmed VIN
pub fn vin_prefix(vin: &str) -> &str {
    let trimmed = vin.trim();
    match trimmed.char_indices().nth(VIN_PREFIX_LEN) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}

/// Records whose VIN prefix equals the prefix of `vin`, in dataset order.
///
/// No match is an empty result, not an error.
pub fn find_comparables(vin: &str, records: &[VehicleRecord]) -> Vec<VehicleRecord> {
    let wanted = vin_prefix(vin);
    records
        .iter()
        .filter(|record| vin_prefix(&record.vin) == wanted)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vin: &str, price: f64) -> VehicleRecord {
        VehicleRecord {
            vin: vin.to_string(),
            year: 2019,
            make: "Honda".to_string(),
            model: "Accord".to_string(),
            sale_price: price,
            run_condition: "Run & Drive".to_string(),
            title_type: "Clean".to_string(),
            damage_description: "Front End".to_string(),
            odometer: Some(42000.0),
            fuel_type: "Gas".to_string(),
        }
    }

    #[test]
    fn test_vin_prefix_trims_and_truncates() {
        assert_eq!(vin_prefix("  1HGBH41JXMN109186 "), "1HGBH41J");
        assert_eq!(vin_prefix("1HGB"), "1HGB");
    }

    #[test]
    fn test_matches_first_eight_characters() {
        let records = vec![
            record("1HGBH41JXMN109186", 10000.0),
            record(" 1HGBH41J00000000", 11000.0),
            record("2T1BURHE0JC000001", 9000.0),
            record("1HGBH41K00000000", 12000.0),
        ];

        let found = find_comparables("1HGBH41JXMN109186", &records);
        let prices: Vec<f64> = found.iter().map(|r| r.sale_price).collect();
        assert_eq!(prices, vec![10000.0, 11000.0]);
    }

    #[test]
    fn test_input_vin_is_trimmed() {
        let records = vec![record("1HGBH41JXMN109186", 10000.0)];
        assert_eq!(find_comparables("   1HGBH41JAAAA  ", &records).len(), 1);
    }

    #[test]
    fn test_empty_dataset_returns_empty() {
        assert!(find_comparables("1HGBH41JXMN109186", &[]).is_empty());
    }

    #[test]
    fn test_short_input_does_not_match_longer_vins() {
        let records = vec![record("1HGBH41JXMN109186", 10000.0)];
        assert!(find_comparables("1HGB", &records).is_empty());
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let records = vec![record("1hgbh41jxmn109186", 10000.0)];
        assert!(find_comparables("1HGBH41JXMN109186", &records).is_empty());
    }
}
