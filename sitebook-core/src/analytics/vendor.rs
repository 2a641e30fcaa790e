//! Vendor aggregation.

use std::collections::BTreeMap;

use serde::Serialize;

use super::metrics::{average, group_count, sum};
use crate::types::Vendor;

/// Minimum rating counted as "top rated".
pub const TOP_RATED_THRESHOLD: f64 = 4.0;

/// Statistics over all vendors.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStats {
    pub total: i64,
    /// Vendor count per category
    pub by_category: BTreeMap<String, i64>,
    pub total_rating: f64,
    pub average_rating: f64,
    /// Vendors rated at or above [`TOP_RATED_THRESHOLD`]
    pub top_rated: i64,
}

impl VendorStats {
    pub fn from_vendors(vendors: &[Vendor]) -> Self {
        Self {
            total: vendors.len() as i64,
            by_category: group_count(vendors, |v| v.category.as_deref()),
            total_rating: sum(vendors, |v| v.rating),
            average_rating: average(vendors, |v| v.rating),
            top_rated: vendors
                .iter()
                .filter(|v| v.rating >= TOP_RATED_THRESHOLD)
                .count() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(category: Option<&str>, rating: f64) -> Vendor {
        Vendor {
            category: category.map(str::to_string),
            rating,
            ..Default::default()
        }
    }

    #[test]
    fn test_vendor_stats() {
        let vendors = vec![
            vendor(Some("Concrete"), 5.0),
            vendor(Some("Concrete"), 3.0),
            vendor(Some("Electrical"), 4.0),
            vendor(None, 2.0),
        ];
        let stats = VendorStats::from_vendors(&vendors);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_category.get("Concrete"), Some(&2));
        assert_eq!(stats.by_category.get("unknown"), Some(&1));
        assert_eq!(stats.total_rating, 14.0);
        assert_eq!(stats.average_rating, 3.5);
        assert_eq!(stats.top_rated, 2);
    }

    #[test]
    fn test_vendor_stats_empty() {
        let stats = VendorStats::from_vendors(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.top_rated, 0);
    }
}
