//! Scan preprocessing module.
//!
//! Provides filters that clean raw LiDAR scans before they reach the rest of
//! the pipeline.
//!
//! # Pipeline
//!
//! ```text
//! LaserScan → ShadowsFilter → LaserScan (shadow readings set to NaN)
//! ```
//!
//! # ScanFilter Trait
//!
//! All scan filters implement the [`ScanFilter`] trait for consistent interface:
//!
//! ```
//! use chhaya::LaserScan;
//! use chhaya::sensors::preprocessing::{ScanFilter, ShadowsFilter};
//!
//! let filter = ShadowsFilter::default();
//! let scan = LaserScan::uniform(0.0, 0.01, vec![2.0; 16]);
//! let filtered = filter.filter(&scan);
//!
//! assert_eq!(filter.name(), "ShadowsFilter");
//! assert_eq!(filtered.len(), scan.len());
//! ```

mod shadow_detector;
mod shadow_filter;

pub use shadow_detector::ShadowDetector;
pub use shadow_filter::{
    MAX_ANGLE_UPPER, MAX_WINDOW, MIN_ANGLE_LOWER, RIGHT_ANGLE, ShadowFilterConfig,
    ShadowFilterStats, ShadowsFilter,
};

use crate::core::types::LaserScan;

/// Trait for scan filtering operations.
///
/// All scan filters implement this trait, providing a consistent interface
/// for applying filters to laser scans.
pub trait ScanFilter: Send + Sync {
    /// Apply the filter to a laser scan, returning a filtered scan.
    fn filter(&self, scan: &LaserScan) -> LaserScan;

    /// Get the name of this filter for diagnostics.
    fn name(&self) -> &'static str;
}

impl ScanFilter for ShadowsFilter {
    fn filter(&self, scan: &LaserScan) -> LaserScan {
        self.update(scan)
    }

    fn name(&self) -> &'static str {
        "ShadowsFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_boxed(filter: &dyn ScanFilter, scan: &LaserScan) -> LaserScan {
        filter.filter(scan)
    }

    #[test]
    fn test_trait_object_matches_update() {
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            neighbors: 1,
            ..Default::default()
        });
        let scan = LaserScan::uniform(0.0, 0.01, vec![1.0, 1.0, 5.0, 5.0]);

        let via_trait = apply_boxed(&filter, &scan);
        let direct = filter.update(&scan);

        assert_eq!(via_trait.invalid_count(), 1);
        assert_eq!(direct.invalid_count(), 1);
        assert!(via_trait.ranges[2].is_nan() && direct.ranges[2].is_nan());
    }
}
