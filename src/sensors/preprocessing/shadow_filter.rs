//! Shadow point removal for LiDAR scans.
//!
//! Compares every reading with its neighbors inside a window of `window`
//! steps on each side using [`ShadowDetector`]. When a pair looks like a
//! grazing-incidence artifact, the farther readings around the triggering
//! point are invalidated (set to NaN). The output always has the input's shape.
//!
//! # Example
//!
//! ```
//! use chhaya::LaserScan;
//! use chhaya::sensors::preprocessing::{ShadowFilterConfig, ShadowsFilter};
//!
//! let filter = ShadowsFilter::new(ShadowFilterConfig {
//!     neighbors: 1,
//!     ..Default::default()
//! });
//!
//! let scan = LaserScan::uniform(0.0, 0.01, vec![1.0, 1.0, 5.0, 5.0]);
//! let filtered = filter.update(&scan);
//!
//! assert_eq!(filtered.len(), scan.len());
//! assert!(filtered.ranges[2].is_nan());
//! ```

use std::collections::BTreeSet;

use parking_lot::Mutex;

use super::shadow_detector::ShadowDetector;
use crate::core::types::LaserScan;

/// Lower bound for `min_angle` in degrees.
pub const MIN_ANGLE_LOWER: f32 = 0.0;
/// Upper bound for `min_angle` and lower bound for `max_angle` in degrees.
pub const RIGHT_ANGLE: f32 = 90.0;
/// Upper bound for `max_angle` in degrees.
pub const MAX_ANGLE_UPPER: f32 = 180.0;
/// Largest accepted `window`; lookup tables hold `2 * window + 1` entries.
pub const MAX_WINDOW: usize = 1 << 16;

/// Configuration for shadow filtering.
///
/// The [`Default`] values serve programmatic construction only. A
/// configuration file must still name `min_angle`, `max_angle` and `window`
/// (see [`ShadowFilterConfig::from_params`]); only `neighbors` and
/// `remove_shadow_start_point` fall back to their defaults there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowFilterConfig {
    /// Lower cone angle in degrees, valid range [0, 90].
    ///
    /// Default: 10°
    pub min_angle: f32,

    /// Upper cone angle in degrees, valid range [90, 180].
    ///
    /// Default: 170°
    pub max_angle: f32,

    /// Number of readings compared on each side of a point, at most
    /// [`MAX_WINDOW`].
    ///
    /// Default: 1
    pub window: usize,

    /// Readings on each side of a shadow start that may be removed
    /// (only those farther than the start).
    ///
    /// Default: 0
    pub neighbors: usize,

    /// Also remove the reading that triggered the detection.
    ///
    /// Default: false
    pub remove_shadow_start_point: bool,
}

impl Default for ShadowFilterConfig {
    fn default() -> Self {
        Self {
            min_angle: 10.0,
            max_angle: 170.0,
            window: 1,
            neighbors: 0,
            remove_shadow_start_point: false,
        }
    }
}

impl ShadowFilterConfig {
    /// Clamp the cone angles and the window into their valid ranges.
    ///
    /// Out-of-range values are logged as errors and replaced by the nearest
    /// bound. A NaN angle is replaced by the bound that makes its side of the
    /// cone narrowest (0° for `min_angle`, 180° for `max_angle`).
    pub fn clamped(mut self) -> Self {
        if self.min_angle.is_nan() {
            log::error!(
                "min_angle must be a number, got NaN. Forcing min_angle = {}",
                MIN_ANGLE_LOWER
            );
            self.min_angle = MIN_ANGLE_LOWER;
        }
        if self.max_angle.is_nan() {
            log::error!(
                "max_angle must be a number, got NaN. Forcing max_angle = {}",
                MAX_ANGLE_UPPER
            );
            self.max_angle = MAX_ANGLE_UPPER;
        }
        if self.min_angle < MIN_ANGLE_LOWER {
            log::error!(
                "min_angle must be {} <= min_angle, got {}. Forcing min_angle = {}",
                MIN_ANGLE_LOWER,
                self.min_angle,
                MIN_ANGLE_LOWER
            );
            self.min_angle = MIN_ANGLE_LOWER;
        }
        if self.min_angle > RIGHT_ANGLE {
            log::error!(
                "min_angle must be min_angle <= {}, got {}. Forcing min_angle = {}",
                RIGHT_ANGLE,
                self.min_angle,
                RIGHT_ANGLE
            );
            self.min_angle = RIGHT_ANGLE;
        }
        if self.max_angle < RIGHT_ANGLE {
            log::error!(
                "max_angle must be {} <= max_angle, got {}. Forcing max_angle = {}",
                RIGHT_ANGLE,
                self.max_angle,
                RIGHT_ANGLE
            );
            self.max_angle = RIGHT_ANGLE;
        }
        if self.max_angle > MAX_ANGLE_UPPER {
            log::error!(
                "max_angle must be max_angle <= {}, got {}. Forcing max_angle = {}",
                MAX_ANGLE_UPPER,
                self.max_angle,
                MAX_ANGLE_UPPER
            );
            self.max_angle = MAX_ANGLE_UPPER;
        }
        if self.window > MAX_WINDOW {
            log::error!(
                "window must be window <= {}, got {}. Forcing window = {}",
                MAX_WINDOW,
                self.window,
                MAX_WINDOW
            );
            self.window = MAX_WINDOW;
        }
        self
    }

    fn detector(&self) -> ShadowDetector {
        ShadowDetector::new(
            self.min_angle.to_radians(),
            self.max_angle.to_radians(),
            self.window,
        )
    }
}

/// Statistics from the most recent [`ShadowsFilter::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadowFilterStats {
    /// Pairs handed to the detector
    pub pairs_checked: usize,
    /// Pairs classified as shadow
    pub shadows_detected: usize,
    /// Readings set to NaN
    pub points_removed: usize,
}

#[derive(Debug)]
struct FilterState {
    config: ShadowFilterConfig,
    detector: ShadowDetector,
    stats: ShadowFilterStats,
}

/// Shadow filter for removing grazing-incidence artifacts from LiDAR scans.
///
/// Configuration, lookup tables and statistics sit behind one lock, so a
/// [`reconfigure`](Self::reconfigure) from another thread never interleaves
/// with a running [`update`](Self::update).
#[derive(Debug)]
pub struct ShadowsFilter {
    state: Mutex<FilterState>,
}

impl ShadowsFilter {
    /// Create a new shadow filter with the given configuration.
    ///
    /// Cone angles are clamped into their valid ranges.
    pub fn new(config: ShadowFilterConfig) -> Self {
        let config = config.clamped();
        Self {
            state: Mutex::new(FilterState {
                config,
                detector: config.detector(),
                stats: ShadowFilterStats::default(),
            }),
        }
    }

    /// Replace the configuration and rebuild the detector.
    pub fn reconfigure(&self, config: ShadowFilterConfig) {
        let config = config.clamped();
        let mut state = self.state.lock();
        state.detector.configure(
            config.min_angle.to_radians(),
            config.max_angle.to_radians(),
            config.window,
        );
        state.config = config;

        log::info!(
            "ShadowsFilter reconfigured: min_angle={:.2}, max_angle={:.2}, window={}, neighbors={}, remove_shadow_start_point={}",
            config.min_angle,
            config.max_angle,
            config.window,
            config.neighbors,
            config.remove_shadow_start_point
        );
    }

    /// Current configuration.
    pub fn config(&self) -> ShadowFilterConfig {
        self.state.lock().config
    }

    /// Statistics of the last processed scan.
    pub fn last_stats(&self) -> ShadowFilterStats {
        self.state.lock().stats
    }

    /// Apply shadow filtering to a laser scan.
    ///
    /// Returns a copy of `scan` with shadow readings set to NaN.
    pub fn update(&self, scan: &LaserScan) -> LaserScan {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.detector.prepare_for_input(scan.angle_increment);

        let config = state.config;
        let ranges = &scan.ranges;
        let n = ranges.len();
        let window = config.window as isize;

        let mut stats = ShadowFilterStats::default();
        let mut indices_to_delete = BTreeSet::new();

        for i in 0..n {
            for y in -window..=window {
                if y == 0 {
                    continue;
                }
                let Some(j) = i.checked_add_signed(y).filter(|&j| j < n) else {
                    continue;
                };

                stats.pairs_checked += 1;
                if !state.detector.is_shadow(ranges[i], ranges[j], y) {
                    continue;
                }
                stats.shadows_detected += 1;

                // Only readings farther than the start point go, never the start itself
                let first = i.saturating_sub(config.neighbors);
                let last = i.saturating_add(config.neighbors).min(n - 1);
                for k in first..=last {
                    if ranges[i] < ranges[k] {
                        indices_to_delete.insert(k);
                    }
                }
                if config.remove_shadow_start_point {
                    indices_to_delete.insert(i);
                }
            }
        }

        let mut output = scan.clone();
        for &k in &indices_to_delete {
            output.ranges[k] = f32::NAN;
        }
        stats.points_removed = indices_to_delete.len();

        log::debug!(
            "ShadowsFilter removing {} points from scan with min angle: {:.2}, max angle: {:.2}, neighbors: {}, and window: {}",
            stats.points_removed,
            config.min_angle,
            config.max_angle,
            config.neighbors,
            config.window
        );

        state.stats = stats;
        output
    }
}

impl Default for ShadowsFilter {
    fn default() -> Self {
        Self::new(ShadowFilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(increment: f32, ranges: Vec<f32>) -> LaserScan {
        LaserScan::uniform(0.0, increment, ranges)
    }

    fn invalid_indices(scan: &LaserScan) -> Vec<usize> {
        scan.ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_nan())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = ShadowFilterConfig::default();
        assert_eq!(config.min_angle, 10.0);
        assert_eq!(config.max_angle, 170.0);
        assert_eq!(config.window, 1);
        assert_eq!(config.neighbors, 0);
        assert!(!config.remove_shadow_start_point);
    }

    #[test]
    fn test_clamping() {
        let config = ShadowFilterConfig {
            min_angle: -5.0,
            max_angle: 200.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.min_angle, 0.0);
        assert_eq!(config.max_angle, 180.0);

        let config = ShadowFilterConfig {
            min_angle: 120.0,
            max_angle: 45.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.min_angle, 90.0);
        assert_eq!(config.max_angle, 90.0);
    }

    #[test]
    fn test_clamping_keeps_valid_angles() {
        let config = ShadowFilterConfig {
            min_angle: 0.0,
            max_angle: 180.0,
            ..Default::default()
        };
        assert_eq!(config.clamped(), config);
    }

    #[test]
    fn test_new_clamps_config() {
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            min_angle: 95.0,
            ..Default::default()
        });
        assert_eq!(filter.config().min_angle, 90.0);
    }

    #[test]
    fn test_clamping_nan_angles() {
        let config = ShadowFilterConfig {
            min_angle: f32::NAN,
            max_angle: f32::NAN,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.min_angle, MIN_ANGLE_LOWER);
        assert_eq!(config.max_angle, MAX_ANGLE_UPPER);

        // A NaN on one side leaves the other side as given
        let config = ShadowFilterConfig {
            min_angle: f32::NAN,
            max_angle: 150.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.min_angle, MIN_ANGLE_LOWER);
        assert_eq!(config.max_angle, 150.0);
    }

    #[test]
    fn test_huge_window_is_clamped() {
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            window: usize::MAX,
            ..Default::default()
        });
        assert_eq!(filter.config().window, MAX_WINDOW);

        filter.reconfigure(ShadowFilterConfig {
            window: MAX_WINDOW + 1,
            ..Default::default()
        });
        assert_eq!(filter.config().window, MAX_WINDOW);

        let filtered = filter.update(&scan(0.01, vec![1.0, 1.0, 5.0, 5.0]));
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_empty_scan() {
        let filter = ShadowsFilter::default();
        let filtered = filter.update(&LaserScan::default());
        assert!(filtered.is_empty());
        assert_eq!(filter.last_stats(), ShadowFilterStats::default());
    }

    #[test]
    fn test_single_point_scan() {
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            window: 3,
            neighbors: 2,
            remove_shadow_start_point: true,
            ..Default::default()
        });
        let filtered = filter.update(&scan(0.01, vec![2.0]));
        assert_eq!(filtered.ranges, vec![2.0]);
        assert_eq!(filter.last_stats().pairs_checked, 0);
    }

    #[test]
    fn test_discontinuity_removes_far_side() {
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            neighbors: 1,
            ..Default::default()
        });

        let filtered = filter.update(&scan(0.01, vec![1.0, 1.0, 5.0, 5.0]));

        assert_eq!(invalid_indices(&filtered), vec![2]);
        let stats = filter.last_stats();
        assert_eq!(stats.pairs_checked, 6);
        assert_eq!(stats.shadows_detected, 2);
        assert_eq!(stats.points_removed, 1);
    }

    #[test]
    fn test_neighbors_zero_keeps_everything() {
        // The start point is never farther than itself
        let filter = ShadowsFilter::default();
        let input = scan(0.01, vec![1.0, 1.0, 5.0, 5.0]);
        let filtered = filter.update(&input);

        assert_eq!(filtered, input);
        assert_eq!(filter.last_stats().shadows_detected, 2);
    }

    #[test]
    fn test_window_offsets_are_table_indices() {
        // Sub-radian offsets: a radians-scaled offset would collapse to 0
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            window: 3,
            neighbors: 1,
            ..Default::default()
        });

        let filtered = filter.update(&scan(0.001, vec![1.0, 1.0, 1.0, 5.0, 5.0, 5.0]));

        assert_eq!(invalid_indices(&filtered), vec![3]);
        assert_eq!(filter.last_stats().pairs_checked, 24);
        assert!(filter.last_stats().shadows_detected > 0);
    }

    #[test]
    fn test_reconfigure_changes_window() {
        let filter = ShadowsFilter::default();
        let input = scan(0.01, vec![1.0, 1.0, 5.0, 5.0]);

        filter.update(&input);
        assert_eq!(filter.last_stats().pairs_checked, 6);

        filter.reconfigure(ShadowFilterConfig {
            window: 2,
            ..Default::default()
        });
        filter.update(&input);
        assert_eq!(filter.last_stats().pairs_checked, 10);
        assert_eq!(filter.config().window, 2);
    }

    #[test]
    fn test_reconfigure_clamps() {
        let filter = ShadowsFilter::default();
        filter.reconfigure(ShadowFilterConfig {
            max_angle: 250.0,
            ..Default::default()
        });
        assert_eq!(filter.config().max_angle, 180.0);
    }

    #[test]
    fn test_nan_input_passes_through() {
        let filter = ShadowsFilter::new(ShadowFilterConfig {
            window: 2,
            neighbors: 2,
            ..Default::default()
        });
        let filtered = filter.update(&scan(0.01, vec![f32::NAN, 2.0, f32::NAN, 2.0]));

        assert_eq!(filter.last_stats().shadows_detected, 0);
        assert!(filtered.ranges[0].is_nan());
        assert_eq!(filtered.ranges[1], 2.0);
        assert_eq!(filtered.ranges[3], 2.0);
    }
}
