//! LiDAR scan type.

use serde::{Deserialize, Serialize};

/// Raw LiDAR scan in polar coordinates.
///
/// Represents a single 360° (or partial) scan from a 2D LiDAR sensor.
/// Each measurement is a range value at `angle_min + i * angle_increment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Start angle in radians
    pub angle_min: f32,
    /// End angle in radians
    pub angle_max: f32,
    /// Angular resolution (radians between consecutive readings)
    pub angle_increment: f32,
    /// Time between consecutive measurements in seconds
    #[serde(default)]
    pub time_increment: f32,
    /// Time between scans in seconds
    #[serde(default)]
    pub scan_time: f32,
    /// Minimum valid range in meters
    #[serde(with = "reading")]
    pub range_min: f32,
    /// Maximum valid range in meters
    #[serde(with = "reading")]
    pub range_max: f32,
    /// Range measurements in meters (NaN = invalid, +inf = no return)
    #[serde(with = "readings")]
    pub ranges: Vec<f32>,
    /// Intensity values, either empty or one per range
    #[serde(default)]
    pub intensities: Vec<f32>,
}

impl LaserScan {
    /// Create a new laser scan with the given parameters.
    pub fn new(
        angle_min: f32,
        angle_max: f32,
        angle_increment: f32,
        range_min: f32,
        range_max: f32,
        ranges: Vec<f32>,
    ) -> Self {
        Self {
            angle_min,
            angle_max,
            angle_increment,
            time_increment: 0.0,
            scan_time: 0.0,
            range_min,
            range_max,
            ranges,
            intensities: Vec::new(),
        }
    }

    /// Create a uniformly spaced scan starting at `angle_min`.
    ///
    /// `angle_max` is derived from the number of readings; range limits are
    /// the Delta-2D defaults of [`LaserScan::default`].
    pub fn uniform(angle_min: f32, angle_increment: f32, ranges: Vec<f32>) -> Self {
        let defaults = Self::default();
        let angle_max = angle_min + ranges.len().saturating_sub(1) as f32 * angle_increment;
        Self::new(
            angle_min,
            angle_max,
            angle_increment,
            defaults.range_min,
            defaults.range_max,
            ranges,
        )
    }

    /// Create a laser scan with intensities.
    pub fn with_intensities(mut self, intensities: Vec<f32>) -> Self {
        self.intensities = intensities;
        self
    }

    /// Number of range measurements.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if scan is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Get the angle for a given index.
    #[inline]
    pub fn angle_at(&self, index: usize) -> f32 {
        self.angle_min + index as f32 * self.angle_increment
    }

    /// Count readings that carry the NaN invalidation marker.
    pub fn invalid_count(&self) -> usize {
        self.ranges.iter().filter(|r| r.is_nan()).count()
    }

    /// Validate internal consistency of the scan data.
    ///
    /// Returns Ok(()) if valid, or an error message describing the inconsistency.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.intensities.is_empty() && self.intensities.len() != self.ranges.len() {
            return Err("intensities and ranges length mismatch");
        }
        if self.range_min < 0.0 {
            return Err("range_min must be non-negative");
        }
        if self.range_max <= self.range_min {
            return Err("range_max must be greater than range_min");
        }
        Ok(())
    }
}

impl Default for LaserScan {
    fn default() -> Self {
        Self {
            angle_min: 0.0,
            angle_max: std::f32::consts::TAU,
            angle_increment: std::f32::consts::TAU / 360.0, // 1° resolution
            time_increment: 0.0,
            scan_time: 0.0,
            range_min: 0.15,
            range_max: 12.0,
            ranges: Vec::new(),
            intensities: Vec::new(),
        }
    }
}

/// JSON encoding of a single reading.
///
/// JSON has no non-finite numbers: NaN travels as `null`, infinities as the
/// strings `"inf"` and `"-inf"`.
mod reading {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    pub(super) enum Encoded {
        Value(f32),
        Label(String),
    }

    pub(super) fn encode(value: f32) -> Option<Encoded> {
        if value.is_nan() {
            None
        } else if value == f32::INFINITY {
            Some(Encoded::Label("inf".to_string()))
        } else if value == f32::NEG_INFINITY {
            Some(Encoded::Label("-inf".to_string()))
        } else {
            Some(Encoded::Value(value))
        }
    }

    pub(super) fn decode<E: Error>(encoded: Option<Encoded>) -> Result<f32, E> {
        match encoded {
            None => Ok(f32::NAN),
            Some(Encoded::Value(value)) => Ok(value),
            Some(Encoded::Label(label)) => match label.as_str() {
                "inf" | "+inf" => Ok(f32::INFINITY),
                "-inf" => Ok(f32::NEG_INFINITY),
                other => Err(E::custom(format!("invalid range reading: {other:?}"))),
            },
        }
    }

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        encode(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        decode(Option::<Encoded>::deserialize(deserializer)?)
    }
}

/// Per-point variant of [`reading`] for the `ranges` array.
mod readings {
    use super::reading::{Encoded, decode, encode};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(ranges: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
        let values: Vec<Option<Encoded>> = ranges.iter().map(|&r| encode(r)).collect();
        values.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        Vec::<Option<Encoded>>::deserialize(deserializer)?
            .into_iter()
            .map(decode)
            .collect()
    }
}
