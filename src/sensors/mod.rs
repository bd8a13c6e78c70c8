//! Sensor processing layer.
//!
//! # Contents
//!
//! - [`preprocessing`]: LiDAR scan filtering

pub mod preprocessing;
