//! Core data types.
//!
//! - [`LaserScan`]: Raw LiDAR scan in polar coordinates

mod scan;

pub use scan::LaserScan;
