//! Chhaya - shadow point removal for 2D LiDAR scans
//!
//! When a beam grazes the edge of an object, the sensor can report a return
//! that sits between the edge and the background, a "shadow" that looks like
//! a false extension of the surface. This crate detects those readings with a
//! local angular geometry test and marks them invalid (NaN).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      bin/                           │  ← Host harness
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                config/, error/                      │  ← Parameters
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Scan filtering
//! │          (ShadowsFilter, ShadowDetector)            │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                   (LaserScan)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use chhaya::{FilterFile, LaserScan, ShadowsFilter};
//!
//! let file = FilterFile::from_toml_str(
//!     "[shadow_filter]\nmin_angle = 10.0\nmax_angle = 170.0\nwindow = 1\nneighbors = 1\n",
//! )?;
//! let filter = ShadowsFilter::from_params(&file.shadow_filter)?;
//!
//! let scan = LaserScan::uniform(0.0, 0.01, vec![1.0, 1.0, 5.0, 5.0]);
//! let filtered = filter.update(&scan);
//! assert_eq!(filtered.invalid_count(), 1);
//! # Ok::<(), chhaya::ShadowFilterError>(())
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Configuration and errors (depends on sensors)
// ============================================================================
pub mod config;
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::{FilterFile, ShadowFilterParams};
pub use core::types::LaserScan;
pub use error::{Result, ShadowFilterError};
pub use sensors::preprocessing::{
    ScanFilter, ShadowDetector, ShadowFilterConfig, ShadowFilterStats, ShadowsFilter,
};
