//! Configuration loading for the shadow filter.
//!
//! Parameters come from a TOML file with a `[shadow_filter]` section:
//!
//! ```toml
//! [shadow_filter]
//! min_angle = 10.0      # degrees, required, clamped to [0, 90]
//! max_angle = 170.0     # degrees, required, clamped to [90, 180]
//! window = 1            # required
//! neighbors = 0         # optional
//! remove_shadow_start_point = false  # optional
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShadowFilterError};
use crate::sensors::preprocessing::{MAX_WINDOW, ShadowFilterConfig, ShadowsFilter};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterFile {
    #[serde(default)]
    pub shadow_filter: ShadowFilterParams,
}

impl FilterFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: FilterFile = toml::from_str(contents)?;
        Ok(file)
    }
}

/// Raw shadow filter parameters as written by the user.
///
/// Every key is optional at the parsing level; required keys are enforced by
/// [`ShadowFilterConfig::from_params`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShadowFilterParams {
    /// Degrees
    pub min_angle: Option<f32>,
    /// Degrees
    pub max_angle: Option<f32>,
    pub window: Option<usize>,
    pub neighbors: Option<usize>,
    pub remove_shadow_start_point: Option<bool>,
}

impl ShadowFilterConfig {
    /// Build a validated configuration from raw parameters.
    ///
    /// Fails if `min_angle`, `max_angle` or `window` is missing, if an angle is
    /// not a finite number, or if `window` exceeds [`MAX_WINDOW`]. Finite angles
    /// outside their valid ranges are clamped.
    pub fn from_params(params: &ShadowFilterParams) -> Result<Self> {
        let min_angle = params
            .min_angle
            .ok_or(ShadowFilterError::MissingParameter("min_angle"))?;
        let max_angle = params
            .max_angle
            .ok_or(ShadowFilterError::MissingParameter("max_angle"))?;
        let window = params
            .window
            .ok_or(ShadowFilterError::MissingParameter("window"))?;

        for (name, angle) in [("min_angle", min_angle), ("max_angle", max_angle)] {
            if !angle.is_finite() {
                return Err(ShadowFilterError::Config(format!(
                    "{name} must be a finite number of degrees, got {angle}"
                )));
            }
        }
        if window > MAX_WINDOW {
            return Err(ShadowFilterError::Config(format!(
                "window must be at most {MAX_WINDOW}, got {window}"
            )));
        }

        let neighbors = params.neighbors.unwrap_or_else(|| {
            log::info!("ShadowsFilter was not given neighbors, using 0");
            0
        });
        let remove_shadow_start_point = params.remove_shadow_start_point.unwrap_or(false);
        log::info!("Remove shadow start point: {}", remove_shadow_start_point);

        Ok(Self {
            min_angle,
            max_angle,
            window,
            neighbors,
            remove_shadow_start_point,
        }
        .clamped())
    }
}

impl From<ShadowFilterConfig> for ShadowFilterParams {
    fn from(config: ShadowFilterConfig) -> Self {
        Self {
            min_angle: Some(config.min_angle),
            max_angle: Some(config.max_angle),
            window: Some(config.window),
            neighbors: Some(config.neighbors),
            remove_shadow_start_point: Some(config.remove_shadow_start_point),
        }
    }
}

impl ShadowsFilter {
    /// Build a filter from raw parameters.
    pub fn from_params(params: &ShadowFilterParams) -> Result<Self> {
        Ok(Self::new(ShadowFilterConfig::from_params(params)?))
    }

    /// Apply a reconfiguration request given as raw parameters.
    ///
    /// On error the current configuration is left untouched.
    pub fn reconfigure_from_params(&self, params: &ShadowFilterParams) -> Result<()> {
        let config = ShadowFilterConfig::from_params(params)?;
        self.reconfigure(config);
        Ok(())
    }
}
