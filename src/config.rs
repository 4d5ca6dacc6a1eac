//! Explicit configuration passed by value into each operation.

use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};

use crate::{Direction, Error, Result};

/// Nominal inclination of a sun-synchronous imaging orbit, in degrees.
pub const SSO_INCLINATION_DEG: f64 = 97.8;

/// Lateral spacing between fanned-out footprints, in metres.
pub const FAN_SPACING_M: f64 = 10_000.0;

/// Default side length of an AOI square, in metres.
pub const AOI_SIDE_M: f64 = 9_000.0;

/// Footprint dimensions and orbit geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    /// Extent along the ground track, in metres.
    pub length_m: f64,
    /// Extent across the ground track, in metres.
    pub width_m: f64,
    pub direction: Direction,
    pub inclination_deg: f64,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self { length_m: 30_000.0, width_m: 20_000.0, direction: Direction::NeToSw, inclination_deg: SSO_INCLINATION_DEG }
    }
}

impl FootprintConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.length_m.is_finite() && self.length_m > 0.0) {
            return Err(Error::InvalidGeometry(format!("footprint length must be positive, got {}", self.length_m)))
        }
        if !(self.width_m.is_finite() && self.width_m > 0.0) {
            return Err(Error::InvalidGeometry(format!("footprint width must be positive, got {}", self.width_m)))
        }
        if !self.inclination_deg.is_finite() {
            return Err(Error::InvalidParameter(format!("inclination must be finite, got {}", self.inclination_deg)))
        }
        Ok(())
    }
}

/// Batch expansion settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub spacing_m: f64,
}

impl Default for BatchConfig {
    fn default() -> Self { Self { spacing_m: FAN_SPACING_M } }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.spacing_m.is_finite() && self.spacing_m > 0.0) {
            return Err(Error::InvalidParameter(format!("fan spacing must be positive, got {}", self.spacing_m)))
        }
        Ok(())
    }
}

/// Tolerances of the hierarchy inference pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Buffer distance applied to candidate parents, in geometry units
    /// (metres when `project_to_metric` is set).
    pub buffer_tolerance: f64,
    /// Fraction of a child's area that must fall inside a buffered parent.
    pub min_overlap_ratio: f64,
    /// Measure in the UTM zone of the dataset center instead of raw lon/lat.
    pub project_to_metric: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self { buffer_tolerance: 1e-5, min_overlap_ratio: 0.5, project_to_metric: false }
    }
}

impl HierarchyConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.buffer_tolerance.is_finite() && self.buffer_tolerance >= 0.0) {
            return Err(Error::InvalidParameter(format!("buffer tolerance must be non-negative, got {}", self.buffer_tolerance)))
        }
        if !(0.0..=1.0).contains(&self.min_overlap_ratio) {
            return Err(Error::InvalidParameter(format!("min overlap ratio must be in [0, 1], got {}", self.min_overlap_ratio)))
        }
        Ok(())
    }
}

/// AOI square settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AoiConfig {
    pub side_m: f64,
}

impl Default for AoiConfig {
    fn default() -> Self { Self { side_m: AOI_SIDE_M } }
}

/// All settings, as read from a JSON config file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub footprint: FootprintConfig,
    pub batch: BatchConfig,
    pub hierarchy: HierarchyConfig,
    pub aoi: AoiConfig,
}

impl Config {
    /// Parse a JSON config; missing keys fall back to defaults.
    pub fn from_json_str(json: &str) -> AnyResult<Self> {
        let config: Self = serde_json::from_str(json).context("[config] Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> AnyResult<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("[config] Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.footprint.validate()?;
        self.batch.validate()?;
        self.hierarchy.validate()?;
        if !(self.aoi.side_m.is_finite() && self.aoi.side_m > 0.0) {
            return Err(Error::InvalidGeometry(format!("AOI side must be positive, got {}", self.aoi.side_m)))
        }
        Ok(())
    }
}
