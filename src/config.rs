//! Tunables for the image analysis pipeline.
//!
//! Every field has a default, so a JSON file only needs the values it overrides:
//!
//! ```no_run
//! use image_palette_wasm::AnalyzerConfig;
//! use std::path::Path;
//!
//! let config = AnalyzerConfig::from_json_file(Path::new("analyzer.json"))?;
//! # Ok::<(), image_palette_wasm::PaletteError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clustering::ClusterOptions;
use crate::error::{PaletteError, Result};

/// Longest side, in pixels, of the working image.
pub const DEFAULT_MAX_DIMENSION: u32 = 200;
/// Upper bound on pixels fed to the cluster-count scan.
pub const DEFAULT_SAMPLE_SIZE: usize = 2000;
pub const DEFAULT_K_MIN: usize = 2;
pub const DEFAULT_K_MAX: usize = 6;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_CONVERGENCE: f32 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub max_dimension: u32,
    pub sample_size: usize,
    pub k_min: usize,
    pub k_max: usize,
    /// Seeds both pixel sampling and centroid initialisation.
    pub seed: u64,
    /// Hard cap on Lloyd iterations per clustering run.
    pub max_iterations: usize,
    /// Summed squared centroid shift at or below which a run stops. Zero
    /// means iterate to a fixed point (or `max_iterations`).
    pub convergence: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            sample_size: DEFAULT_SAMPLE_SIZE,
            k_min: DEFAULT_K_MIN,
            k_max: DEFAULT_K_MAX,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence: DEFAULT_CONVERGENCE,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| PaletteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PaletteError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.k_min < 2 || self.k_max < self.k_min {
            return Err(PaletteError::InvalidRange {
                k_min: self.k_min,
                k_max: self.k_max,
            });
        }
        if self.max_dimension == 0 {
            return Err(PaletteError::Config("max_dimension must be positive".into()));
        }
        if self.sample_size == 0 {
            return Err(PaletteError::Config("sample_size must be positive".into()));
        }
        if self.max_iterations == 0 {
            return Err(PaletteError::Config("max_iterations must be positive".into()));
        }
        if self.convergence.is_nan() || self.convergence < 0.0 {
            return Err(PaletteError::Config("convergence must be non-negative".into()));
        }
        Ok(())
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions {
            seed: self.seed,
            max_iterations: self.max_iterations,
            convergence: self.convergence,
        }
    }
}
