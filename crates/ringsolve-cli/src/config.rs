//! TOML job files.
//!
//! A job describes either a numeric sweep of a device circuit:
//!
//! ```toml
//! [circuit]
//! type = "ring"
//! radius = "10u"
//! cross_coupling = 0.3
//!
//! [sweep]
//! wavelength = "1550n"
//! fsr_count = 2.0
//! points = 2000
//! ```
//!
//! or a symbolic response of a catalog topology:
//!
//! ```toml
//! [symbolic]
//! topology = "RingResonator"
//! pins = [2, 3]
//!
//! [symbolic.parameters]
//! l = 5
//! cross_coupling_1 = 0.5
//! unitary_loss_coefficient = 0.999
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ringsolve_core::units::deserialize_value;
use ringsolve_core::Dispersion;
use ringsolve_devices::{AddDropParams, RicParams, RingParams};
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub circuit: Option<CircuitConfig>,
    #[serde(default)]
    pub dispersion: Dispersion,
    pub sweep: Option<SweepConfig>,
    pub symbolic: Option<SymbolicConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Device circuit to sweep.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CircuitConfig {
    /// A single driven waveguide.
    Waveguide {
        #[serde(deserialize_with = "deserialize_value")]
        length: f64,
        #[serde(default)]
        phase_delay: f64,
    },
    Ring(RingParams),
    AddDrop(AddDropParams),
    Ric(RicParams),
}

/// Angular-frequency grid of a numeric sweep.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SweepConfig {
    /// Explicit bounds in rad/s.
    Range { start: f64, stop: f64, points: usize },
    /// Centred on a wavelength, a number of free spectral ranges wide.
    Wavelength {
        #[serde(deserialize_with = "deserialize_value")]
        wavelength: f64,
        #[serde(default = "default_fsr_count")]
        fsr_count: f64,
        points: usize,
    },
}

fn default_fsr_count() -> f64 {
    3.0
}

/// Symbolic response job.
#[derive(Debug, Deserialize)]
pub struct SymbolicConfig {
    /// Catalog name, e.g. `"ResonantInterferometricCoupler"`.
    pub topology: String,
    /// Values for the topology's parameters. Missing `self_coupling_*`
    /// entries are derived from the matching `cross_coupling_*`.
    pub parameters: BTreeMap<String, f64>,
    /// Pins to evaluate.
    pub pins: Vec<usize>,
    #[serde(default)]
    pub omega: OmegaConfig,
    /// Pin whose main resonance efficiency is reported.
    pub efficiency_pin: Option<usize>,
    /// Include poles and zeros of each pin.
    #[serde(default)]
    pub pole_zero: bool,
    /// Add a reference ring with the main cavity length.
    #[serde(default)]
    pub reference_ring: bool,
    /// Directory for cached symbolic solutions.
    pub cache_dir: Option<PathBuf>,
}

/// Normalized frequency grid.
#[derive(Debug, Deserialize)]
pub struct OmegaConfig {
    #[serde(default)]
    pub start: f64,
    #[serde(default = "default_omega_stop")]
    pub stop: f64,
    #[serde(default = "default_omega_points")]
    pub points: usize,
}

impl Default for OmegaConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: default_omega_stop(),
            points: default_omega_points(),
        }
    }
}

fn default_omega_stop() -> f64 {
    2.0 * std::f64::consts::PI
}

fn default_omega_points() -> usize {
    ringsolve_symbolic::DEFAULT_RESPONSE_SAMPLES
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Port names to report; empty means every named port.
    #[serde(default)]
    pub ports: Vec<String>,
    /// Whether to save CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            ports: Vec::new(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path.display()))?;
    let config: JobConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse job file: {}", path.display()))?;
    config.check()?;
    Ok(config)
}

impl JobConfig {
    /// Structural checks that do not need a solve.
    pub fn check(&self) -> Result<()> {
        if self.circuit.is_none() && self.symbolic.is_none() {
            bail!("job defines neither [circuit] nor [symbolic]");
        }
        if self.circuit.is_some() && self.sweep.is_none() {
            bail!("[circuit] requires a [sweep] section");
        }
        if let Some(sym) = &self.symbolic {
            if sym.pins.is_empty() {
                bail!("[symbolic] lists no pins");
            }
            if sym.omega.points == 0 {
                bail!("[symbolic.omega] has no points");
            }
        }
        Ok(())
    }
}
