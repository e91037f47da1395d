// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::TAU_NEUTRON;
use crate::error::{BbnError, BbnResult};

/// Top-level nucleosynthesis configuration.
///
/// Every field has a default, so a partial JSON file (or `{}`) deserializes.
/// The configuration is passed explicitly to every computation that depends
/// on the neutrino content of the universe; there is no process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BbnConfig {
    /// Effective number of light neutrino generations N_nu (default: 3)
    #[serde(default = "default_neutrino_generations")]
    pub neutrino_generations: f64,
    /// Free neutron lifetime in seconds (default: 885.7)
    #[serde(default = "default_neutron_lifetime")]
    pub neutron_lifetime: f64,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Thermal-history integration and tabulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Gauss-Laguerre nodes for the thermodynamic integrals (default: 64)
    #[serde(default = "default_quadrature_nodes")]
    pub quadrature_nodes: usize,
    /// Relative tolerance of the explicit integrator (default: 1e-10)
    #[serde(default = "default_expansion_rtol")]
    pub rtol: f64,
    /// Absolute tolerance of the explicit integrator (default: 1e-30)
    #[serde(default = "default_expansion_atol")]
    pub atol: f64,
    /// Log-spaced sampling intervals of `expansion` (default: 256)
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Knots of the interpolated thermal-history table (default: 256)
    #[serde(default = "default_table_points")]
    pub table_points: usize,
    #[serde(default = "default_expansion_max_steps")]
    pub max_steps: usize,
}

/// Reaction-network integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Initial photon temperature T0 in MeV (default: 100)
    #[serde(default = "default_start_temperature")]
    pub start_temperature: f64,
    /// Final photon temperature in MeV (default: 0.01)
    #[serde(default = "default_final_temperature")]
    pub final_temperature: f64,
    /// Relative tolerance of the stiff integrator (default: 1e-6)
    #[serde(default = "default_network_rtol")]
    pub rtol: f64,
    /// Absolute tolerance on mass fractions (default: 1e-9)
    #[serde(default = "default_network_atol")]
    pub atol: f64,
    /// Log-spaced output intervals between start and final temperature (default: 128)
    #[serde(default = "default_output_points")]
    pub output_points: usize,
    #[serde(default = "default_network_max_steps")]
    pub max_steps: usize,
}

fn default_neutrino_generations() -> f64 {
    3.0
}
fn default_neutron_lifetime() -> f64 {
    TAU_NEUTRON
}
fn default_quadrature_nodes() -> usize {
    64
}
fn default_expansion_rtol() -> f64 {
    1e-10
}
fn default_expansion_atol() -> f64 {
    1e-30
}
fn default_samples() -> usize {
    256
}
fn default_table_points() -> usize {
    256
}
fn default_expansion_max_steps() -> usize {
    100_000
}
fn default_start_temperature() -> f64 {
    100.0
}
fn default_final_temperature() -> f64 {
    0.01
}
fn default_network_rtol() -> f64 {
    1e-6
}
fn default_network_atol() -> f64 {
    1e-9
}
fn default_output_points() -> usize {
    128
}
fn default_network_max_steps() -> usize {
    200_000
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        ExpansionConfig {
            quadrature_nodes: default_quadrature_nodes(),
            rtol: default_expansion_rtol(),
            atol: default_expansion_atol(),
            samples: default_samples(),
            table_points: default_table_points(),
            max_steps: default_expansion_max_steps(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            start_temperature: default_start_temperature(),
            final_temperature: default_final_temperature(),
            rtol: default_network_rtol(),
            atol: default_network_atol(),
            output_points: default_output_points(),
            max_steps: default_network_max_steps(),
        }
    }
}

impl Default for BbnConfig {
    fn default() -> Self {
        BbnConfig {
            neutrino_generations: default_neutrino_generations(),
            neutron_lifetime: default_neutron_lifetime(),
            expansion: ExpansionConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

/// Default configuration with `n_nu` neutrino generations.
///
/// Replaces a global "set N_nu before computing" call: the returned value is
/// handed to the expansion, weak-rate and network routines explicitly.
pub fn initialize(n_nu: f64) -> BbnResult<BbnConfig> {
    let config = BbnConfig::default().with_neutrino_generations(n_nu);
    config.validate()?;
    Ok(config)
}

impl BbnConfig {
    /// Load from JSON file. Missing keys take their defaults.
    pub fn from_file(path: &str) -> BbnResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_neutrino_generations(mut self, n_nu: f64) -> Self {
        self.neutrino_generations = n_nu;
        self
    }

    pub fn with_neutron_lifetime(mut self, tau: f64) -> Self {
        self.neutron_lifetime = tau;
        self
    }

    pub fn with_start_temperature(mut self, t0: f64) -> Self {
        self.network.start_temperature = t0;
        self
    }

    pub fn with_final_temperature(mut self, t1: f64) -> Self {
        self.network.final_temperature = t1;
        self
    }

    /// Network tolerances (relative, absolute on mass fractions).
    pub fn with_tolerance(mut self, rtol: f64, atol: f64) -> Self {
        self.network.rtol = rtol;
        self.network.atol = atol;
        self
    }

    pub fn validate(&self) -> BbnResult<()> {
        if !self.neutrino_generations.is_finite() || self.neutrino_generations <= 0.0 {
            return Err(BbnError::ConfigError(format!(
                "neutrino_generations must be finite and > 0, got {}",
                self.neutrino_generations
            )));
        }
        if !self.neutron_lifetime.is_finite() || self.neutron_lifetime <= 0.0 {
            return Err(BbnError::ConfigError(format!(
                "neutron_lifetime must be finite and > 0, got {}",
                self.neutron_lifetime
            )));
        }
        self.expansion.validate()?;
        self.network.validate()
    }
}

fn validate_tolerance(label: &str, rtol: f64, atol: f64) -> BbnResult<()> {
    if !rtol.is_finite() || rtol <= 0.0 || rtol >= 1.0 {
        return Err(BbnError::ConfigError(format!(
            "{label}.rtol must be in (0, 1), got {rtol}"
        )));
    }
    if !atol.is_finite() || atol <= 0.0 {
        return Err(BbnError::ConfigError(format!(
            "{label}.atol must be finite and > 0, got {atol}"
        )));
    }
    Ok(())
}

impl ExpansionConfig {
    pub fn validate(&self) -> BbnResult<()> {
        if !(2..=128).contains(&self.quadrature_nodes) {
            return Err(BbnError::ConfigError(format!(
                "expansion.quadrature_nodes must be in [2, 128], got {}",
                self.quadrature_nodes
            )));
        }
        validate_tolerance("expansion", self.rtol, self.atol)?;
        if self.samples == 0 {
            return Err(BbnError::ConfigError(
                "expansion.samples must be >= 1".to_string(),
            ));
        }
        if self.table_points < 4 {
            return Err(BbnError::ConfigError(format!(
                "expansion.table_points must be >= 4, got {}",
                self.table_points
            )));
        }
        if self.max_steps == 0 {
            return Err(BbnError::ConfigError(
                "expansion.max_steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> BbnResult<()> {
        let (t0, t1) = (self.start_temperature, self.final_temperature);
        if !t0.is_finite() || !t1.is_finite() || t1 <= 0.0 || t0 <= t1 {
            return Err(BbnError::ConfigError(format!(
                "network temperatures must satisfy start > final > 0, got {t0} -> {t1}"
            )));
        }
        validate_tolerance("network", self.rtol, self.atol)?;
        if self.output_points == 0 {
            return Err(BbnError::ConfigError(
                "network.output_points must be >= 1".to_string(),
            ));
        }
        if self.max_steps == 0 {
            return Err(BbnError::ConfigError(
                "network.max_steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
