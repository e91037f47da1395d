// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Nucleosynthesis Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Light-element abundances from equilibrium at T0 down to T1.
//!
//! Algorithm:
//! 1. Tabulate the thermal history (T_nu, t, weak rates) once per solver
//! 2. Seed all 8 mass fractions at NSE for the chosen eta
//! 3. Integrate dX/dT with the Rosenbrock 2(3) method segment by segment
//!    over `output_points` log-spaced temperatures
//! 4. Keep the requested species, in the requested order

use bbn_math::ode::{SolverStats, Tolerance};
use bbn_math::stiff::Rosenbrock23;
use bbn_nuclear::species::{parse_species, Species, NUM_SPECIES};
use bbn_types::config::BbnConfig;
use bbn_types::error::{BbnError, BbnResult};
use bbn_types::state::log_spaced;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::expansion::ExpansionModel;
use crate::history::ThermalHistory;
use crate::network::NetworkSystem;
use crate::weak::WeakRates;

/// Abundance trajectories of a set of species.
#[derive(Debug, Clone)]
pub struct AbundanceHistory {
    pub eta: f64,
    /// Photon temperature samples (MeV), decreasing
    pub temperature: Array1<f64>,
    /// Seconds since T0
    pub time: Array1<f64>,
    pub species: Vec<Species>,
    /// [species × temperature]
    pub mass_fraction: Array2<f64>,
    pub stats: SolverStats,
}

impl AbundanceHistory {
    /// Trajectory of one species, if it was requested.
    pub fn get(&self, species: Species) -> Option<Array1<f64>> {
        let row = self.species.iter().position(|&s| s == species)?;
        Some(self.mass_fraction.row(row).to_owned())
    }

    /// Mass fraction of `species` at the coldest sample.
    pub fn final_mass_fraction(&self, species: Species) -> Option<f64> {
        let row = self.species.iter().position(|&s| s == species)?;
        self.mass_fraction.row(row).last().copied()
    }

    pub fn summary(&self, config: &BbnConfig) -> RunSummary {
        let last = self.temperature.len().saturating_sub(1);
        RunSummary {
            eta: self.eta,
            neutrino_generations: config.neutrino_generations,
            neutron_lifetime: config.neutron_lifetime,
            final_temperature: self.temperature[last],
            accepted_steps: self.stats.accepted,
            rejected_steps: self.stats.rejected,
            abundances: self
                .species
                .iter()
                .enumerate()
                .map(|(i, &species)| FinalAbundance {
                    species,
                    mass_fraction: self.mass_fraction[[i, last]],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAbundance {
    pub species: Species,
    pub mass_fraction: f64,
}

/// Serializable end state of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub eta: f64,
    pub neutrino_generations: f64,
    pub neutron_lifetime: f64,
    pub final_temperature: f64,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub abundances: Vec<FinalAbundance>,
}

/// Reusable solver: the thermal history depends on the configuration only,
/// so one instance serves any number of eta values.
pub struct NucleosynthesisSolver {
    config: BbnConfig,
    model: ExpansionModel,
    history: ThermalHistory,
}

impl NucleosynthesisSolver {
    pub fn new(config: BbnConfig) -> BbnResult<Self> {
        config.validate()?;
        let model = ExpansionModel::new(&config)?;
        let weak = WeakRates::new(&config)?;
        let history = ThermalHistory::build(
            &model,
            &weak,
            config.network.start_temperature,
            config.network.final_temperature,
            &config,
        )?;
        Ok(NucleosynthesisSolver {
            config,
            model,
            history,
        })
    }

    pub fn config(&self) -> &BbnConfig {
        &self.config
    }

    pub fn history(&self) -> &ThermalHistory {
        &self.history
    }

    /// Evolve all species for baryon-to-photon ratio `eta` and return the
    /// rows for `species`.
    pub fn run(&self, eta: f64, species: &[Species]) -> BbnResult<AbundanceHistory> {
        if !eta.is_finite() || eta <= 0.0 {
            return Err(BbnError::ConfigError(format!(
                "eta must be positive and finite, got {eta}"
            )));
        }
        let net = &self.config.network;
        let t0 = net.start_temperature;
        let grid = log_spaced(t0, net.final_temperature, net.output_points);

        let system = NetworkSystem::new(&self.model, &self.history, eta);
        let mut x = system.equilibrium_state(t0)?;
        let mut solver = Rosenbrock23::new(Tolerance::new(net.rtol, net.atol)?, net.max_steps);

        let mut full = Array2::zeros((NUM_SPECIES, grid.len()));
        let mut time = Array1::zeros(grid.len());
        let t_origin = self.history.at(t0).time;
        for (i, &v) in x.iter().enumerate() {
            full[[i, 0]] = v;
        }

        for k in 1..grid.len() {
            solver.integrate(&system, grid[k - 1], grid[k], &mut x)?;
            if let Some(bad) = x.iter().position(|v| !v.is_finite()) {
                return Err(BbnError::SolverDiverged {
                    iteration: solver.stats().steps(),
                    message: format!("non-finite {} at T = {} MeV", Species::ALL[bad], grid[k]),
                });
            }
            for (i, &v) in x.iter().enumerate() {
                full[[i, k]] = v;
            }
            time[k] = self.history.at(grid[k]).time - t_origin;
            tracing::trace!(t = grid[k], steps = solver.stats().steps(), "segment done");
        }

        let stats = solver.stats();
        tracing::debug!(
            eta,
            accepted = stats.accepted,
            rejected = stats.rejected,
            rhs_evals = stats.rhs_evals,
            jacobian_evals = stats.jacobian_evals,
            helium4 = x[Species::Helium4.index()],
            "nucleosynthesis integrated"
        );

        let mut mass_fraction = Array2::zeros((species.len(), grid.len()));
        for (row, s) in species.iter().enumerate() {
            mass_fraction.row_mut(row).assign(&full.row(s.index()));
        }
        Ok(AbundanceHistory {
            eta,
            temperature: grid,
            time,
            species: species.to_vec(),
            mass_fraction,
            stats,
        })
    }

    /// [`run`](Self::run) with species given by name.
    pub fn run_named<S: AsRef<str>>(&self, eta: f64, species: &[S]) -> BbnResult<AbundanceHistory> {
        let species = parse_species(species)?;
        self.run(eta, &species)
    }

    /// End state of all 8 species.
    pub fn final_mass_fractions(&self, eta: f64) -> BbnResult<RunSummary> {
        Ok(self.run(eta, &Species::ALL)?.summary(&self.config))
    }

    /// Final mass fractions for each eta: [etas × species].
    pub fn scan_eta(&self, etas: &[f64], species: &[Species]) -> BbnResult<Array2<f64>> {
        let mut out = Array2::zeros((etas.len(), species.len()));
        for (i, &eta) in etas.iter().enumerate() {
            let run = self.run(eta, species)?;
            let last = run.temperature.len() - 1;
            out.row_mut(i).assign(&run.mass_fraction.column(last));
        }
        Ok(out)
    }
}

/// One-shot nucleosynthesis run for named species.
pub fn bbn<S: AsRef<str>>(eta: f64, species: &[S], config: &BbnConfig) -> BbnResult<AbundanceHistory> {
    let species = parse_species(species)?;
    NucleosynthesisSolver::new(config.clone())?.run(eta, &species)
}
