// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;

/// `intervals + 1` temperatures from `t0` to `t1`, equally spaced in ln T.
/// Endpoints are exact.
pub fn log_spaced(t0: f64, t1: f64, intervals: usize) -> Array1<f64> {
    let n = intervals.max(1);
    let ln0 = t0.ln();
    let step = (t1.ln() - ln0) / n as f64;
    let mut grid = Array1::from_shape_fn(n + 1, |i| (ln0 + step * i as f64).exp());
    grid[0] = t0;
    grid[n] = t1;
    grid
}

/// Sampled thermal history of the expanding universe.
/// All three arrays share one index; `temperature` decreases along it.
#[derive(Debug, Clone)]
pub struct ThermalTrajectory {
    /// Photon temperature T (MeV)
    pub temperature: Array1<f64>,
    /// Neutrino temperature T_nu (MeV)
    pub neutrino_temperature: Array1<f64>,
    /// Time since the first sample (s)
    pub time: Array1<f64>,
}

impl ThermalTrajectory {
    pub fn with_capacity(temperature: Array1<f64>) -> Self {
        let n = temperature.len();
        ThermalTrajectory {
            temperature,
            neutrino_temperature: Array1::zeros(n),
            time: Array1::zeros(n),
        }
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// T_nu / T at each sample; 1 before e+e- annihilation, (4/11)^(1/3) after.
    pub fn neutrino_ratio(&self) -> Array1<f64> {
        &self.neutrino_temperature / &self.temperature
    }
}
