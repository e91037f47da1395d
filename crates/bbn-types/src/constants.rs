// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants in natural-ish units.
//!
//! Energies and temperatures are in MeV, times in seconds, lengths in cm.
//! Nuclear masses live with the species registry in `bbn-nuclear`.

/// Reduced Planck constant (MeV s)
pub const HBAR: f64 = 6.58211899e-22;

/// Speed of light (cm/s)
pub const C_LIGHT: f64 = 2.99792458e10;

/// hbar * c (MeV cm), the conversion between MeV^3 and cm^-3.
pub const HBAR_C: f64 = HBAR * C_LIGHT;

/// Newton's constant in units of hbar c^5 MeV^-2
pub const G_NEWTON: f64 = 6.70881e-45;

/// Electron mass (MeV)
pub const M_ELECTRON: f64 = 0.510998911;

/// Proton mass (MeV)
pub const M_PROTON: f64 = 938.272013;

/// Neutron mass (MeV)
pub const M_NEUTRON: f64 = 939.565346;

/// Neutron-proton mass difference Q (MeV)
pub const Q_NP: f64 = M_NEUTRON - M_PROTON;

/// Atomic mass unit (MeV)
pub const AMU: f64 = 931.494003;

/// Radiation constant pi^2/15 for a single bosonic species with g = 2.
pub const A_RAD: f64 = std::f64::consts::PI * std::f64::consts::PI / 15.0;

/// Free neutron lifetime (s)
pub const TAU_NEUTRON: f64 = 885.7;

/// Boltzmann constant (MeV/K)
pub const K_BOLTZMANN: f64 = 8.617343e-11;

/// Temperature of 1 GK expressed in MeV.
pub const T9_MEV: f64 = K_BOLTZMANN * 1.0e9;

/// Avogadro number (1/mol)
pub const N_AVOGADRO: f64 = 6.02214179e23;

/// Riemann zeta(3)
pub const ZETA3: f64 = 1.20205690316;

/// Dimensionless phase-space integral of free neutron decay.
/// Normalises the n <-> p rates so that the T -> 0 limit of n -> p is 1/tau_n.
pub const NEUTRON_DECAY_PHASE_SPACE: f64 = 1.6361;

/// Fermion to boson energy-density ratio.
pub const FERMI_FACTOR: f64 = 7.0 / 8.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_difference() {
        assert!((Q_NP - 1.293333).abs() < 1e-6, "Q = {Q_NP}");
    }

    #[test]
    fn test_one_gigakelvin() {
        assert!((T9_MEV - 0.08617343).abs() < 1e-12);
    }
}
