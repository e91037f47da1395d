// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Reaction Network
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The fixed light-element reaction network.
//!
//! Eleven two-body reactions, in the order their rate fits are evaluated.
//! A `None` product slot is a photon: the reaction is a radiative capture
//! and its reverse is photodisintegration.

use std::f64::consts::PI;

use bbn_types::constants::HBAR_C;

use crate::species::Species::{self, *};

pub const NUM_REACTIONS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reaction {
    pub label: &'static str,
    pub reactants: [Species; 2],
    /// Second slot is `None` for a photon.
    pub products: [Option<Species>; 2],
}

pub static NETWORK: [Reaction; NUM_REACTIONS] = [
    Reaction { label: "n(p,g)d", reactants: [Neutron, Proton], products: [Some(Deuteron), None] },
    Reaction { label: "d(p,g)3He", reactants: [Deuteron, Proton], products: [Some(Helium3), None] },
    Reaction { label: "d(d,n)3He", reactants: [Deuteron, Deuteron], products: [Some(Helium3), Some(Neutron)] },
    Reaction { label: "d(d,p)t", reactants: [Deuteron, Deuteron], products: [Some(Tritium), Some(Proton)] },
    Reaction { label: "3He(n,p)t", reactants: [Helium3, Neutron], products: [Some(Tritium), Some(Proton)] },
    Reaction { label: "t(d,n)4He", reactants: [Tritium, Deuteron], products: [Some(Helium4), Some(Neutron)] },
    Reaction { label: "3He(d,p)4He", reactants: [Helium3, Deuteron], products: [Some(Helium4), Some(Proton)] },
    Reaction { label: "3He(4He,g)7Be", reactants: [Helium3, Helium4], products: [Some(Beryllium7), None] },
    Reaction { label: "4He(t,g)7Li", reactants: [Helium4, Tritium], products: [Some(Lithium7), None] },
    Reaction { label: "7Be(n,p)7Li", reactants: [Beryllium7, Neutron], products: [Some(Lithium7), Some(Proton)] },
    Reaction { label: "7Li(p,4He)4He", reactants: [Lithium7, Proton], products: [Some(Helium4), Some(Helium4)] },
];

fn slot_mass(s: Option<Species>) -> f64 {
    s.map_or(0.0, Species::mass)
}

impl Reaction {
    /// Radiative capture (single nucleus plus photon out).
    pub fn is_radiative(&self) -> bool {
        self.products[1].is_none()
    }

    /// Both reactants are the same nucleus; the flux carries a factor 1/2.
    pub fn identical_reactants(&self) -> bool {
        self.reactants[0] == self.reactants[1]
    }

    /// Q-value: reactant minus product rest mass (MeV). Positive = exothermic.
    pub fn q_value(&self) -> f64 {
        self.reactants[0].mass() + self.reactants[1].mass()
            - slot_mass(self.products[0])
            - slot_mass(self.products[1])
    }

    /// Participants as four state-vector slots, photon = `None`.
    pub fn slots(&self) -> [Option<usize>; 4] {
        [
            Some(self.reactants[0].index()),
            Some(self.reactants[1].index()),
            self.products[0].map(Species::index),
            self.products[1].map(Species::index),
        ]
    }

    fn sum_over<F: Fn(Species) -> u32>(&self, f: F) -> (u32, u32) {
        let lhs = f(self.reactants[0]) + f(self.reactants[1]);
        let rhs = self.products.iter().flatten().map(|&s| f(s)).sum();
        (lhs, rhs)
    }

    pub fn conserves_baryon_number(&self) -> bool {
        let (lhs, rhs) = self.sum_over(Species::mass_number);
        lhs == rhs
    }

    pub fn conserves_charge(&self) -> bool {
        let (lhs, rhs) = self.sum_over(Species::charge);
        lhs == rhs
    }

    /// Temperature-independent part of the detailed-balance ratio r_rev / r_fwd.
    ///
    /// 2 → 2: g₀g₁/(g₂g₃) · (m₀m₁/(m₂m₃))^{3/2}
    /// radiative: g₀g₁/g₂ · (m₀m₁/(2π m₂))^{3/2} / (ħc)³, to be multiplied by T^{3/2}
    pub fn balance_factor(&self) -> f64 {
        let [a, b] = self.reactants;
        let g_in = a.spin() * b.spin();
        let m_in = a.mass() * b.mass();
        match self.products {
            [Some(c), None] => {
                g_in / c.spin() * (m_in / c.mass() / (2.0 * PI)).powf(1.5) / HBAR_C.powi(3)
            }
            [Some(c), Some(d)] => {
                g_in / (c.spin() * d.spin()) * (m_in / (c.mass() * d.mass())).powf(1.5)
            }
            [None, _] => 0.0,
        }
    }

    /// Reverse rate from the forward rate at temperature `t` (MeV).
    /// Units follow the forward rate except for radiative captures, whose
    /// reverse (photodisintegration) is per second.
    pub fn reverse_rate(&self, forward: f64, t: f64) -> f64 {
        let boltzmann = (-self.q_value() / t).exp();
        let phase = if self.is_radiative() { t.powf(1.5) } else { 1.0 };
        forward * self.balance_factor() * boltzmann * phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_conserves_baryons_and_charge() {
        for r in NETWORK.iter() {
            assert!(r.conserves_baryon_number(), "{} breaks baryon number", r.label);
            assert!(r.conserves_charge(), "{} breaks charge", r.label);
        }
    }

    #[test]
    fn test_all_exothermic() {
        for r in NETWORK.iter() {
            assert!(r.q_value() > 0.0, "{} Q = {}", r.label, r.q_value());
        }
    }

    #[test]
    fn test_deuteron_binding() {
        let q = NETWORK[0].q_value();
        assert!((q - 2.2246).abs() < 1e-3, "B(d) = {q}");
    }

    #[test]
    fn test_radiative_flags() {
        let radiative: Vec<usize> = (0..NUM_REACTIONS)
            .filter(|&i| NETWORK[i].is_radiative())
            .collect();
        assert_eq!(radiative, vec![0, 1, 7, 8]);
        let identical: Vec<usize> = (0..NUM_REACTIONS)
            .filter(|&i| NETWORK[i].identical_reactants())
            .collect();
        assert_eq!(identical, vec![2, 3]);
    }

    #[test]
    fn test_slots() {
        assert_eq!(NETWORK[0].slots(), [Some(0), Some(1), Some(2), None]);
        assert_eq!(NETWORK[10].slots(), [Some(6), Some(1), Some(5), Some(5)]);
    }

    #[test]
    fn test_reverse_suppressed_at_low_temperature() {
        // 2 -> 2 reverse rates are Boltzmann suppressed by exp(-Q/T)
        let r = &NETWORK[5];
        let ratio = r.reverse_rate(1.0, 0.1);
        assert!(ratio > 0.0 && ratio < 1e-70, "t(d,n)4He reverse ratio {ratio}");
    }
}
