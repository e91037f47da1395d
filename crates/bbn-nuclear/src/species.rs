// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Species
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The eight tracked light nuclides.
//!
//! Identity is the enum variant; mass, spin degeneracy and mass number are
//! looked up from a static table. The variant order is the state-vector
//! order used by the network integrator.

use std::fmt;
use std::str::FromStr;

use bbn_types::constants::{AMU, M_NEUTRON, M_PROTON};
use bbn_types::error::{BbnError, BbnResult};
use serde::{Deserialize, Serialize};

pub const NUM_SPECIES: usize = 8;

/// Static nuclear data for one species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Rest mass (MeV)
    pub mass: f64,
    /// Spin degeneracy g = 2J + 1
    pub spin: f64,
    pub name: &'static str,
    /// Electric charge Z
    pub charge: u32,
}

impl Particle {
    /// Mass number A = round(mass / amu).
    pub fn mass_number(&self) -> u32 {
        (self.mass / AMU).round() as u32
    }
}

const PARTICLES: [Particle; NUM_SPECIES] = [
    Particle { mass: M_NEUTRON, spin: 2.0, name: "neutron", charge: 0 },
    Particle { mass: M_PROTON, spin: 2.0, name: "proton", charge: 1 },
    Particle { mass: 1875.612793, spin: 3.0, name: "deutron", charge: 1 },
    Particle { mass: 2808.920906, spin: 2.0, name: "tritium", charge: 1 },
    Particle { mass: 2808.391383, spin: 2.0, name: "helium3", charge: 2 },
    Particle { mass: 3727.379109, spin: 1.0, name: "helium4", charge: 2 },
    Particle { mass: 6533.833166, spin: 4.0, name: "lithium7", charge: 3 },
    Particle { mass: 6534.184060, spin: 4.0, name: "beryllium7", charge: 4 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "neutron")]
    Neutron,
    #[serde(rename = "proton")]
    Proton,
    #[serde(rename = "deutron", alias = "deuteron")]
    Deuteron,
    #[serde(rename = "tritium")]
    Tritium,
    #[serde(rename = "helium3")]
    Helium3,
    #[serde(rename = "helium4")]
    Helium4,
    #[serde(rename = "lithium7")]
    Lithium7,
    #[serde(rename = "beryllium7")]
    Beryllium7,
}

impl Species {
    pub const ALL: [Species; NUM_SPECIES] = [
        Species::Neutron,
        Species::Proton,
        Species::Deuteron,
        Species::Tritium,
        Species::Helium3,
        Species::Helium4,
        Species::Lithium7,
        Species::Beryllium7,
    ];

    /// Position in the network state vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn particle(self) -> &'static Particle {
        &PARTICLES[self.index()]
    }

    pub fn mass(self) -> f64 {
        self.particle().mass
    }

    pub fn spin(self) -> f64 {
        self.particle().spin
    }

    pub fn name(self) -> &'static str {
        self.particle().name
    }

    pub fn mass_number(self) -> u32 {
        self.particle().mass_number()
    }

    pub fn charge(self) -> u32 {
        self.particle().charge
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = BbnError;

    fn from_str(s: &str) -> BbnResult<Self> {
        if s == "deuteron" {
            return Ok(Species::Deuteron);
        }
        Species::ALL
            .iter()
            .copied()
            .find(|sp| sp.name() == s)
            .ok_or_else(|| BbnError::UnknownSpecies(s.to_string()))
    }
}

/// Parse an ordered list of species names; the first unknown name fails.
pub fn parse_species<S: AsRef<str>>(names: &[S]) -> BbnResult<Vec<Species>> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}
