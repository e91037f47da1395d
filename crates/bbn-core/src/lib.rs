// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Big Bang nucleosynthesis: thermal expansion, weak n ↔ p conversion and
//! the light-element reaction network.

pub mod driver;
pub mod expansion;
pub mod history;
pub mod network;
pub mod weak;

pub use bbn_nuclear::rates::reaction_rate;
pub use bbn_types::config::initialize;
pub use driver::bbn;
pub use expansion::{expansion, expansion_eq, expansion_eq_array};
pub use weak::weak_rate;
