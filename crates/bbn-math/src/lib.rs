//! Mathematical primitives for SCPN BBN Core.

pub mod interp;
pub mod linalg;
pub mod ode;
pub mod quadrature;
pub mod stiff;
pub mod tridiag;
