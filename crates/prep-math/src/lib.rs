//! Numerical primitives for SCPN Transport Prep.

pub mod gaussian;
pub mod spline;
