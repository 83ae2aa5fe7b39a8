//! Integrators
pub mod simpson;
