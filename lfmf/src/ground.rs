//! Electrical description of the ground.

use crate::{params::Polarization, EPSILON_0};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Returns the complex relative permittivity of the ground,
/// `epsilon + i * sigma / (2π f ε₀)`.
///
/// # Parameters
///
/// - `epsilon`: relative permittivity
/// - `sigma`: conductivity (Siemens/meter)
/// - `f_hz`: frequency (Hertz)
pub fn complex_permittivity(epsilon: f64, sigma: f64, f_hz: f64) -> Complex64 {
    Complex64::new(epsilon, sigma / (2.0 * PI * f_hz * EPSILON_0))
}

/// Returns the surface impedance normalized to free space.
pub fn surface_impedance(eta: Complex64, pol: Polarization) -> Complex64 {
    let root = (eta - 1.0).sqrt();
    match pol {
        Polarization::Horizontal => root,
        Polarization::Vertical => root / eta,
    }
}
