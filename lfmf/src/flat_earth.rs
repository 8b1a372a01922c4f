//! Sommerfeld-Norton flat earth attenuation with a first-order earth
//! curvature correction.

use crate::faddeeva::Faddeeva;
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::f64::consts::PI;

/// Below this `|sqrt(p)|` both `F(p)` and the curvature bracket are
/// summed from their power series.
const SERIES_LIMIT: f64 = 2.0;

const MAX_TERMS: usize = 200;

/// Returns the complex attenuation function at normalized distance `x`.
///
/// # Parameters
///
/// - `x`: normalized distance, `ν d / a`
/// - `q`: normalized surface admittance, `i ν Δ`
/// - `y_1`, `y_2`: normalized terminal heights, `k h / ν`
pub fn attenuation(x: f64, q: Complex64, y_1: f64, y_2: f64, faddeeva: &Faddeeva) -> Complex64 {
    let p = -Complex64::i() * x * q * q;
    let (f, bracket) = sommerfeld(p, faddeeva);
    let curved = f + bracket / (4.0 * q * q * q);
    curved * height_gain(y_1, q) * height_gain(y_2, q)
}

/// `1 - y q`: the leading term of `w(t - y) / w(t)` at a root of
/// `w'(t) = q w(t)`.
fn height_gain(y: f64, q: Complex64) -> Complex64 {
    1.0 - y * q
}

/// Returns `F(p)` and `1 + i sqrt(πp) - (1 + 2p) F(p)`.
fn sommerfeld(p: Complex64, faddeeva: &Faddeeva) -> (Complex64, Complex64) {
    let z = p.sqrt();
    let i_sqrt_pi_z = Complex64::i() * PI.sqrt() * z;

    if z.norm() >= SERIES_LIMIT {
        let f = 1.0 + i_sqrt_pi_z * faddeeva.eval(z);
        let bracket = 1.0 + i_sqrt_pi_z - (1.0 + 2.0 * p) * f;
        return (f, bracket);
    }

    // F(p) = Σ c_m z^m with c_m = -2 c_{m-2} / (m - 1). The bracket's
    // coefficients are -c_m - 2 c_{m-2}, which vanish below m = 3.
    let mut c_m2 = Complex64::one();
    let mut c_m1 = Complex64::i() * PI.sqrt();
    let mut z_m = z;
    let mut f = 1.0 + c_m1 * z;
    let mut bracket = Complex64::zero();

    for m in 2..MAX_TERMS {
        let c_m = c_m2 * (-2.0 / (m as f64 - 1.0));
        z_m *= z;
        let f_term = c_m * z_m;
        let bracket_term = (-c_m - 2.0 * c_m2) * z_m;
        f += f_term;
        bracket += bracket_term;
        c_m2 = c_m1;
        c_m1 = c_m;
        if m > 10
            && f_term.norm() <= f64::EPSILON * 1e-2 * f.norm()
            && bracket_term.norm() <= f64::EPSILON * 1e-2 * bracket.norm()
        {
            break;
        }
    }

    (f, bracket)
}

#[cfg(test)]
mod tests {
    use super::{attenuation, sommerfeld};
    use crate::faddeeva::Faddeeva;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    #[test]
    fn test_series_matches_faddeeva() {
        let faddeeva = Faddeeva::new();
        for arg in [0.0, 0.3, 0.5, 0.9] {
            let p = Complex64::from_polar(1.99 * 1.99, arg * PI);
            let (f, bracket) = sommerfeld(p, &faddeeva);
            let i_sqrt_pi_z = Complex64::i() * PI.sqrt() * p.sqrt();
            let f_direct = 1.0 + i_sqrt_pi_z * faddeeva.eval(p.sqrt());
            let bracket_direct = 1.0 + i_sqrt_pi_z - (1.0 + 2.0 * p) * f_direct;
            assert!((f - f_direct).norm() < 1e-10 * f_direct.norm());
            assert!((bracket - bracket_direct).norm() < 1e-9 * bracket_direct.norm());
        }
    }

    #[test]
    fn test_large_numerical_distance() {
        // F(p) → -1 / 2p
        let p = Complex64::new(400.0, 30.0);
        let (f, _) = sommerfeld(p, &Faddeeva::new());
        let expected = -1.0 / (2.0 * p);
        assert!((f - expected).norm() < 1e-2 * expected.norm());
    }

    #[test]
    fn test_short_distance_is_unattenuated() {
        let q = Complex64::new(1.2, 1.26);
        let w = attenuation(1e-9, q, 0.0, 0.0, &Faddeeva::new());
        assert_relative_eq!(w.norm(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perfect_conductor_curvature() {
        // |1 + (√π/4) exp(3πi/4) x^1.5| for a perfectly conducting sphere.
        let q = Complex64::new(2.755e-5, 2.755e-5);
        let faddeeva = Faddeeva::new();
        for x in [0.1, 0.2, 0.4] {
            let fock = 1.0 + Complex64::from_polar(PI.sqrt() / 4.0 * x * x.sqrt(), 0.75 * PI);
            let w = attenuation(x, q, 0.0, 0.0, &faddeeva);
            assert_relative_eq!(w.norm(), fock.norm(), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_height_gain() {
        let q = Complex64::new(1.2, 1.26);
        let faddeeva = Faddeeva::new();
        let ground = attenuation(0.1, q, 0.0, 0.0, &faddeeva);
        let raised = attenuation(0.1, q, 0.01, 0.0, &faddeeva);
        assert_relative_eq!(
            (raised / ground).norm(),
            (1.0 - 0.01 * q).norm(),
            max_relative = 1e-12
        );
    }
}
