//! Faddeeva function `w(z) = exp(-z²) erfc(-iz)` in the upper half plane.
//!
//! Uses Weideman's rational expansion (SIAM J. Numer. Anal. 31, 1994),
//! whose coefficients are the cosine transform of
//! `exp(-t²)(L² + t²)` sampled at `t = L tan(θ/2)`.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Number of expansion terms.
const N: usize = 40;

#[derive(Debug, Clone)]
pub struct Faddeeva {
    coefficients: [f64; N],
    l: f64,
}

impl Faddeeva {
    pub fn new() -> Self {
        let m = 2 * N;
        let l = (N as f64 / 2f64.sqrt()).sqrt();
        let sample = |k: usize| {
            let t = l * (k as f64 * PI / m as f64 / 2.0).tan();
            (-t * t).exp() * (l * l + t * t)
        };
        let samples: Vec<f64> = (0..m).map(sample).collect();

        let mut coefficients = [0.0; N];
        for (n, coefficient) in coefficients.iter_mut().enumerate() {
            let n = n + 1;
            let sum: f64 = samples[0]
                + samples
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(k, s)| 2.0 * s * (PI * (k * n) as f64 / m as f64).cos())
                    .sum::<f64>();
            *coefficient = sum / (2 * m) as f64;
        }

        Self { coefficients, l }
    }

    /// Evaluates `w(z)`; `z` must satisfy `Im z >= 0`.
    pub fn eval(&self, z: Complex64) -> Complex64 {
        debug_assert!(z.im >= 0.0, "faddeeva evaluated below the real axis");
        let iz = Complex64::i() * z;
        let denom = self.l - iz;
        let big_z = (self.l + iz) / denom;
        let poly = self
            .coefficients
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * big_z + c);
        poly * 2.0 / (denom * denom) + (PI.sqrt() * denom).inv()
    }
}

impl Default for Faddeeva {
    fn default() -> Self {
        Self::new()
    }
}
