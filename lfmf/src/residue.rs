//! Residue series for the ground wave over a spherical earth.
//!
//! With `w(t) ∝ Ai(t e^{2πi/3})` the attenuation function is
//!
//! ```text
//! W = sqrt(πx) |Σ_s exp(i x t_s) f_s(y₁) f_s(y₂) / (t_s - q²)|
//! ```
//!
//! where `t_s` are the roots of `w'(t) = q w(t)` and
//! `f_s(y) = w(t_s - y) / w(t_s)` is the height gain of mode `s`.

use crate::{airy, error::LfmfError};
use log::trace;
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::f64::consts::PI;

/// Hard cap on the number of modes summed.
pub const MAX_MODES: usize = 200;

/// Terms smaller than this fraction of the leading term end the series.
pub const TRUNCATION: f64 = 1e-6;

/// Consecutive small terms needed before the series is cut off.
const TAIL_TERMS: usize = 2;

/// Largest change of a root allowed per continuation step.
const MAX_ROOT_SHIFT: f64 = 0.1;

const MAX_STEPS: usize = 10_000;
const MAX_NEWTON: usize = 60;

/// Magnitudes of the first zeros of `Ai'`.
const AIP_ZEROS: [f64; 5] = [
    1.018_792_971_647_471,
    3.248_197_582_179_837,
    4.820_099_211_178_736,
    6.163_307_355_639_486,
    7.372_177_255_047_770,
];

#[derive(Debug, Clone, Copy)]
struct Mode {
    t: Complex64,
    /// `f_s(y₁) f_s(y₂) / (t_s - q²)`
    weight: Complex64,
}

/// Partial sum of the residue series.
#[derive(Debug, Clone, Copy)]
pub struct Series {
    /// `W` (complex, before taking the magnitude).
    pub value: Complex64,
    /// Number of modes summed.
    pub terms: usize,
    /// False when [`MAX_MODES`] was reached before the series converged.
    pub converged: bool,
}

/// Mode roots for one ground/height configuration, computed lazily and
/// reused for every distance of a call.
#[derive(Debug, Clone)]
pub struct Modes {
    q: Complex64,
    y_1: f64,
    y_2: f64,
    modes: Vec<Mode>,
}

impl Modes {
    pub fn new(q: Complex64, y_1: f64, y_2: f64) -> Self {
        Self {
            q,
            y_1,
            y_2,
            modes: Vec::new(),
        }
    }

    /// Sums the series at normalized distance `x`.
    pub fn sum(&mut self, x: f64) -> Result<Series, LfmfError> {
        let mut total = Complex64::zero();
        let mut leading = 0.0;
        let mut small = 0;

        for s in 0..MAX_MODES {
            let Mode { t, weight } = self.mode(s)?;
            let term = (Complex64::i() * x * t).exp() * weight;
            total += term;

            if s == 0 {
                leading = term.norm();
            } else if term.norm() < TRUNCATION * leading {
                small += 1;
                if small == TAIL_TERMS {
                    trace!("residue series at x = {x} converged after {} terms", s + 1);
                    return Ok(Series {
                        value: (PI * x).sqrt() * total,
                        terms: s + 1,
                        converged: true,
                    });
                }
            } else {
                small = 0;
            }
        }

        Ok(Series {
            value: (PI * x).sqrt() * total,
            terms: MAX_MODES,
            converged: false,
        })
    }

    /// Number of mode roots located so far.
    pub fn located(&self) -> usize {
        self.modes.len()
    }

    fn mode(&mut self, s: usize) -> Result<Mode, LfmfError> {
        while self.modes.len() <= s {
            let index = self.modes.len();
            let t = track_root(index, self.q)?;
            let (ai_t, _) = w(t);
            let gain = height_gain(t, ai_t, self.y_1) * height_gain(t, ai_t, self.y_2);
            self.modes.push(Mode {
                t,
                weight: gain / (t - self.q * self.q),
            });
        }
        Ok(self.modes[s])
    }
}

/// Returns `Ai(ωt)` and `ω Ai'(ωt)`, i.e. `w(t)` and `w'(t)` up to a
/// common constant.
fn w(t: Complex64) -> (Complex64, Complex64) {
    let omega = airy::omega();
    let (ai, aip) = airy::airy(omega * t);
    (ai, omega * aip)
}

fn height_gain(t: Complex64, w_t: Complex64, y: f64) -> Complex64 {
    if y == 0.0 {
        return Complex64::one();
    }
    let (w_ty, _) = w(t - y);
    w_ty / w_t
}

/// Root of `w'(t) = 0` for mode `s` (zero based).
fn neumann_root(s: usize) -> Complex64 {
    let magnitude = AIP_ZEROS.get(s).copied().unwrap_or_else(|| {
        let x = 3.0 * PI / 8.0 * (4.0 * (s + 1) as f64 - 3.0);
        x.powf(2.0 / 3.0) * (1.0 - 7.0 / 48.0 * x.powi(-2) + 35.0 / 288.0 * x.powi(-4))
    });
    Complex64::from_polar(magnitude, PI / 3.0)
}

/// Follows root `s` of `w'(t) = q w(t)` from `q = 0` to the requested
/// `q` along the straight line `τq`, `τ ∈ [0, 1]`.
fn track_root(s: usize, q: Complex64) -> Result<Complex64, LfmfError> {
    let failure = LfmfError::ConvergenceFailure { mode: s };
    let guess = neumann_root(s);
    let mut t = newton(guess, Complex64::zero(), guess).ok_or(failure)?;
    if q.norm() == 0.0 {
        return Ok(t);
    }

    let mut tau = 0.0;
    let mut steps = 0;
    while tau < 1.0 {
        steps += 1;
        if steps > MAX_STEPS {
            return Err(LfmfError::ConvergenceFailure { mode: s });
        }

        // dt/dq = w / (t w - q w')
        let q_now = q * tau;
        let (w_t, wp_t) = w(t);
        let slope = w_t / (t * w_t - q_now * wp_t);
        let mut d_tau = (1.0 - tau).min(MAX_ROOT_SHIFT / (slope.norm() * q.norm()));

        loop {
            let next = if tau + d_tau >= 1.0 { 1.0 } else { tau + d_tau };
            let predicted = t + slope * q * (next - tau);
            if let Some(root) = newton(predicted, q * next, predicted) {
                t = root;
                tau = next;
                break;
            }
            d_tau *= 0.5;
            if d_tau < 1e-12 {
                return Err(LfmfError::ConvergenceFailure { mode: s });
            }
        }
    }

    trace!("mode {s}: t = {t} after {steps} continuation steps");
    Ok(t)
}

/// Newton iteration for `w'(t) - q w(t) = 0`, rejecting roots that wander
/// away from `anchor`.
fn newton(mut t: Complex64, q: Complex64, anchor: Complex64) -> Option<Complex64> {
    for _ in 0..MAX_NEWTON {
        let (w_t, wp_t) = w(t);
        // w'' = t w
        let delta = (wp_t - q * w_t) / (t * w_t - q * wp_t);
        if !(delta.re.is_finite() && delta.im.is_finite()) {
            return None;
        }
        t -= delta;
        if delta.norm() <= 1e-12 * t.norm().max(1.0) {
            return ((t - anchor).norm() <= 5.0 * MAX_ROOT_SHIFT).then_some(t);
        }
    }
    None
}
