//! Airy function of complex argument.
//!
//! `Ai(z)` and `Ai'(z)` are evaluated from their Maclaurin series close
//! to the origin and from the asymptotic expansion elsewhere. The
//! expansion is only used for `|arg z| <= 2π/3`; the remaining sector
//! around the negative real axis is reached through
//! `Ai(z) = -ω Ai(ωz) - ω² Ai(ω²z)`, `ω = exp(2πi/3)`.

use num_complex::Complex64;
use std::f64::consts::PI;

/// `Ai(0)`
const AI_0: f64 = 0.355_028_053_887_817_239_26;
/// `-Ai'(0)`
const AIP_0: f64 = 0.258_819_403_792_806_798_41;

/// Below this modulus the Maclaurin series is summed directly.
const SERIES_RADIUS: f64 = 6.0;

const MAX_TERMS: usize = 200;

/// `exp(2πi/3)`
pub fn omega() -> Complex64 {
    Complex64::from_polar(1.0, 2.0 * PI / 3.0)
}

/// Returns `(Ai(z), Ai'(z))`.
pub fn airy(z: Complex64) -> (Complex64, Complex64) {
    if z.norm() <= SERIES_RADIUS {
        maclaurin(z)
    } else if z.arg().abs() <= 2.0 * PI / 3.0 {
        asymptotic(z)
    } else {
        let w = omega();
        let w2 = w * w;
        let (ai_1, aip_1) = asymptotic(z * w);
        let (ai_2, aip_2) = asymptotic(z * w2);
        // ω⁴ = ω
        (-(w * ai_1) - w2 * ai_2, -(w2 * aip_1) - w * aip_2)
    }
}

fn maclaurin(z: Complex64) -> (Complex64, Complex64) {
    let z3 = z * z * z;

    // f(z), g(z) and their derivatives, Ai = c1 f - c2 g.
    let mut tf = Complex64::new(1.0, 0.0);
    let mut tg = z;
    let mut tfp = z * z * 0.5;
    let mut tgp = Complex64::new(1.0, 0.0);
    let (mut f, mut g, mut fp, mut gp) = (tf, tg, tfp, tgp);

    for k in 1..MAX_TERMS {
        let k = k as f64;
        tf *= z3 / ((3.0 * k - 1.0) * (3.0 * k));
        tg *= z3 / ((3.0 * k) * (3.0 * k + 1.0));
        tfp *= z3 / ((3.0 * k) * (3.0 * k + 2.0));
        tgp *= z3 / ((3.0 * k - 2.0) * (3.0 * k));
        f += tf;
        g += tg;
        fp += tfp;
        gp += tgp;

        let term = tf.norm().max(tg.norm()).max(tfp.norm()).max(tgp.norm());
        let sum = f.norm().max(g.norm()).max(fp.norm()).max(gp.norm());
        if term <= f64::EPSILON * 1e-2 * sum {
            break;
        }
    }

    (f * AI_0 - g * AIP_0, fp * AI_0 - gp * AIP_0)
}

fn asymptotic(z: Complex64) -> (Complex64, Complex64) {
    let ln_z = z.ln();
    let zeta = (ln_z * 1.5).exp() * (2.0 / 3.0);
    let z_quarter = (ln_z * 0.25).exp();
    let inv_zeta = -zeta.inv();

    let mut u = 1.0;
    let mut power = Complex64::new(1.0, 0.0);
    let mut ai = Series::new();
    let mut aip = Series::new();

    for k in 1..MAX_TERMS {
        let kf = k as f64;
        u *= (6.0 * kf - 5.0) * (6.0 * kf - 3.0) * (6.0 * kf - 1.0)
            / ((2.0 * kf - 1.0) * 216.0 * kf);
        let v = -(6.0 * kf + 1.0) / (6.0 * kf - 1.0) * u;
        power *= inv_zeta;
        ai.push(power * u);
        aip.push(power * v);
        if ai.done && aip.done {
            break;
        }
    }

    let scale = (-zeta).exp() / (2.0 * PI.sqrt());
    (scale * ai.sum / z_quarter, -scale * z_quarter * aip.sum)
}

/// Asymptotic series summed up to its smallest term.
struct Series {
    sum: Complex64,
    last: f64,
    done: bool,
}

impl Series {
    fn new() -> Self {
        Self {
            sum: Complex64::new(1.0, 0.0),
            last: 1.0,
            done: false,
        }
    }

    fn push(&mut self, term: Complex64) {
        if self.done {
            return;
        }
        let norm = term.norm();
        if norm >= self.last {
            self.done = true;
            return;
        }
        self.sum += term;
        self.last = norm;
        if norm <= f64::EPSILON * 1e-2 * self.sum.norm() {
            self.done = true;
        }
    }
}
