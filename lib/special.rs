//! Special functions needed by the coordinate maps and the Siegert-state time
//! propagator.
//!
//! ```
//! use num_complex::Complex64 as C64;
//! use siegert::special::{ erf, faddeeva };
//!
//! assert!((erf(1.0) - 0.8427007929497149).abs() < 1e-12);
//! // w(iy) = exp(y²) erfc(y) is real on the positive imaginary axis
//! let w = faddeeva(C64::new(0.0, 1.0));
//! assert!((w.re - 0.4275835761558070).abs() < 1e-8 && w.im.abs() < 1e-8);
//! ```

use std::{
    f64::consts::{ PI, SQRT_2 },
    sync::OnceLock,
};
use num_complex::Complex64 as C64;
use rustfft::FftPlanner;

const MAX_ITER: usize = 300;
const LN_SQRT_PI: f64 = 0.572_364_942_924_700_1; // ln Γ(1/2)
const FRAC_1_SQRT_PI: f64 = 0.564_189_583_547_756_3;

// number of terms in Weideman's rational expansion
const W_TERMS: usize = 40;

/// Error function erf(x) = (2/√π) ∫₀ˣ exp(-t²) dt.
///
/// Computed as sign(x) P(1/2, x²) through the regularized incomplete gamma
/// function: a power series for x² < 3/2 and a continued fraction for the
/// complement otherwise.
pub fn erf(x: f64) -> f64 {
    if x.is_nan() { return x; }
    let ax = x.abs();
    if ax == 0.0 { return 0.0; }
    if ax > 6.0 { return x.signum(); }
    let x2 = ax * ax;
    let p = if x2 < 1.5 { series_p(x2) } else { 1.0 - cf_q(x2) };
    x.signum() * p
}

/// Complementary error function erfc(x) = 1 - erf(x).
///
/// Evaluated directly for large positive `x` to avoid cancellation.
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() { return x; }
    if x < 1.3 { return 1.0 - erf(x); }
    if x > 27.0 { return 0.0; }
    cf_q(x * x)
}

// log prefactor exp(-x + a ln x - ln Γ(a)) for a = 1/2
fn prefactor(x: f64) -> f64 {
    (-x + 0.5 * x.ln() - LN_SQRT_PI).exp()
}

fn series_p(x: f64) -> f64 {
    let a: f64 = 0.5;
    let mut term = a.recip();
    let mut sum = term;
    let mut ap = a;
    for _ in 0..MAX_ITER {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * f64::EPSILON { break; }
    }
    prefactor(x) * sum
}

// modified Lentz evaluation of the continued fraction for Q(1/2, x)
fn cf_q(x: f64) -> f64 {
    const TINY: f64 = 1e-300;
    let a = 0.5;
    let b0 = x + 1.0 - a;
    let mut f = if b0.abs() < TINY { TINY } else { b0 };
    let mut c = f;
    let mut d = 0.0;
    for n in 1..=MAX_ITER {
        let nf = n as f64;
        let an = nf * (a - nf);
        let bn = x + (2 * n + 1) as f64 - a;
        d = bn + an * d;
        if d.abs() < TINY { d = TINY; }
        d = d.recip();
        c = bn + an / c;
        if c.abs() < TINY { c = TINY; }
        let delta = c * d;
        f *= delta;
        if (delta - 1.0).abs() < f64::EPSILON { break; }
    }
    prefactor(x) / f
}

// (L, a₁..a_N) for Weideman's expansion, computed once
fn weideman() -> &'static (f64, Vec<f64>) {
    static COEFFS: OnceLock<(f64, Vec<f64>)> = OnceLock::new();
    COEFFS.get_or_init(|| {
        let n = W_TERMS;
        let m = 2 * n;
        let m2 = 2 * m;
        let l = (n as f64 / SQRT_2).sqrt();
        let mut f: Vec<C64> = vec![C64::new(0.0, 0.0); m2];
        f.iter_mut().enumerate().skip(1)
            .for_each(|(j, fj)| {
                let theta = (j as f64 - m as f64) * PI / m as f64;
                let t = l * (theta / 2.0).tan();
                *fj = C64::from((-t * t).exp() * (l * l + t * t));
            });
        // fftshift
        f.rotate_left(m);
        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(m2).process(&mut f);
        let a: Vec<f64>
            = f.iter().skip(1).take(n)
            .map(|fk| fk.re / m2 as f64)
            .collect();
        (l, a)
    })
}

// w(z) for Im z >= 0
fn faddeeva_upper(z: C64) -> C64 {
    let (l, a) = weideman();
    let denom = C64::from(*l) - C64::i() * z;
    let zz = (C64::from(*l) + C64::i() * z) / denom;
    let p = a.iter().rev().fold(C64::new(0.0, 0.0), |acc, &ak| acc * zz + ak);
    2.0 * p / (denom * denom) + FRAC_1_SQRT_PI / denom
}

/// Faddeeva function w(z) = exp(-z²) erfc(-iz).
///
/// Uses Weideman's rational expansion[^1] in the upper half-plane and the
/// reflection w(z) = 2 exp(-z²) - w(-z) in the lower.
///
/// [^1]: J. A. C. Weideman, "Computation of the complex error function."
/// SIAM J. Numer. Anal. **31** 5 1497-1518 (1994).
pub fn faddeeva(z: C64) -> C64 {
    if z.im >= 0.0 {
        faddeeva_upper(z)
    } else {
        2.0 * (-z * z).exp() - faddeeva_upper(-z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erf_values() {
        let cases = [
            (0.0, 0.0),
            (0.3, 0.328_626_759_459_111_2),
            (1.0, 0.842_700_792_949_714_9),
            (-2.0, -0.995_322_265_018_952_7),
            (3.5, 0.999_999_256_901_627_7),
        ];
        for (x, expected) in cases {
            assert!((erf(x) - expected).abs() < 1e-12, "erf({x})");
        }
        assert!((erfc(3.0) - 2.209_049_699_858_544e-5).abs() < 1e-16);
    }

    #[test]
    fn faddeeva_values() {
        let w0 = faddeeva(C64::new(0.0, 0.0));
        assert!((w0 - 1.0).norm() < 1e-8);

        // real axis: Re w = exp(-x²), Im w = (2/√π) Dawson(x)
        let w1 = faddeeva(C64::new(1.0, 0.0));
        assert!((w1.re - (-1.0_f64).exp()).abs() < 1e-8);
        assert!((w1.im - 0.607_157_705_841_393_7).abs() < 1e-8);

        let wi = faddeeva(C64::new(0.0, 1.0));
        assert!((wi.re - 0.427_583_576_155_807).abs() < 1e-8);
    }

    #[test]
    fn faddeeva_reflection() {
        let z = C64::new(0.7, -0.4);
        let lhs = faddeeva(z) + faddeeva(-z);
        let rhs = 2.0 * (-z * z).exp();
        assert!((lhs - rhs).norm() < 1e-12);
    }
}
