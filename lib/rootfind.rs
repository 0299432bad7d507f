//! Root finding in the complex plane.

use num_complex::Complex64 as C64;
use crate::error::RootError;

pub type RootResult<T> = Result<T, RootError>;

#[derive(Copy, Clone, Debug)]
struct Window(C64, C64);

impl Window {
    fn push(&mut self, val: C64) { self.0 = self.1; self.1 = val; }
}

fn is_finite(z: C64) -> bool { z.re.is_finite() && z.im.is_finite() }

/// Find a zero of an analytic function `f` by the secant method, starting
/// from the two points `k0` and `k1`.
///
/// Iteration stops when successive iterates satisfy
/// `|Δk| <= epsilon (1 + |k|)`, or when `f` vanishes exactly.
///
/// ```
/// use num_complex::Complex64 as C64;
/// use siegert::rootfind::secant;
///
/// // z² + 1 = 0 has roots at ±i
/// let z = secant(|z| z * z + 1.0, C64::new(0.1, 0.5), C64::new(0.2, 0.8), 1e-12, 100)
///     .unwrap();
/// assert!((z - C64::i()).norm() < 1e-10);
/// ```
pub fn secant<F>(
    mut f: F,
    k0: C64,
    k1: C64,
    epsilon: f64,
    maxiters: usize,
) -> RootResult<C64>
where F: FnMut(C64) -> C64
{
    RootError::check_epsilon(epsilon)?;
    RootError::check_maxiters(maxiters)?;

    let mut k = Window(k0, k1);
    let mut fk = Window(f(k0), f(k1));
    for _ in 0..maxiters {
        if fk.1 == C64::from(0.0) { return Ok(k.1); }
        let denom = fk.1 - fk.0;
        if denom == C64::from(0.0) {
            return Err(RootError::ZeroDenominator(k.1));
        }
        let knext = k.1 - fk.1 * (k.1 - k.0) / denom;
        if !is_finite(knext) { return Err(RootError::NonFinite(k0)); }
        let converged = (knext - k.1).norm() <= epsilon * (1.0 + knext.norm());
        k.push(knext);
        if converged { return Ok(knext); }
        fk.push(f(knext));
    }
    Err(RootError::NoConvergence { guess: k0, maxiters })
}

/// Find a zero of `f` from a single starting point, taking the second secant
/// point a small relative step away.
pub fn secant_from<F>(f: F, k0: C64, epsilon: f64, maxiters: usize)
    -> RootResult<C64>
where F: FnMut(C64) -> C64
{
    let step = 1e-4 * (1.0 + k0.norm());
    secant(f, k0, k0 + C64::new(step, step), epsilon, maxiters)
}

/// Remove approximate duplicates from a list of roots, keeping the first of
/// each cluster. Two roots are duplicates when `|a - b| <= tol (1 + |a|)`.
pub fn dedup_roots<I>(roots: I, tol: f64) -> Vec<C64>
where I: IntoIterator<Item = C64>
{
    let mut acc: Vec<C64> = Vec::new();
    for r in roots.into_iter() {
        if !acc.iter().any(|a| (r - a).norm() <= tol * (1.0 + a.norm())) {
            acc.push(r);
        }
    }
    acc
}
