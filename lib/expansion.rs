//! Strength functions and wavepacket propagation through competing
//! expansions.
//!
//! For a test function `φ`, the strength function (per unit energy at
//! `E = k² / 2`) and the propagated wavepacket are reconstructed from:
//!
//! - the Mittag-Leffler expansion (MLE) of the outgoing Green's function over
//!   all Siegert states `u_n` of a square well,
//!   ```text
//!   S(k) = -(1/π) Im Σ_n (u_n|φ̄)(u_n|φ) / (k_n (k - k_n))
//!   ```
//! - the exact Siegert propagator `ψ(x, t) = Σ_n u_n(x) (u_n|φ) M(k_n, t)`,
//!   where `M` is expressed through the Faddeeva function,
//! - direct integration over continuum states,
//! - the Berggren expansion over the eigenstates of a complex-scaled
//!   Hamiltonian,
//!   ```text
//!   S(k) = -(1/π) Im Σ_n (u_n|φ̄)(u_n|φ) / (E - E_n)
//!   ```
//!
//! Siegert expansions are complete only inside the potential region, so the
//! MLE and exact Siegert routines require both the evaluation point and the
//! support of the test function to lie there.

use std::f64::consts::{ FRAC_PI_4, PI };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    basisset::BasisSet,
    eigenstate::{ Eigenstate, Parity, StateKind },
    error::ExpError,
    functions::{ Conjugate, TestFunction },
    hamiltonian::GridState,
    potential::SquareWell,
    special::faddeeva,
    swp::{ SwContinuum, SwState },
};

pub type ExpResult<T> = Result<T, ExpError>;

// relative distance to a pole below which evaluation points are shifted
const POLE_RTOL: f64 = 1e-10;
// relative change of partial sums over the final quarter above which a sum is
// reported as slow
const SLOW_RTOL: f64 = 1e-3;
// growth of terms in the final quarter over the rest marking divergence
const DIVERGE_FACTOR: f64 = 1e3;
// slack on the containment of test functions in the potential region
const SUPPORT_TOL: f64 = 1e-12;

/// Convergence of a partial-sum sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Convergence {
    Converged,
    Slow,
    Diverged,
}

impl Convergence {
    /// Judge a sequence of partial sums.
    ///
    /// The sum diverges if any partial sum is non-finite or if the largest
    /// term of the final quarter exceeds the largest earlier term by a large
    /// factor. It is slow if the relative change over the final quarter
    /// exceeds `rtol`, or if there are too few terms to tell.
    pub fn from_partial_sums(partial: &[C64], rtol: f64) -> Self {
        if partial.iter().any(|p| !(p.re.is_finite() && p.im.is_finite())) {
            return Self::Diverged;
        }
        let n = partial.len();
        if n < 4 { return Self::Slow; }
        let terms: Vec<f64>
            = std::iter::once(partial[0].norm())
            .chain(partial.windows(2).map(|w| (w[1] - w[0]).norm()))
            .collect();
        let q = 3 * n / 4;
        let head = terms[..q].iter().copied().fold(0.0, f64::max);
        let tail = terms[q..].iter().copied().fold(0.0, f64::max);
        if tail > DIVERGE_FACTOR * head.max(f64::MIN_POSITIVE) {
            return Self::Diverged;
        }
        let last = partial[n - 1];
        let change = (last - partial[q - 1]).norm();
        if change > rtol * last.norm().max(f64::MIN_POSITIVE) {
            Self::Slow
        } else {
            Self::Converged
        }
    }
}

/// Result of a Siegert completeness check at a single point.
#[derive(Clone, Debug)]
pub struct Completeness {
    /// `½ Σ_n u_n(x) (u_n|φ)`.
    pub value: C64,
    /// `φ(x)`.
    pub exact: C64,
    /// `Σ_n u_n(x) (u_n|φ) / k_n`, which vanishes for a complete set.
    pub sum_rule: C64,
    /// Partial sums of `value`, with states ordered by `|k_n|`.
    pub partial_sums: Vec<C64>,
    pub convergence: Convergence,
}

impl Completeness {
    /// `|value - exact|`.
    pub fn error(&self) -> f64 { (self.value - self.exact).norm() }
}

// shift `z` into the upper half-plane if it sits on top of `pole`
fn avoid_pole(z: C64, pole: C64) -> C64 {
    let eps = POLE_RTOL * (1.0 + pole.norm());
    if (z - pole).norm() < eps {
        log::debug!(
            "expansion: evaluation point {z} within {eps:e} of pole {pole}; \
            shifting into the upper half-plane"
        );
        z + C64::new(0.0, eps)
    } else {
        z
    }
}

// trapezoidal weights on a sorted, possibly non-uniform grid
fn trapz_weights(k: &[f64]) -> Vec<f64> {
    let n = k.len();
    (0..n)
        .map(|i| {
            let lo = if i == 0 { k[0] } else { k[i - 1] };
            let hi = if i == n - 1 { k[n - 1] } else { k[i + 1] };
            (hi - lo) / 2.0
        })
        .collect()
}

fn check_kgrid<S>(kgrid: &Arr1<S>) -> ExpResult<Vec<f64>>
where S: nd::Data<Elem = f64>
{
    let k: Vec<f64> = kgrid.to_vec();
    (k.len() >= 2)
        .then_some(())
        .ok_or(ExpError::BadGrid("need at least two wavenumbers"))?;
    k.iter().all(|kk| kk.is_finite() && *kk >= 0.0)
        .then_some(())
        .ok_or(ExpError::BadGrid("wavenumbers must be finite and non-negative"))?;
    k.windows(2).all(|w| w[1] > w[0])
        .then_some(())
        .ok_or(ExpError::BadGrid("wavenumbers must be strictly increasing"))?;
    Ok(k)
}

fn check_times<S>(t: &Arr1<S>) -> ExpResult<()>
where S: nd::Data<Elem = f64>
{
    t.iter()
        .find(|tj| !(tj.is_finite() && **tj >= 0.0))
        .map_or(Ok(()), |&tj| Err(ExpError::BadTime(tj)))
}

fn partial_sums<I>(terms: I) -> Vec<C64>
where I: IntoIterator<Item = C64>
{
    terms.into_iter()
        .scan(C64::from(0.0), |acc, term| {
            *acc += term;
            Some(*acc)
        })
        .collect()
}

// total of a series whose terms are ordered by |k_n|, failing if the partial
// sums diverge
fn checked_sum<I>(terms: I) -> ExpResult<C64>
where I: IntoIterator<Item = C64>
{
    let partial = partial_sums(terms);
    if Convergence::from_partial_sums(&partial, SLOW_RTOL) == Convergence::Diverged {
        return Err(ExpError::Diverged { terms: partial.len() });
    }
    Ok(partial.last().copied().unwrap_or_else(|| C64::from(0.0)))
}

/// `M(k, t)` such that a Siegert state `u` contributes `u(x) (u|φ) M(k, t)`
/// to the propagated wavepacket. `M(k, 0) = ½` for all states.
///
/// The branch of the Faddeeva function is chosen so that it is always
/// evaluated in the upper half-plane. Only defined for `t >= 0`; negative
/// times give NaN.
pub fn siegert_propagator(k: C64, t: f64, kind: StateKind) -> C64 {
    let E = k * k / 2.0;
    let s = k * C64::from_polar(1.0, FRAC_PI_4) * (t / 2.0).sqrt();
    let mut ang = k.arg() + FRAC_PI_4;
    if ang > PI { ang -= 2.0 * PI; }
    let free = (-C64::i() * E * t).exp();
    let mut m
        = if (0.0..=PI).contains(&ang) {
            let w = -0.5 * faddeeva(s);
            if ang > 0.0 && ang < FRAC_PI_4 { w + free } else { w }
        } else {
            let w = 0.5 * faddeeva(-s);
            if ang > -PI && ang < -3.0 * FRAC_PI_4 { w - free } else { w }
        };
    if kind == StateKind::Bound { m += free; }
    m
}

// a Siegert state with its c-products against φ and φ̄
struct Term<'a> {
    state: &'a SwState,
    k: C64,
    c: C64,
    cbar: C64,
}

fn continuum_strength<F>(state: &SwState, test: &F) -> f64
where F: TestFunction
{
    state.braket(test).norm_sqr() / state.wavenumber().re
}

/// Compute the strength function at each wavenumber in `kgrid` directly from
/// continuum states of `well`, constructed on the fly:
/// `S(k) = Σ_p |<ψ_{k,p}|φ>|² / k`.
pub fn exact_strength_function_otf<F, S>(
    well: &SquareWell,
    test: &F,
    kgrid: &Arr1<S>,
) -> ExpResult<nd::Array1<f64>>
where
    F: TestFunction,
    S: nd::Data<Elem = f64>,
{
    kgrid.iter()
        .map(|&k| {
            [Parity::Even, Parity::Odd].into_iter()
                .map(|p| -> ExpResult<f64> {
                    let state: SwState = SwContinuum::new(well, k, p)?.into();
                    Ok(continuum_strength(&state, test))
                })
                .sum::<ExpResult<f64>>()
        })
        .collect()
}

fn sort_terms(terms: &mut [Term<'_>]) {
    terms.sort_by(|l, r| l.k.norm().total_cmp(&r.k.norm()));
}

// -(1/π) Im (u_n|φ̄)(u_n|φ) / (k_n (k - k_n)), one row per term
fn mle_rows<S>(terms: &[Term<'_>], kgrid: &Arr1<S>) -> nd::Array2<f64>
where S: nd::Data<Elem = f64>
{
    let mut rows: nd::Array2<f64> = nd::Array2::zeros((terms.len(), kgrid.len()));
    for (term, mut row) in terms.iter().zip(rows.rows_mut()) {
        row.iter_mut().zip(kgrid)
            .for_each(|(r, &k)| {
                let kk = avoid_pole(C64::from(k), term.k);
                *r = -(term.cbar * term.c / (term.k * (kk - term.k))).im / PI;
            });
    }
    rows
}

impl BasisSet<SwState> {
    fn half_width(&self) -> ExpResult<f64> {
        self.iter().next()
            .map(|s| s.half_width())
            .ok_or(ExpError::NoStates("square well"))
    }

    fn check_point(&self, x: f64) -> ExpResult<f64> {
        let a = self.half_width()?;
        (x.abs() <= a)
            .then_some(a)
            .ok_or(ExpError::OutsidePotential { x, a })
    }

    fn check_test<F: TestFunction>(&self, test: &F) -> ExpResult<f64> {
        let a = self.half_width()?;
        let (lo, hi) = test.support();
        (lo >= -a - SUPPORT_TOL && hi <= a + SUPPORT_TOL)
            .then_some(a)
            .ok_or(ExpError::TestOutsidePotential(lo, hi))
    }

    // Siegert states with their c-products, in basis order
    fn siegert_terms<F: TestFunction>(&self, test: &F) -> ExpResult<Vec<Term<'_>>> {
        self.check_test(test)?;
        let conj = Conjugate(test);
        let terms: Vec<Term>
            = self.iter()
            .filter(|s| s.kind().is_siegert())
            .map(|state| Term {
                state,
                k: state.wavenumber(),
                c: state.cproduct(test),
                cbar: state.cproduct(&conj),
            })
            .collect();
        (!terms.is_empty())
            .then_some(terms)
            .ok_or(ExpError::NoStates("Siegert"))
    }

    /// Per-state MLE contributions to the strength function, with one row per
    /// Siegert state (in basis order) and one column per wavenumber in
    /// `kgrid`.
    pub fn mle_strength_contributions<F, S>(&self, test: &F, kgrid: &Arr1<S>)
        -> ExpResult<nd::Array2<f64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        Ok(mle_rows(&self.siegert_terms(test)?, kgrid))
    }

    /// MLE strength function over all Siegert states in the basis.
    ///
    /// Requires the test function to lie inside the well. Returns
    /// [`ExpError::Diverged`] if the sum over states diverges at any
    /// wavenumber.
    pub fn mle_strength_function<F, S>(&self, test: &F, kgrid: &Arr1<S>)
        -> ExpResult<nd::Array1<f64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        let mut terms = self.siegert_terms(test)?;
        sort_terms(&mut terms);
        let rows = mle_rows(&terms, kgrid);
        rows.columns().into_iter()
            .map(|col| checked_sum(col.iter().map(|&r| C64::from(r))).map(|s| s.re))
            .collect()
    }

    /// Strength function from the continuum states of the basis, returned as
    /// `(k, S(k))` at each distinct continuum wavenumber.
    pub fn exact_strength_function<F>(&self, test: &F)
        -> ExpResult<(nd::Array1<f64>, nd::Array1<f64>)>
    where F: TestFunction
    {
        let mut pairs: Vec<(f64, f64)>
            = self.iter()
            .filter(|s| s.is_continuum())
            .map(|s| (s.wavenumber().re, continuum_strength(s, test)))
            .collect();
        if pairs.is_empty() { return Err(ExpError::NoStates("continuum")); }
        pairs.sort_by(|l, r| l.0.total_cmp(&r.0));
        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(pairs.len());
        for (k, s) in pairs.into_iter() {
            match merged.last_mut() {
                Some((kl, sl)) if (k - *kl).abs() <= 1e-12 * (1.0 + k) => {
                    *sl += s;
                },
                _ => { merged.push((k, s)); },
            }
        }
        let (k, s): (Vec<f64>, Vec<f64>) = merged.into_iter().unzip();
        Ok((k.into(), s.into()))
    }

    /// Check the Siegert completeness relation `φ(x) = ½ Σ_n u_n(x) (u_n|φ)`
    /// and its companion sum rule at a point `x` inside the well.
    ///
    /// Returns [`ExpError::Diverged`] if the partial sums diverge.
    pub fn siegert_completeness<F>(&self, test: &F, x: f64)
        -> ExpResult<Completeness>
    where F: TestFunction
    {
        self.check_point(x)?;
        let mut terms = self.siegert_terms(test)?;
        sort_terms(&mut terms);
        let uc: Vec<(C64, C64)>
            = terms.iter()
            .map(|term| (term.k, term.state.eval(x) * term.c))
            .collect();
        let partial_sums = partial_sums(uc.iter().map(|(_, u)| 0.5 * *u));
        let convergence = Convergence::from_partial_sums(&partial_sums, SLOW_RTOL);
        if convergence == Convergence::Diverged {
            return Err(ExpError::Diverged { terms: partial_sums.len() });
        }
        let sum_rule: C64 = uc.iter().map(|(k, u)| *u / *k).sum();
        Ok(Completeness {
            value: partial_sums.last().copied().unwrap_or_else(|| C64::from(0.0)),
            exact: test.eval_real(x),
            sum_rule,
            partial_sums,
            convergence,
        })
    }

    /// Propagate the test function to times `t` and evaluate at `x` through
    /// the exact Siegert expansion `Σ_n u_n(x) (u_n|φ) M(k_n, t)` (see
    /// [`siegert_propagator`]).
    ///
    /// Times must be finite and non-negative. Returns [`ExpError::Diverged`]
    /// if the sum over states diverges at any time.
    pub fn siegert_propagation<F, S>(&self, test: &F, x: f64, t: &Arr1<S>)
        -> ExpResult<nd::Array1<C64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        self.check_point(x)?;
        check_times(t)?;
        let mut terms = self.siegert_terms(test)?;
        sort_terms(&mut terms);
        let coeffs: Vec<(C64, StateKind, C64)>
            = terms.iter()
            .map(|term| (term.k, term.state.kind(), term.state.eval(x) * term.c))
            .collect();
        t.iter()
            .map(|&tj| {
                checked_sum(
                    coeffs.iter()
                        .map(|(k, kind, uc)| uc * siegert_propagator(*k, tj, *kind))
                )
            })
            .collect()
    }

    fn bound_propagation<F, S>(&self, test: &F, x: f64, t: &Arr1<S>)
        -> nd::Array1<C64>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        let bound: Vec<(C64, C64)>
            = self.iter()
            .filter(|s| s.kind() == StateKind::Bound)
            .map(|s| (s.energy(), s.eval(x) * s.braket(test)))
            .collect();
        t.mapv(|tj| {
            bound.iter()
                .map(|(E, uc)| uc * (-C64::i() * E * tj).exp())
                .sum::<C64>()
        })
    }

    /// Propagate the test function through the MLE: bound states plus
    /// ```text
    /// ∫ dk k e^{-i k² t / 2} (i/π) Σ_n u_n(x) (u_n|φ) k / (k_n (k² - k_n²))
    /// ```
    /// integrated with the trapezoidal rule over `kgrid`.
    ///
    /// Times must be finite and non-negative. Returns [`ExpError::Diverged`]
    /// if the sum over states diverges at any wavenumber.
    pub fn mle_propagation<F, S, T>(
        &self,
        test: &F,
        x: f64,
        t: &Arr1<S>,
        kgrid: &Arr1<T>,
    ) -> ExpResult<nd::Array1<C64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        self.check_point(x)?;
        check_times(t)?;
        let k = check_kgrid(kgrid)?;
        let mut terms = self.siegert_terms(test)?;
        sort_terms(&mut terms);
        let coeffs: Vec<(C64, C64)>
            = terms.iter()
            .map(|term| (term.k, term.state.eval(x) * term.c))
            .collect();
        let weights = trapz_weights(&k);
        // k-space integrand without the time dependence
        let g: Vec<C64>
            = k.iter().zip(&weights)
            .map(|(&kk, &wk)| -> ExpResult<C64> {
                let sum
                    = checked_sum(
                        coeffs.iter()
                            .map(|(kn, uc)| {
                                let z = avoid_pole(avoid_pole(C64::from(kk), *kn), -kn);
                                uc * z / (kn * (z * z - kn * kn))
                            })
                    )?;
                Ok(wk * kk * C64::i() / PI * sum)
            })
            .collect::<ExpResult<_>>()?;
        let bound = self.bound_propagation(test, x, t);
        Ok(
            nd::Zip::from(t).and(&bound)
                .map_collect(|&tj, b| {
                    b + k.iter().zip(&g)
                        .map(|(&kk, gk)| gk * (-C64::i() * kk * kk * tj / 2.0).exp())
                        .sum::<C64>()
                })
        )
    }

    /// Propagate the test function by integrating over the continuum states of
    /// the basis and adding its bound states.
    ///
    /// The continuum integral uses the trapezoidal rule over the available
    /// wavenumbers of each parity, with the integrand taken to vanish at
    /// `k = 0`. Times must be finite and non-negative.
    pub fn exact_propagation<F, S>(&self, test: &F, x: f64, t: &Arr1<S>)
        -> ExpResult<nd::Array1<C64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        self.check_test(test)?;
        check_times(t)?;
        let mut res = self.bound_propagation(test, x, t);
        let mut found = false;
        for parity in [Parity::Even, Parity::Odd] {
            let mut cont: Vec<(f64, C64)>
                = self.iter()
                .filter(|s| s.is_continuum() && s.parity() == Some(parity))
                .map(|s| (s.wavenumber().re, s.eval(x) * s.braket(test)))
                .collect();
            if cont.is_empty() { continue; }
            (cont.len() >= 2)
                .then_some(())
                .ok_or(ExpError::BadGrid("need at least two continuum states per parity"))?;
            found = true;
            cont.sort_by(|l, r| l.0.total_cmp(&r.0));
            let k: Vec<f64>
                = std::iter::once(0.0)
                .chain(cont.iter().map(|(kk, _)| *kk))
                .collect();
            let weights = trapz_weights(&k);
            res.iter_mut().zip(t)
                .for_each(|(rj, &tj)| {
                    *rj += cont.iter().zip(weights.iter().skip(1))
                        .map(|(&(kk, uc), &wk)| {
                            wk * uc * (-C64::i() * kk * kk * tj / 2.0).exp()
                        })
                        .sum::<C64>();
                });
        }
        found.then_some(res).ok_or(ExpError::NoStates("continuum"))
    }
}

impl BasisSet<GridState> {
    // (E_n, f(u_n)) for every state, ordered by |k_n|
    fn berggren_coeffs<G>(&self, f: G) -> ExpResult<Vec<(C64, C64)>>
    where G: FnMut(&GridState) -> C64
    {
        if self.is_empty() { return Err(ExpError::NoStates("grid")); }
        let mut states: Vec<&GridState> = self.iter().collect();
        states.sort_by(|l, r| {
            l.wavenumber().norm().total_cmp(&r.wavenumber().norm())
        });
        let energies: Vec<C64> = states.iter().map(|s| s.energy()).collect();
        Ok(energies.into_iter().zip(states.into_iter().map(f)).collect())
    }

    /// Berggren strength function over all states of a complex-scaled
    /// Hamiltonian.
    ///
    /// Returns [`ExpError::Diverged`] if the sum over states diverges at any
    /// wavenumber.
    pub fn berggren_strength_function<F, S>(&self, test: &F, kgrid: &Arr1<S>)
        -> ExpResult<nd::Array1<f64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        let conj = Conjugate(test);
        let coeffs
            = self.berggren_coeffs(|s| s.cproduct(&conj) * s.cproduct(test))?;
        kgrid.iter()
            .map(|&k| -> ExpResult<f64> {
                let E = C64::from(k * k / 2.0);
                let g
                    = checked_sum(
                        coeffs.iter()
                            .map(|(En, cc)| cc / (avoid_pole(E, *En) - En))
                    )?;
                Ok(-g.im / PI)
            })
            .collect()
    }

    /// Propagate the test function through the Berggren expansion,
    /// `Σ_n u_n(x) (u_n|φ) e^{-i E_n t}`, where `u_n(x)` is the state at grid
    /// coordinate `x` (see [`GridState`]).
    ///
    /// Times must be finite and non-negative. Returns [`ExpError::Diverged`]
    /// if the sum over states diverges at any time.
    pub fn berggren_propagation<F, S>(&self, test: &F, x: f64, t: &Arr1<S>)
        -> ExpResult<nd::Array1<C64>>
    where
        F: TestFunction,
        S: nd::Data<Elem = f64>,
    {
        check_times(t)?;
        let coeffs = self.berggren_coeffs(|s| s.eval(x) * s.cproduct(test))?;
        t.iter()
            .map(|&tj| {
                checked_sum(
                    coeffs.iter()
                        .map(|(En, uc)| uc * (-C64::i() * En * tj).exp())
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        functions::Gaussian,
        swp::SiegertSearch,
    };

    fn well() -> SquareWell { SquareWell::new(3.0, 10.0).unwrap() }

    fn packet() -> Gaussian { Gaussian::normalized(0.2, 0.2, 0.0).unwrap() }

    #[test]
    fn convergence_classes() {
        let conv: Vec<C64>
            = (1..=40).map(|n| C64::from(1.0 - 0.5_f64.powi(n))).collect();
        assert_eq!(Convergence::from_partial_sums(&conv, 1e-3), Convergence::Converged);
        let slow: Vec<C64>
            = (1..=40).map(|n| C64::from((n as f64).ln())).collect();
        assert_eq!(Convergence::from_partial_sums(&slow, 1e-3), Convergence::Slow);
        let div: Vec<C64>
            = (1..=40).map(|n| C64::from(3.0_f64.powi(n))).collect();
        assert_eq!(Convergence::from_partial_sums(&div, 1e-3), Convergence::Diverged);
        let nan = [C64::from(1.0), C64::new(f64::NAN, 0.0)];
        assert_eq!(Convergence::from_partial_sums(&nan, 1e-3), Convergence::Diverged);
    }

    #[test]
    fn propagator_at_time_zero() {
        let cases = [
            (C64::new(0.0, 2.0), StateKind::Bound),
            (C64::new(0.0, -1.0), StateKind::AntiBound),
            (C64::new(3.0, -0.5), StateKind::Resonant),
            (C64::new(0.5, -0.2), StateKind::Resonant),
            (C64::new(-3.0, -0.5), StateKind::AntiResonant),
        ];
        for (k, kind) in cases {
            assert!((siegert_propagator(k, 0.0, kind) - 0.5).norm() < 1e-12);
        }
    }

    #[test]
    fn pole_avoidance() {
        let pole = C64::new(2.0, 0.0);
        let z = avoid_pole(pole, pole);
        assert!(z.im > 0.0);
        let far = C64::new(1.0, 0.0);
        assert_eq!(avoid_pole(far, pole), far);
    }

    #[test]
    fn mle_matches_continuum_integral() {
        let search = SiegertSearch { re_kmax: 25.0, ..SiegertSearch::default() };
        let states = BasisSet::find_siegert_states(&well(), search).unwrap();
        let k: nd::Array1<f64> = nd::array![1.0, 2.5, 4.0];
        let mle = states.mle_strength_function(&packet(), &k).unwrap();
        let exact = exact_strength_function_otf(&well(), &packet(), &k).unwrap();
        for (m, e) in mle.iter().zip(&exact) {
            assert!((m - e).abs() < 1e-4 * e.abs(), "{m} vs {e}");
        }
        let rows = states.mle_strength_contributions(&packet(), &k).unwrap();
        assert_eq!(rows.nrows(), states.siegerts().len());
    }

    #[test]
    fn propagation_times_checked() {
        let states
            = BasisSet::find_siegert_states(&well(), SiegertSearch::default())
            .unwrap();
        for tj in [-0.1, f64::NAN, f64::INFINITY] {
            let t: nd::Array1<f64> = nd::array![0.0, tj];
            assert!(matches!(
                states.siegert_propagation(&packet(), 0.0, &t),
                Err(ExpError::BadTime(_)),
            ));
        }
        let t: nd::Array1<f64> = nd::array![0.5, -1.0];
        let k: nd::Array1<f64> = nd::Array1::linspace(0.0, 10.0, 101);
        assert!(matches!(
            states.mle_propagation(&packet(), 0.0, &t, &k),
            Err(ExpError::BadTime(t)) if t == -1.0,
        ));
        let cont
            = BasisSet::find_continuum_states(&well(), 2.0, 0.5, None, None)
            .unwrap();
        assert!(matches!(
            cont.exact_propagation(&packet(), 0.0, &t),
            Err(ExpError::BadTime(_)),
        ));
    }

    #[test]
    fn overflowing_sums_diverge() {
        // c-products of this packet overflow on every state
        let huge = Gaussian::new(0.2, 0.2, 0.0, f64::MAX).unwrap();
        let states
            = BasisSet::find_siegert_states(&well(), SiegertSearch::default())
            .unwrap();
        let t: nd::Array1<f64> = nd::array![0.0, 0.1];
        let k: nd::Array1<f64> = nd::array![1.0, 2.0, 3.0];
        let kgrid: nd::Array1<f64> = nd::Array1::linspace(0.0, 10.0, 101);
        assert!(matches!(
            states.siegert_propagation(&huge, 0.0, &t),
            Err(ExpError::Diverged { .. }),
        ));
        assert!(matches!(
            states.mle_strength_function(&huge, &k),
            Err(ExpError::Diverged { .. }),
        ));
        assert!(matches!(
            states.mle_propagation(&huge, 0.0, &t, &kgrid),
            Err(ExpError::Diverged { .. }),
        ));
        assert!(matches!(
            states.siegert_completeness(&huge, 0.3),
            Err(ExpError::Diverged { terms }) if terms == states.siegerts().len(),
        ));
        // the same basis with an ordinary packet is fine
        assert!(states.siegert_propagation(&packet(), 0.0, &t).is_ok());
    }

    #[test]
    fn checked_sums() {
        let geometric = (0..30).map(|n| C64::from(0.5_f64.powi(n)));
        assert!((checked_sum(geometric).unwrap() - 2.0).norm() < 1e-8);
        let growing = (0..30).map(|n| C64::new(0.0, 3.0_f64.powi(n)));
        assert!(matches!(checked_sum(growing), Err(ExpError::Diverged { terms: 30 })));
        assert_eq!(checked_sum(std::iter::empty::<C64>()).unwrap(), C64::from(0.0));
    }

    #[test]
    fn domain_checks() {
        let states
            = BasisSet::find_siegert_states(&well(), SiegertSearch::default())
            .unwrap();
        let wide = Gaussian::normalized(0.0, 1.0, 0.0).unwrap();
        let k: nd::Array1<f64> = nd::array![1.0, 2.0];
        assert!(matches!(
            states.mle_strength_function(&wide, &k),
            Err(ExpError::TestOutsidePotential(..)),
        ));
        assert!(matches!(
            states.siegert_completeness(&packet(), 2.0),
            Err(ExpError::OutsidePotential { .. }),
        ));
        let t: nd::Array1<f64> = nd::array![0.0];
        let bad_k: nd::Array1<f64> = nd::array![2.0, 1.0];
        assert!(matches!(
            states.mle_propagation(&packet(), 0.0, &t, &bad_k),
            Err(ExpError::BadGrid(_)),
        ));
        assert!(matches!(
            states.exact_strength_function(&packet()),
            Err(ExpError::NoStates("continuum")),
        ));
        let empty: BasisSet<SwState> = BasisSet::new();
        assert!(matches!(
            empty.siegert_propagation(&packet(), 0.0, &t),
            Err(ExpError::NoStates(_)),
        ));
    }
}
