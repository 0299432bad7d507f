//! Analytic Siegert and continuum states of the square well.
//!
//! For a well of depth `V0` on `|x| <= a`, the wavenumber inside is
//! `q = sqrt(k² + 2 V0)` and an eigenstate is `cos(qx)` (even) or `sin(qx)`
//! (odd) inside. Siegert states are those whose continuation outside is purely
//! outgoing, `e^{ik|x|}`, which leads to the conditions
//! ```text
//! even: q sin(qa) + i k cos(qa) = 0
//! odd:  cos(qa) - i k sin(qa) / q = 0
//! ```
//! Both are even in `q`, hence entire in `k` and free of branch cuts. Siegert
//! states are normalized to
//! ```text
//! ∫_{-a}^{a} u² dx + i (u(a)² + u(-a)²) / (2k) = 1
//! ```
//! Continuum states are taken at real `k > 0`, normalized to `δ(k - k')`.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    basisset::BasisSet,
    eigenstate::{ Eigenstate, Parity, StateKind },
    error::{ FindError, ParamError },
    functions::TestFunction,
    interp::{ self, Zero },
    potential::SquareWell,
    rootfind::{ self, secant },
    utils::integrate,
    DEF_EPSILON,
    DEF_MAXITERS,
};

pub type FindResult<T> = Result<T, FindError>;

// sampling of the imaginary axis is this much finer than the resonance grid
const AXIS_REFINE: f64 = 10.0;
// roots with |k| below this are the trivial k = 0 solutions
const K_ZERO: f64 = 1e-8;
// resonances must lie at least this far from the imaginary axis
const RE_K_MIN: f64 = 1e-6;
// relative separation below which two roots are the same
const ROOT_TOL: f64 = 1e-8;
// minimum number of quadrature points for products with test functions
const MIN_QUAD: usize = 801;

// sin(qL) / q, regular at q = 0
fn sinc(q: C64, l: f64) -> C64 {
    let z = q * l;
    if z.norm() < 1e-3 {
        let z2 = z * z;
        l * (1.0 - z2 / 6.0 + z2 * z2 / 120.0)
    } else {
        z.sin() / q
    }
}

fn inner_wavenumber(k: C64, v0: f64) -> C64 { (k * k + 2.0 * v0).sqrt() }

// odd number of quadrature points resolving oscillations at wavenumber `kmax`
// over an interval of length `len`
fn quad_points(len: f64, kmax: f64) -> usize {
    let n = (6.0 * len * kmax).ceil() as usize;
    n.max(MIN_QUAD) | 1
}

/// Evaluate the Siegert condition for a given parity in a well of half-width
/// `a` and depth `v0`.
pub fn siegert_condition(parity: Parity, k: C64, a: f64, v0: f64) -> C64 {
    let q = inner_wavenumber(k, v0);
    match parity {
        Parity::Even => q * (q * a).sin() + C64::i() * k * (q * a).cos(),
        Parity::Odd => (q * a).cos() - C64::i() * k * sinc(q, a),
    }
}

/// A Siegert state of the square well.
#[derive(Clone, Debug)]
pub struct SwSiegert {
    k: C64,
    q: C64,
    parity: Parity,
    kind: StateKind,
    a: f64,
    v0: f64,
    amp: C64,
    virial: f64,
}

impl SwSiegert {
    /// Construct the normalized state for a root `k` of the Siegert condition
    /// of the given parity.
    pub fn new(well: &SquareWell, k: C64, parity: Parity) -> Self {
        Self::build(well.half_width(), well.depth(), k, parity)
    }

    fn build(a: f64, v0: f64, k: C64, parity: Parity) -> Self {
        let q = inner_wavenumber(k, v0);
        let (c, s) = ((q * a).cos(), (q * a).sin());
        let half_sin2 = sinc(q, 2.0 * a) / 2.0;
        let norm
            = match parity {
                Parity::Even => a + half_sin2 + C64::i() * c * c / k,
                Parity::Odd => a - half_sin2 + C64::i() * s * s / k,
            };
        let amp = norm.sqrt().inv();
        let kind = StateKind::from_wavenumber(k, 0.0);
        let virial = siegert_condition(parity, k, a, v0).norm();
        Self { k, q, parity, kind, a, v0, amp, virial }
    }

    /// Wavenumber inside the well.
    pub fn q(&self) -> C64 { self.q }

    /// Normalization amplitude of the interior solution.
    pub fn amplitude(&self) -> C64 { self.amp }

    /// Half-width of the well this state belongs to.
    pub fn half_width(&self) -> f64 { self.a }

    /// The mirror state at `-conj(k)`.
    pub fn partner(&self) -> Self {
        Self::build(self.a, self.v0, -self.k.conj(), self.parity)
    }

    fn integrate_region<F>(&self, f: F) -> C64
    where F: FnMut(f64) -> C64
    {
        let n = quad_points(2.0 * self.a, self.q.norm() + self.k.norm());
        integrate(f, -self.a, self.a, n)
    }
}

impl Eigenstate for SwSiegert {
    fn wavenumber(&self) -> C64 { self.k }

    fn kind(&self) -> StateKind { self.kind }

    fn parity(&self) -> Option<Parity> { Some(self.parity) }

    fn virial(&self) -> f64 { self.virial }

    fn eval(&self, x: f64) -> C64 {
        let a = self.a;
        if x.abs() <= a {
            match self.parity {
                Parity::Even => self.amp * (self.q * x).cos(),
                Parity::Odd => self.amp * (self.q * x).sin(),
            }
        } else {
            let out = (C64::i() * self.k * (x.abs() - a)).exp();
            match self.parity {
                Parity::Even => self.amp * (self.q * a).cos() * out,
                Parity::Odd => x.signum() * self.amp * (self.q * a).sin() * out,
            }
        }
    }

    /// c-product over the well region `[-a, a]`.
    fn cproduct<F: TestFunction>(&self, f: &F) -> C64 {
        self.integrate_region(|x| self.eval(x) * f.eval_real(x))
    }

    /// Hermitian product over the well region `[-a, a]`.
    fn braket<F: TestFunction>(&self, f: &F) -> C64 {
        self.integrate_region(|x| self.eval(x).conj() * f.eval_real(x))
    }
}

/// A continuum state of the square well at real `k > 0`.
///
/// Outside the well the state is `cos(k|x| + δ) / √π` (even) or
/// `sign(x) sin(k|x| + δ) / √π` (odd).
#[derive(Clone, Debug)]
pub struct SwContinuum {
    k: f64,
    q: C64,
    parity: Parity,
    a: f64,
    amp: f64,
    // phase of the exterior solution at x = a, i.e. ka + δ
    phase: f64,
}

impl SwContinuum {
    pub fn new(well: &SquareWell, k: f64, parity: Parity)
        -> Result<Self, ParamError>
    {
        ParamError::check_positive("k", k)?;
        let a = well.half_width();
        let q = inner_wavenumber(C64::from(k), well.depth());
        let c = (q * a).cos().re;
        let s = sinc(q, a).re;
        let q2 = (q * q).re;
        let (amp, phase)
            = match parity {
                Parity::Even => {
                    let t = q2 * s / k;
                    ((PI * (c * c + t * t)).sqrt().recip(), t.atan2(c))
                },
                Parity::Odd => {
                    let t = c / k;
                    ((PI * (s * s + t * t)).sqrt().recip(), s.atan2(t))
                },
            };
        Ok(Self { k, q, parity, a, amp, phase })
    }

    /// Phase shift `δ`.
    pub fn phase_shift(&self) -> f64 { self.phase - self.k * self.a }

    /// Normalization amplitude of the interior solution.
    pub fn amplitude(&self) -> f64 { self.amp }

    fn eval_real(&self, x: f64) -> f64 {
        let a = self.a;
        if x.abs() <= a {
            match self.parity {
                Parity::Even => self.amp * (self.q * x).cos().re,
                Parity::Odd => self.amp * sinc(self.q, x).re,
            }
        } else {
            let arg = self.k * (x.abs() - a) + self.phase;
            match self.parity {
                Parity::Even => arg.cos() / PI.sqrt(),
                Parity::Odd => x.signum() * arg.sin() / PI.sqrt(),
            }
        }
    }
}

impl Eigenstate for SwContinuum {
    fn wavenumber(&self) -> C64 { C64::from(self.k) }

    fn kind(&self) -> StateKind { StateKind::Continuum }

    fn parity(&self) -> Option<Parity> { Some(self.parity) }

    fn virial(&self) -> f64 { 0.0 }

    fn eval(&self, x: f64) -> C64 { C64::from(self.eval_real(x)) }

    /// c-product over the support of `f`.
    fn cproduct<F: TestFunction>(&self, f: &F) -> C64 {
        let (lo, hi) = f.support();
        let n = quad_points(hi - lo, self.k + self.q.norm());
        integrate(|x| self.eval_real(x) * f.eval_real(x), lo, hi, n)
    }

    /// Equal to the c-product since continuum states are real.
    fn braket<F: TestFunction>(&self, f: &F) -> C64 { self.cproduct(f) }
}

/// An analytic eigenstate of the square well.
#[derive(Clone, Debug)]
pub enum SwState {
    Siegert(SwSiegert),
    Continuum(SwContinuum),
}

impl SwState {
    /// Half-width of the well this state belongs to.
    pub fn half_width(&self) -> f64 {
        match self {
            Self::Siegert(s) => s.a,
            Self::Continuum(c) => c.a,
        }
    }

    pub fn is_continuum(&self) -> bool { matches!(self, Self::Continuum(_)) }
}

impl From<SwSiegert> for SwState {
    fn from(s: SwSiegert) -> Self { Self::Siegert(s) }
}

impl From<SwContinuum> for SwState {
    fn from(c: SwContinuum) -> Self { Self::Continuum(c) }
}

impl Eigenstate for SwState {
    fn wavenumber(&self) -> C64 {
        match self {
            Self::Siegert(s) => s.wavenumber(),
            Self::Continuum(c) => c.wavenumber(),
        }
    }

    fn kind(&self) -> StateKind {
        match self {
            Self::Siegert(s) => s.kind(),
            Self::Continuum(c) => c.kind(),
        }
    }

    fn parity(&self) -> Option<Parity> {
        match self {
            Self::Siegert(s) => s.parity(),
            Self::Continuum(c) => c.parity(),
        }
    }

    fn virial(&self) -> f64 {
        match self {
            Self::Siegert(s) => s.virial(),
            Self::Continuum(c) => c.virial(),
        }
    }

    fn eval(&self, x: f64) -> C64 {
        match self {
            Self::Siegert(s) => s.eval(x),
            Self::Continuum(c) => c.eval(x),
        }
    }

    fn cproduct<F: TestFunction>(&self, f: &F) -> C64 {
        match self {
            Self::Siegert(s) => s.cproduct(f),
            Self::Continuum(c) => c.cproduct(f),
        }
    }

    fn braket<F: TestFunction>(&self, f: &F) -> C64 {
        match self {
            Self::Siegert(s) => s.braket(f),
            Self::Continuum(c) => c.braket(f),
        }
    }
}

/// Search window and solver settings for
/// [`BasisSet::find_siegert_states`].
///
/// Resonances are sought from a grid of starting points with `0 < Re k <=
/// re_kmax` (step `re_hk`) and `-im_kmax <= Im k <= 0` (step `im_hk`);
/// bound and antibound states are bracketed on the imaginary axis between
/// `-im_kmax` and the bottom of the well.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SiegertSearch {
    pub re_kmax: f64,
    pub re_hk: f64,
    pub im_kmax: f64,
    pub im_hk: f64,
    pub epsilon: f64,
    pub maxiters: usize,
}

impl Default for SiegertSearch {
    fn default() -> Self {
        Self {
            re_kmax: 20.0,
            re_hk: 0.5,
            im_kmax: 5.0,
            im_hk: 0.5,
            epsilon: DEF_EPSILON,
            maxiters: DEF_MAXITERS,
        }
    }
}

impl SiegertSearch {
    fn check(&self) -> Result<(), ParamError> {
        ParamError::check_positive("re_kmax", self.re_kmax)?;
        ParamError::check_positive("re_hk", self.re_hk)?;
        ParamError::check_positive("im_kmax", self.im_kmax)?;
        ParamError::check_positive("im_hk", self.im_hk)?;
        Ok(())
    }
}

// bound and antibound roots of one parity on the imaginary axis
fn axis_roots(
    well: &SquareWell,
    parity: Parity,
    search: &SiegertSearch,
) -> FindResult<Vec<C64>>
{
    let a = well.half_width();
    let v0 = well.depth();
    let kappa_max = (2.0 * v0).max(0.0).sqrt() + search.im_hk;
    let hk = search.im_hk / AXIS_REFINE;
    let n = (((kappa_max + search.im_kmax) / hk).ceil() as usize + 1).max(5);
    let kappa: nd::Array1<f64>
        = nd::Array1::linspace(-search.im_kmax, kappa_max, n);
    // the condition is real on the imaginary axis
    let vals: nd::Array1<f64>
        = kappa.mapv(|kk| siegert_condition(parity, C64::new(0.0, kk), a, v0).re);
    let brackets = interp::crossings(&kappa, &vals, Zero::All)?;
    let f = |k: C64| siegert_condition(parity, k, a, v0);
    let roots: Vec<C64>
        = brackets.into_iter()
        .filter(|br| br.estimate.is_finite())
        .filter_map(|br| {
            let k0 = C64::new(0.0, br.estimate);
            let k1 = C64::new(0.0, br.estimate + 1e-3 * hk);
            match secant(f, k0, k1, search.epsilon, search.maxiters) {
                Ok(k) => Some(C64::new(0.0, k.im)),
                Err(err) => {
                    log::warn!(
                        "swp::find_siegert_states: dropped axis root near \
                        {k0} ({parity}): {err}"
                    );
                    None
                },
            }
        })
        .filter(|k| {
            k.norm() > K_ZERO
                && k.im >= -search.im_kmax
                && k.im <= kappa_max
        })
        .collect();
    Ok(rootfind::dedup_roots(roots, ROOT_TOL))
}

// fourth-quadrant roots of one parity
fn resonance_roots(
    well: &SquareWell,
    parity: Parity,
    search: &SiegertSearch,
) -> Vec<C64>
{
    let a = well.half_width();
    let l = well.width();
    let v0 = well.depth();
    let f = |k: C64| siegert_condition(parity, k, a, v0);

    let n_re = (search.re_kmax / search.re_hk).floor() as usize;
    let n_im = (search.im_kmax / search.im_hk).floor() as usize;
    let mut guesses: Vec<C64>
        = (1..=n_re)
        .flat_map(|i| {
            (0..=n_im).map(move |j| {
                C64::new(i as f64 * search.re_hk, -(j as f64) * search.im_hk)
            })
        })
        .collect();
    // large-k asymptotics of the roots
    let mut m: usize = 1;
    loop {
        let km = PI * m as f64 / l;
        if km > search.re_kmax + search.re_hk { break; }
        let log_arg = (2.0 * km * km / v0.abs().max(f64::MIN_POSITIVE)).max(1.0);
        guesses.push(C64::new(km, -log_arg.ln() / l));
        m += 1;
    }

    let roots: Vec<C64>
        = guesses.into_iter()
        .filter_map(|k0| {
            rootfind::secant_from(f, k0, search.epsilon, search.maxiters).ok()
        })
        .filter(|k| {
            k.re > RE_K_MIN
                && k.re <= search.re_kmax
                && k.im < 0.0
                && k.im >= -search.im_kmax
        })
        .filter(|k| {
            // reject false convergence where the condition is merely flat
            let scale
                = (1.0 + k.norm() + inner_wavenumber(*k, v0).norm())
                * (inner_wavenumber(*k, v0).im.abs() * a).exp();
            f(*k).norm() <= search.epsilon.sqrt() * scale
        })
        .collect();
    rootfind::dedup_roots(roots, ROOT_TOL)
}

impl BasisSet<SwState> {
    /// Find all Siegert states of a square well inside the search window.
    ///
    /// Bound and antibound states are bracketed on the imaginary axis and
    /// polished by secant iteration; resonances are found by secant iteration
    /// from a grid of starting points and paired with their antiresonant
    /// partners at `-conj(k)`. The result is sorted by wavenumber.
    pub fn find_siegert_states(well: &SquareWell, search: SiegertSearch)
        -> FindResult<Self>
    {
        search.check()?;
        let mut states = Self::new();
        for parity in [Parity::Even, Parity::Odd] {
            let axis = axis_roots(well, parity, &search)?;
            let res = resonance_roots(well, parity, &search);
            log::debug!(
                "swp::find_siegert_states: {} axis and {} resonant roots \
                ({parity})",
                axis.len(),
                res.len(),
            );
            axis.into_iter()
                .for_each(|k| { states.insert(SwSiegert::new(well, k, parity).into()); });
            res.into_iter()
                .for_each(|k| {
                    let s = SwSiegert::new(well, k, parity);
                    let p = s.partner();
                    states.insert(s.into());
                    states.insert(p.into());
                });
        }
        states.sort_by_wavenumber();
        Ok(states)
    }

    /// Construct continuum states at `k = kmin, kmin + hk, ..., <= kmax` for
    /// one or both parities.
    ///
    /// `kmin` defaults to `hk` and must not exceed `kmax`.
    pub fn find_continuum_states(
        well: &SquareWell,
        kmax: f64,
        hk: f64,
        kmin: Option<f64>,
        parity: Option<Parity>,
    ) -> FindResult<Self>
    {
        ParamError::check_positive("kmax", kmax)?;
        ParamError::check_positive("hk", hk)?;
        let kmin = kmin.unwrap_or(hk);
        ParamError::check_positive("kmin", kmin)?;
        ParamError::check_range("k", kmin, kmax)?;
        let parities: Vec<Parity>
            = match parity {
                Some(p) => vec![p],
                None => vec![Parity::Even, Parity::Odd],
            };
        let n = ((kmax - kmin) / hk + 1e-9).floor() as usize + 1;
        let mut states = Self::new();
        for i in 0..n {
            let k = kmin + i as f64 * hk;
            for &p in parities.iter() {
                states.insert(SwContinuum::new(well, k, p)?.into());
            }
        }
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well() -> SquareWell { SquareWell::new(3.0, 10.0).unwrap() }

    #[test]
    fn conditions_are_even_in_q() {
        // flipping the branch of q must not change the conditions
        let (a, v0) = (1.5, 10.0);
        let k = C64::new(2.3, -0.7);
        let q = inner_wavenumber(k, v0);
        let fe = -q * (-q * a).sin() + C64::i() * k * (-q * a).cos();
        assert!((fe - siegert_condition(Parity::Even, k, a, v0)).norm() < 1e-12);
        let fo = (-q * a).cos() - C64::i() * k * sinc(-q, a);
        assert!((fo - siegert_condition(Parity::Odd, k, a, v0)).norm() < 1e-12);
    }

    #[test]
    fn bound_states_match_transcendental_equation() {
        let states
            = BasisSet::find_siegert_states(&well(), SiegertSearch::default())
            .unwrap();
        let bounds = states.bounds();
        assert_eq!(bounds.len(), 5);
        let expected = [
            1.050_849_518_347_389_6,
            2.690_866_073_266_026,
            3.559_052_566_627_751,
            4.086_967_432_599_962,
            4.378_466_605_155_324,
        ];
        for (s, kappa) in bounds.iter().zip(expected) {
            assert!((s.wavenumber().im - kappa).abs() < 1e-8);
            assert!(s.virial() < 1e-8);
        }
        assert_eq!(bounds.even().len(), 3);
        assert_eq!(states.antibounds().len(), 3);
    }

    #[test]
    fn resonances_come_in_pairs() {
        let states
            = BasisSet::find_siegert_states(&well(), SiegertSearch::default())
            .unwrap();
        let res = states.resonants();
        let anti = states.antiresonants();
        assert_eq!(res.len(), anti.len());
        assert!(res.len() > 10);
        for s in res.iter() {
            let k = s.wavenumber();
            assert!(anti.iter().any(|t| (t.wavenumber() + k.conj()).norm() < 1e-10));
        }
        // lowest resonance is odd
        let first = res.iter().next().unwrap();
        assert_eq!(first.parity(), Some(Parity::Odd));
        assert!((first.wavenumber() - C64::new(2.614_142_213_060_493, -0.735_095_781_184_213_5)).norm() < 1e-7);
    }

    #[test]
    fn siegert_normalization() {
        let w = well();
        let k = C64::new(4.327_307_442_446_861, -0.824_989_843_470_263_3);
        let s = SwSiegert::new(&w, k, Parity::Even);
        let a = w.half_width();
        let inner = integrate(|x| s.eval(x) * s.eval(x), -a, a, 4001);
        let surf = C64::i() * (s.eval(a).powi(2) + s.eval(-a).powi(2)) / (2.0 * k);
        assert!((inner + surf - 1.0).norm() < 1e-9);
        // continuity at the edge
        assert!((s.eval(a) - s.eval(a + 1e-12)).norm() < 1e-9);
    }

    #[test]
    fn continuum_state_free_limit() {
        let free = SquareWell::new(2.0, 0.0).unwrap();
        let c = SwContinuum::new(&free, 1.7, Parity::Even).unwrap();
        assert!(c.phase_shift().abs() < 1e-12);
        assert!((c.amplitude() - PI.sqrt().recip()).abs() < 1e-12);
        let o = SwContinuum::new(&free, 1.7, Parity::Odd).unwrap();
        assert!((o.eval(0.4).re - (1.7_f64 * 0.4).sin() / PI.sqrt()).abs() < 1e-12);
        assert!((o.eval(-3.0).re + (1.7_f64 * 3.0).sin() / PI.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn continuum_grid() {
        let states
            = BasisSet::find_continuum_states(&well(), 2.0, 0.5, None, None)
            .unwrap();
        assert_eq!(states.len(), 8);
        let odd
            = BasisSet::find_continuum_states(&well(), 2.0, 0.5, Some(1.0), Some(Parity::Odd))
            .unwrap();
        assert_eq!(odd.len(), 3);
        assert!(BasisSet::find_continuum_states(&well(), 2.0, 0.0, None, None).is_err());
        // a single state exactly at kmax, none above it
        let edge
            = BasisSet::find_continuum_states(&well(), 2.0, 0.5, Some(2.0), Some(Parity::Even))
            .unwrap();
        assert_eq!(edge.len(), 1);
        assert!(matches!(
            BasisSet::find_continuum_states(&well(), 2.0, 0.5, Some(2.5), None),
            Err(FindError::Param(ParamError::BadRange(..))),
        ));
    }
}
