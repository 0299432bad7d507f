//! Complex-scaled Hamiltonian on a uniform grid.
//!
//! Under the map `z = F(x)` with Jacobian `g(x) = F'(x)`, the kinetic energy
//! operator becomes `-½ g⁻¹ d/dx g⁻¹ d/dx`. In terms of `w = √g u` this is the
//! complex-symmetric operator
//! ```text
//! A = G^{-1/2} (½ Dᵀ G_½⁻¹ D) G^{-1/2} + V(F(x))
//! ```
//! where `D` is a staggered first-derivative stencil mapping grid nodes to
//! half-integer points, `G = diag(g(x_j))`, and `G_½ = diag(g(x_{j+½}))`. The
//! wavefunction vanishes outside the grid.
//!
//! Eigenvectors are c-normalized, `Σ w_j² h = 1`, and classified by their
//! virial `|∂E/∂θ|`: eigenvalues of true Siegert states do not move with the
//! scaling angle while those of the rotated continuum do.

use std::sync::Arc;
use ndarray as nd;
use ndarray_linalg::Eig;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    basisset::BasisSet,
    coordmap::CoordMap,
    eigenstate::{ Eigenstate, Parity, StateKind, wavenumber_from_energy },
    error::HError,
    functions::TestFunction,
    potential::Potential,
    utils::count_finite,
};

pub type HResult<T> = Result<T, HError>;

// step in θ for the virial
const DTHETA: f64 = 1e-4;
// tolerance on the mirror overlap for parity assignment
const PARITY_TOL: f64 = 0.1;

/// A uniform grid of `n` points on `[xmin, xmax]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    xmin: f64,
    xmax: f64,
    n: usize,
}

impl Grid {
    pub fn new(xmin: f64, xmax: f64, n: usize) -> HResult<Self> {
        (n >= 5).then_some(()).ok_or(HError::TooFewPoints(n))?;
        (xmin < xmax).then_some(()).ok_or(HError::BadBounds(xmin, xmax))?;
        Ok(Self { xmin, xmax, n })
    }

    /// Grid symmetric about the origin.
    pub fn symmetric(xmax: f64, n: usize) -> HResult<Self> {
        Self::new(-xmax, xmax, n)
    }

    pub fn len(&self) -> usize { self.n }

    pub fn is_empty(&self) -> bool { self.n == 0 }

    pub fn bounds(&self) -> (f64, f64) { (self.xmin, self.xmax) }

    /// Grid spacing.
    pub fn dx(&self) -> f64 { (self.xmax - self.xmin) / (self.n - 1) as f64 }

    pub fn x(&self) -> nd::Array1<f64> {
        nd::Array1::linspace(self.xmin, self.xmax, self.n)
    }

    /// Return `true` if the grid points are symmetric about the origin.
    pub fn is_symmetric(&self) -> bool {
        (self.xmin + self.xmax).abs() <= 1e-12 * (self.xmax - self.xmin)
    }
}

/// Staggered first-derivative stencils.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Stencil {
    /// `(w_{j+1} - w_j) / h`
    Second,
    /// `(w_{j-1} - 27 w_j + 27 w_{j+1} - w_{j+2}) / 24h`
    #[default]
    Fourth,
}

impl Stencil {
    // (node offset from j, weight) for the derivative at j + ½, and the common
    // denominator in units of h
    fn weights(self) -> (&'static [(isize, f64)], f64) {
        match self {
            Self::Second => (&[(0, -1.0), (1, 1.0)], 1.0),
            Self::Fourth => (&[(-1, 1.0), (0, -27.0), (1, 27.0), (2, -1.0)], 24.0),
        }
    }

    /// Number of nonzero off-diagonals on either side of the main diagonal in
    /// the kinetic energy matrix.
    pub fn bandwidth(self) -> usize {
        match self {
            Self::Second => 1,
            Self::Fourth => 3,
        }
    }
}

/// Grid quantities shared by all eigenstates of one diagonalization.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Real grid coordinates.
    pub x: nd::Array1<f64>,
    /// Mapped coordinates `F(x)`.
    pub z: nd::Array1<C64>,
    /// Jacobian `F'(x)`.
    pub g: nd::Array1<C64>,
    /// Grid spacing.
    pub dx: f64,
}

// grid quantities at a fixed scaling angle
struct Scaled {
    sqrt_g: nd::Array1<C64>,
    gh: nd::Array1<C64>,
    V: nd::Array1<C64>,
}

/// A complex-scaled Hamiltonian `-½ d²/dz² + V(z)`.
#[derive(Clone, Debug)]
pub struct Hamiltonian<P, M> {
    potential: P,
    map: M,
    grid: Grid,
    stencil: Stencil,
}

impl<P, M> Hamiltonian<P, M>
where
    P: Potential,
    M: CoordMap,
{
    pub fn new(potential: P, map: M, grid: Grid, stencil: Stencil) -> Self {
        Self { potential, map, grid, stencil }
    }

    pub fn potential(&self) -> &P { &self.potential }

    pub fn map(&self) -> &M { &self.map }

    pub fn grid(&self) -> &Grid { &self.grid }

    pub fn stencil(&self) -> Stencil { self.stencil }

    fn contour(&self, map: &M) -> Contour {
        let x = self.grid.x();
        let z = x.mapv(|xj| map.map(xj));
        let g = x.mapv(|xj| map.jacobian(xj));
        Contour { x, z, g, dx: self.grid.dx() }
    }

    fn scaled(&self, map: &M) -> Scaled {
        let h = self.grid.dx();
        let contour = self.contour(map);
        // half points j + ½ for j = -1..n-1
        let gh: nd::Array1<C64>
            = (0..=self.grid.n)
            .map(|m| map.jacobian(self.grid.xmin + (m as f64 - 0.5) * h))
            .collect();
        let sqrt_g = contour.g.mapv(|gj| gj.sqrt());
        let V = contour.z.mapv(|zj| self.potential.eval_cell(zj, h));
        Scaled { sqrt_g, gh, V }
    }

    // nonzero stencil entries (node, weight) for the derivative at half point
    // m - ½, which sits between nodes m - 1 and m
    fn stencil_row(&self, m: usize) -> impl Iterator<Item = (usize, f64)> {
        let n = self.grid.n as isize;
        let h = self.grid.dx();
        let (weights, den) = self.stencil.weights();
        weights.iter()
            .filter_map(move |(off, w)| {
                let node = m as isize - 1 + off;
                (0..n).contains(&node).then_some((node as usize, w / (den * h)))
            })
    }

    fn matrix_scaled(&self, sc: &Scaled) -> nd::Array2<C64> {
        let n = self.grid.n;
        let mut A: nd::Array2<C64> = nd::Array2::zeros((n, n));
        for (m, ghm) in sc.gh.iter().enumerate() {
            for (p, cp) in self.stencil_row(m) {
                for (q, cq) in self.stencil_row(m) {
                    A[[p, q]] += 0.5 * cp * cq / *ghm;
                }
            }
        }
        nd::Zip::indexed(&mut A)
            .for_each(|(p, q), Apq| {
                *Apq /= sc.sqrt_g[p] * sc.sqrt_g[q];
                if p == q { *Apq += sc.V[p]; }
            });
        A
    }

    fn apply_scaled<S>(&self, sc: &Scaled, w: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        let y: nd::Array1<C64>
            = nd::Zip::from(w).and(&sc.sqrt_g).map_collect(|wj, sj| wj / sj);
        let mut res: nd::Array1<C64> = nd::Array1::zeros(self.grid.n);
        for (m, ghm) in sc.gh.iter().enumerate() {
            let d: C64
                = self.stencil_row(m)
                .map(|(p, cp)| cp * y[p])
                .sum::<C64>() / *ghm;
            self.stencil_row(m).for_each(|(p, cp)| { res[p] += 0.5 * cp * d; });
        }
        nd::Zip::from(&mut res).and(&sc.sqrt_g).and(&sc.V).and(w)
            .for_each(|rj, sj, Vj, wj| { *rj = *rj / sj + Vj * wj; });
        res
    }

    // central difference of wᵀ A w in θ
    fn virial_scaled<S>(&self, plus: &Scaled, minus: &Scaled, w: &Arr1<S>) -> f64
    where S: nd::Data<Elem = C64>
    {
        let ap = self.apply_scaled(plus, w);
        let am = self.apply_scaled(minus, w);
        let dE: C64
            = w.iter().zip(ap.iter().zip(&am))
            .map(|(wj, (pj, mj))| wj * (pj - mj))
            .sum::<C64>() * self.grid.dx() / (2.0 * DTHETA);
        dE.norm()
    }

    fn scaled_pair(&self) -> (Scaled, Scaled) {
        let theta = self.map.theta();
        (
            self.scaled(&self.map.with_theta(theta + DTHETA)),
            self.scaled(&self.map.with_theta(theta - DTHETA)),
        )
    }

    /// Dense matrix representation.
    pub fn matrix(&self) -> nd::Array2<C64> {
        self.matrix_scaled(&self.scaled(&self.map))
    }

    /// Apply the Hamiltonian to a vector without forming the matrix.
    ///
    /// *Panics if `w` does not have the same length as the grid*.
    pub fn apply<S>(&self, w: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        self.apply_scaled(&self.scaled(&self.map), w)
    }

    /// Like [`Self::apply`], but with the scaling angle replaced by `theta`.
    pub fn apply_at<S>(&self, theta: f64, w: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        self.apply_scaled(&self.scaled(&self.map.with_theta(theta)), w)
    }

    /// `|∂E/∂θ|` for a c-normalized eigenvector `w`.
    pub fn virial<S>(&self, w: &Arr1<S>) -> f64
    where S: nd::Data<Elem = C64>
    {
        let (plus, minus) = self.scaled_pair();
        self.virial_scaled(&plus, &minus, w)
    }

    fn detect_parity<S>(&self, w: &Arr1<S>) -> Option<Parity>
    where S: nd::Data<Elem = C64>
    {
        if !(self.grid.is_symmetric() && self.potential.is_symmetric()) {
            return None;
        }
        let num: C64 = w.iter().zip(w.iter().rev()).map(|(a, b)| a * b).sum();
        let den: C64 = w.iter().map(|a| a * a).sum();
        let p = num / den;
        if (p - 1.0).norm() < PARITY_TOL {
            Some(Parity::Even)
        } else if (p + 1.0).norm() < PARITY_TOL {
            Some(Parity::Odd)
        } else {
            None
        }
    }

    /// Diagonalize the Hamiltonian and classify all eigenstates against the
    /// virial threshold `max_virial` (see [`StateKind::from_energy`]).
    pub fn solve(&self, max_virial: f64) -> HResult<BasisSet<GridState>> {
        HError::check_max_virial(max_virial)?;
        let A = self.matrix();
        let (vals, vecs): (nd::Array1<C64>, nd::Array2<C64>) = A.eig()?;
        let nfinite = count_finite(vals.iter());
        if nfinite < vals.len() {
            log::warn!(
                "hamiltonian::solve: dropping {} non-finite eigenvalues",
                vals.len() - nfinite,
            );
        }
        let contour = Arc::new(self.contour(&self.map));
        let (plus, minus) = self.scaled_pair();
        let h = self.grid.dx();
        let states: Vec<GridState>
            = vals.iter().zip(vecs.columns())
            .filter(|(E, _)| E.re.is_finite() && E.im.is_finite())
            .filter_map(|(&E, v)| {
                let norm: C64 = v.iter().map(|vj| vj * vj).sum::<C64>() * h;
                if norm.norm() < f64::EPSILON {
                    log::warn!(
                        "hamiltonian::solve: dropping self-orthogonal \
                        eigenvector at E = {E}"
                    );
                    return None;
                }
                let w: nd::Array1<C64> = v.mapv(|vj| vj / norm.sqrt());
                let virial = self.virial_scaled(&plus, &minus, &w);
                let kind = StateKind::from_energy(E, virial, max_virial);
                let parity = self.detect_parity(&w);
                Some(GridState::new(E, kind, parity, virial, w, Arc::clone(&contour)))
            })
            .collect();
        // every eigenpair is kept, however close in energy
        let mut states = BasisSet::from_vec(states);
        log::debug!(
            "hamiltonian::solve: {} states, {} bound, {} resonant",
            states.len(),
            states.iter().filter(|s| s.kind() == StateKind::Bound).count(),
            states.iter().filter(|s| s.kind() == StateKind::Resonant).count(),
        );
        states.sort_by_wavenumber();
        Ok(states)
    }
}

/// An eigenstate of a complex-scaled [`Hamiltonian`].
#[derive(Clone, Debug)]
pub struct GridState {
    E: C64,
    k: C64,
    kind: StateKind,
    parity: Option<Parity>,
    virial: f64,
    w: nd::Array1<C64>,
    contour: Arc<Contour>,
}

impl GridState {
    fn new(
        E: C64,
        kind: StateKind,
        parity: Option<Parity>,
        virial: f64,
        w: nd::Array1<C64>,
        contour: Arc<Contour>,
    ) -> Self
    {
        let k0 = wavenumber_from_energy(E);
        let k = if kind == StateKind::AntiResonant { -k0 } else { k0 };
        Self { E, k, kind, parity, virial, w, contour }
    }

    /// The c-normalized vector `w = √g u`.
    pub fn vector(&self) -> &nd::Array1<C64> { &self.w }

    /// The wavefunction `u` at the grid points.
    pub fn wavefunction(&self) -> nd::Array1<C64> {
        nd::Zip::from(&self.w).and(&self.contour.g)
            .map_collect(|wj, gj| wj / gj.sqrt())
    }

    pub fn contour(&self) -> &Contour { &self.contour }

    // Σ_j w_j √g_j f(F(x_j)) h, optionally conjugating the state
    fn product<F: TestFunction>(&self, f: &F, conj: bool) -> C64 {
        let c = &self.contour;
        nd::Zip::from(&self.w).and(&c.g).and(&c.z)
            .fold(C64::from(0.0), |acc, wj, gj, zj| {
                let uj = wj / gj.sqrt();
                let uj = if conj { uj.conj() } else { uj };
                acc + uj * gj * f.eval(*zj)
            }) * c.dx
    }
}

impl Eigenstate for GridState {
    fn wavenumber(&self) -> C64 { self.k }

    fn energy(&self) -> C64 { self.E }

    fn kind(&self) -> StateKind { self.kind }

    fn parity(&self) -> Option<Parity> { self.parity }

    fn virial(&self) -> f64 { self.virial }

    /// Linear interpolation of the wavefunction; zero outside the grid.
    fn eval(&self, x: f64) -> C64 {
        let c = &self.contour;
        let n = c.x.len();
        let (x0, x1) = (c.x[0], c.x[n - 1]);
        if !(x0..=x1).contains(&x) { return C64::from(0.0); }
        let t = (x - x0) / c.dx;
        let j = (t.floor() as usize).min(n - 2);
        let s = t - j as f64;
        let uj = self.w[j] / c.g[j].sqrt();
        let ujp1 = self.w[j + 1] / c.g[j + 1].sqrt();
        uj * (1.0 - s) + ujp1 * s
    }

    /// c-product along the scaled contour, `∫ u(z) f(z) dz`.
    fn cproduct<F: TestFunction>(&self, f: &F) -> C64 { self.product(f, false) }

    /// Hermitian product along the scaled contour, `∫ u*(z) f(z) dz`.
    fn braket<F: TestFunction>(&self, f: &F) -> C64 { self.product(f, true) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coordmap::{ ErfMap, Uniform },
        potential::FnPotential,
        DEF_MAX_VIRIAL,
    };

    #[test]
    fn grid_checks() {
        assert!(matches!(Grid::new(0.0, 1.0, 4), Err(HError::TooFewPoints(4))));
        assert!(matches!(Grid::new(1.0, 1.0, 10), Err(HError::BadBounds(..))));
        let g = Grid::symmetric(5.0, 101).unwrap();
        assert!(g.is_symmetric());
        assert!((g.dx() - 0.1).abs() < 1e-15);
    }

    #[test]
    fn banded_apply_matches_matrix() {
        let pot = FnPotential::new(|z: C64| 0.5 * z * z).symmetric();
        let map = ErfMap::new(0.3, 2.0, 1.5).unwrap();
        for stencil in [Stencil::Second, Stencil::Fourth] {
            let ham = Hamiltonian::new(&pot, map, Grid::symmetric(6.0, 61).unwrap(), stencil);
            let w: nd::Array1<C64>
                = (0..61).map(|j| C64::new((j as f64).sin(), 0.1 * j as f64)).collect();
            let dense = ham.matrix().dot(&w);
            let banded = ham.apply(&w);
            assert!(dense.iter().zip(&banded).all(|(a, b)| (a - b).norm() < 1e-10));
            // complex symmetric
            let A = ham.matrix();
            assert!(A.iter().zip(A.t().iter()).all(|(a, b)| (a - b).norm() < 1e-12));
            let bw = stencil.bandwidth();
            assert!(
                A.indexed_iter()
                    .all(|((p, q), a)| p.abs_diff(q) <= bw || *a == C64::from(0.0))
            );
        }
    }

    #[test]
    fn harmonic_oscillator_levels() {
        // unscaled grid: real spectrum n + ½
        let pot = FnPotential::new(|z: C64| 0.5 * z * z).symmetric();
        let ham = Hamiltonian::new(
            pot, Uniform::identity(), Grid::symmetric(8.0, 201).unwrap(), Stencil::Fourth);
        let states = ham.solve(1e-6).unwrap();
        let mut e: Vec<f64> = states.energies().iter().map(|E| E.re).collect();
        e.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (n, en) in e.iter().take(4).enumerate() {
            assert!((en - (n as f64 + 0.5)).abs() < 1e-4, "level {n}: {en}");
        }
        let ground
            = states.iter()
            .min_by(|a, b| a.energy().re.partial_cmp(&b.energy().re).unwrap())
            .unwrap();
        assert_eq!(ground.parity(), Some(Parity::Even));
    }

    #[test]
    fn near_degenerate_doublet_kept() {
        // deep double well with no declared symmetry on an off-center grid:
        // the ground doublet is split by ~6e-11 and no parities are assigned
        let pot = FnPotential::new(|z: C64| 0.3 * (z * z - 9.0).powi(2));
        let n = 181;
        let ham = Hamiltonian::new(
            pot, Uniform::identity(), Grid::new(-7.0, 7.5, n).unwrap(), Stencil::Second);
        let states = ham.solve(1e-6).unwrap();
        assert_eq!(states.len(), n);
        assert!(states.iter().all(|s| s.parity().is_none()));
        let mut e: Vec<f64> = states.energies().iter().map(|E| E.re).collect();
        e.sort_by(|a, b| a.total_cmp(b));
        assert!((e[0] - 2.290_989_272_8).abs() < 1e-8);
        assert!((e[1] - e[0]).abs() < 1e-8 * e[0]);
        assert!((e[2] - e[1]) > 1.0);
    }

    #[test]
    fn uniform_scaling_rotates_continuum() {
        // free particle in a box: all eigenvalues rotate by -2θ
        let pot = FnPotential::new(|_: C64| C64::from(0.0)).symmetric();
        let theta = 0.2;
        let ham = Hamiltonian::new(
            pot, Uniform::new(theta).unwrap(), Grid::symmetric(10.0, 101).unwrap(), Stencil::Second);
        let states = ham.solve(DEF_MAX_VIRIAL).unwrap();
        for s in states.iter() {
            let E = s.energy();
            assert!((E.arg() + 2.0 * theta).abs() < 1e-8);
            assert_eq!(s.kind(), StateKind::Continuum);
            assert!((s.virial() - 2.0 * E.norm()).abs() < 1e-6 * (1.0 + E.norm()));
        }
    }
}
