//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use num_complex::Complex64 as C64;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from a call to [`find_zeros`][crate::interp::find_zeros] when data
/// arrays are less than 5 elements long.
#[derive(Debug, Error)]
#[error("coordinate arrays in interpolation must be longer than 4 elements; got {0}")]
pub struct LagrangeError(pub usize);

impl LagrangeError {
    pub(crate) fn check<S, A>(a: &nd::ArrayBase<S, nd::Ix1>)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let n = a.len();
        (n > 4).then_some(()).ok_or(Self(n))
    }
}

/// Returned from functions in [`interp`][crate::interp].
#[derive(Debug, Error)]
pub enum InterpError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// [`LagrangeError`]
    #[error("lagrange error: {0}")]
    Lagrange(#[from] LagrangeError),
}

/// Returned from constructors of potentials, test functions, coordinate maps,
/// and search parameter sets.
#[derive(Debug, Error)]
pub enum ParamError {
    /// Returned when a parameter required to be positive is not.
    #[error("{0} must be greater than 0; got {1}")]
    NonPositive(&'static str, f64),

    /// Returned when a parameter required to be non-negative is negative.
    #[error("{0} must be non-negative; got {1}")]
    Negative(&'static str, f64),

    /// Returned when the lower end of a range exceeds the upper end.
    #[error("{0} range must satisfy min <= max; got ({1}, {2})")]
    BadRange(&'static str, f64, f64),

    /// Returned when a complex scaling angle lies outside (-π/4, π/4).
    #[error("complex scaling angle must satisfy |theta| < pi/4; got {0}")]
    BadTheta(f64),
}

impl ParamError {
    pub(crate) fn check_positive(name: &'static str, val: f64)
        -> Result<(), Self>
    {
        (val > 0.0).then_some(()).ok_or(Self::NonPositive(name, val))
    }

    pub(crate) fn check_nonneg(name: &'static str, val: f64)
        -> Result<(), Self>
    {
        (val >= 0.0).then_some(()).ok_or(Self::Negative(name, val))
    }

    pub(crate) fn check_range(name: &'static str, min: f64, max: f64)
        -> Result<(), Self>
    {
        (min <= max).then_some(()).ok_or(Self::BadRange(name, min, max))
    }

    pub(crate) fn check_theta(theta: f64) -> Result<(), Self> {
        (theta.abs() < std::f64::consts::FRAC_PI_4)
            .then_some(())
            .ok_or(Self::BadTheta(theta))
    }
}

/// Returned from the complex root finders in [`rootfind`][crate::rootfind].
#[derive(Debug, Error)]
pub enum RootError {
    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a non-positive `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when the iteration limit is hit before convergence.
    #[error("rootfind::secant: no convergence within {maxiters} iterations starting from {guess}")]
    NoConvergence { guess: C64, maxiters: usize },

    /// Returned when two successive function values coincide.
    #[error("rootfind::secant: vanishing secant denominator at {0}")]
    ZeroDenominator(C64),

    /// Returned when an iterate is NaN or infinite.
    #[error("rootfind::secant: non-finite iterate starting from {0}")]
    NonFinite(C64),
}

impl RootError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }
}

/// Returned from searches for analytic eigenstates in
/// [`swp`][crate::swp].
#[derive(Debug, Error)]
pub enum FindError {
    /// [`ParamError`]
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// [`InterpError`]
    #[error("interpolation error: {0}")]
    Interp(#[from] InterpError),
}

/// Returned from the complex-scaled [`Hamiltonian`][crate::hamiltonian::Hamiltonian].
#[derive(Debug, Error)]
pub enum HError {
    /// Returned when a grid has too few points to carry the finite-difference
    /// stencil.
    #[error("grids must have at least 5 points; got {0}")]
    TooFewPoints(usize),

    /// Returned when grid bounds are not strictly increasing.
    #[error("grid bounds must satisfy xmin < xmax; got ({0}, {1})")]
    BadBounds(f64, f64),

    /// Returned when a non-positive virial threshold is encountered.
    #[error("virial threshold must be greater than 0; got {0}")]
    BadMaxVirial(f64),

    /// [`LinalgError`]
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

impl HError {
    pub(crate) fn check_max_virial(max_virial: f64) -> Result<(), Self> {
        (max_virial > 0.0).then_some(()).ok_or(Self::BadMaxVirial(max_virial))
    }
}

/// Returned from strength function and propagation routines in
/// [`expansion`][crate::expansion].
#[derive(Debug, Error)]
pub enum ExpError {
    /// Returned when a basis set lacks the states an expansion needs.
    #[error("basis set contains no {0} states")]
    NoStates(&'static str),

    /// Returned when a Mittag-Leffler expansion is requested at a point
    /// outside the region where the potential is non-zero.
    #[error("point x = {x} lies outside the potential region [-{a}, {a}]")]
    OutsidePotential { x: f64, a: f64 },

    /// Returned when a test function extends beyond the potential region.
    #[error("test function support ({0}, {1}) extends beyond the potential region")]
    TestOutsidePotential(f64, f64),

    /// Returned when a propagation time is negative or not finite.
    #[error("propagation times must be finite and non-negative; got {0}")]
    BadTime(f64),

    /// Returned when a partial-sum sequence is detected to diverge.
    #[error("expansion diverged after {terms} terms")]
    Diverged { terms: usize },

    /// Returned when an evaluation grid is empty or otherwise unusable.
    #[error("bad evaluation grid: {0}")]
    BadGrid(&'static str),

    /// [`ParamError`]
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),
}

/// Returned from time-dependent wavefunction solver functions.
#[derive(Debug, Error)]
pub enum TError {
    /// Returned when a grid has fewer than two points.
    #[error("time-dependent solvers need at least 2 grid points; got {0}")]
    TooFewPoints(usize),

    /// Returned when a non-positive maximum time step is encountered.
    #[error("maximum time step must be greater than 0; got {0}")]
    BadTimeStep(f64),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),
}

impl TError {
    pub(crate) fn check_time_step(dt: f64) -> Result<(), Self> {
        (dt > 0.0).then_some(()).ok_or(Self::BadTimeStep(dt))
    }
}
