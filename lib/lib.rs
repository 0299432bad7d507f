#![allow(dead_code, non_snake_case)]

//! Provides tools to compute Siegert (resonant) states of one-dimensional
//! potentials and to use them, together with continuum states, to reconstruct
//! strength functions and time-propagated wavepackets through competing
//! expansions.
//!
//! Provides implementations for the following:
//! - Eigenstates:
//!     - Analytic Siegert and continuum states of the square well, located by
//!       interpolated bracketing on the imaginary axis and complex secant
//!       search elsewhere
//!     - Numerical eigenstates of a complex-scaled Hamiltonian (uniform or
//!       smooth exterior scaling) classified by their virial
//! - Expansions:
//!     - Mittag-Leffler expansion (MLE) of the strength function and the
//!       time propagator
//!     - Exact Siegert propagation via the Faddeeva function
//!     - Berggren expansion over complex-scaled eigenstates
//!     - Direct integration over continuum states
//! - Reference:
//!     - Pseudo-spectral split-step propagation
//!
//! Units are such that ħ = m = 1, so that `E = k² / 2`.
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod special;
pub mod interp;
pub mod utils;
pub mod functions;
pub mod potential;
pub mod coordmap;
pub mod eigenstate;
pub mod basisset;
pub mod rootfind;
pub mod swp;
pub mod hamiltonian;
pub mod expansion;
pub mod timedep;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-10;
pub(crate) const DEF_MAXITERS: usize = 1000;

/// Default virial threshold above which a numerical eigenstate is considered
/// part of the discretized continuum.
pub const DEF_MAX_VIRIAL: f64 = 1e-5;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
