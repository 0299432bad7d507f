//! Test functions (initial wavepackets and trial states) for strength functions
//! and propagation.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::ParamError,
};

/// A function of position that can be projected onto eigenstates.
///
/// Implementors must accept complex-scaled coordinates, i.e. provide the
/// analytic continuation of the function off the real axis.
pub trait TestFunction {
    /// Evaluate at a (possibly complex) coordinate.
    fn eval(&self, z: C64) -> C64;

    /// Interval outside of which the function is negligible.
    fn support(&self) -> (f64, f64);

    /// Evaluate at a real coordinate.
    fn eval_real(&self, x: f64) -> C64 { self.eval(C64::from(x)) }

    /// Sample on a real grid.
    fn on_grid<S>(&self, x: &Arr1<S>) -> nd::Array1<C64>
    where
        S: nd::Data<Elem = f64>,
        Self: Sized,
    {
        x.mapv(|xk| self.eval_real(xk))
    }
}

impl<T: TestFunction + ?Sized> TestFunction for &T {
    fn eval(&self, z: C64) -> C64 { (**self).eval(z) }

    fn support(&self) -> (f64, f64) { (**self).support() }
}

/// A Gaussian wavepacket `h exp(-(x - c)² / (2σ²)) exp(i k0 x)`.
///
/// The support is taken to be `c ± 6σ`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gaussian {
    pub center: f64,
    pub sigma: f64,
    pub k0: f64,
    pub height: f64,
}

impl Gaussian {
    pub fn new(center: f64, sigma: f64, k0: f64, height: f64)
        -> Result<Self, ParamError>
    {
        ParamError::check_positive("sigma", sigma)?;
        Ok(Self { center, sigma, k0, height })
    }

    /// Construct with height set such that the packet has unit L² norm.
    pub fn normalized(center: f64, sigma: f64, k0: f64)
        -> Result<Self, ParamError>
    {
        ParamError::check_positive("sigma", sigma)?;
        let height = (PI * sigma * sigma).powf(-0.25);
        Ok(Self { center, sigma, k0, height })
    }
}

impl TestFunction for Gaussian {
    fn eval(&self, z: C64) -> C64 {
        let d = z - self.center;
        self.height
            * (-d * d / (2.0 * self.sigma * self.sigma)).exp()
            * (C64::i() * self.k0 * z).exp()
    }

    fn support(&self) -> (f64, f64) {
        (self.center - 6.0 * self.sigma, self.center + 6.0 * self.sigma)
    }
}

/// A rectangular pulse `h exp(i k0 x)` on `|x - c| <= w / 2`.
///
/// Off the real axis the window is applied to `Re z`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangular {
    pub center: f64,
    pub width: f64,
    pub k0: f64,
    pub height: f64,
}

impl Rectangular {
    pub fn new(center: f64, width: f64, k0: f64, height: f64)
        -> Result<Self, ParamError>
    {
        ParamError::check_positive("width", width)?;
        Ok(Self { center, width, k0, height })
    }
}

impl TestFunction for Rectangular {
    fn eval(&self, z: C64) -> C64 {
        if (z.re - self.center).abs() <= self.width / 2.0 {
            self.height * (C64::i() * self.k0 * z).exp()
        } else {
            C64::from(0.0)
        }
    }

    fn support(&self) -> (f64, f64) {
        (self.center - self.width / 2.0, self.center + self.width / 2.0)
    }
}

/// Complex conjugate of a test function, continued off the real axis as
/// `z ↦ conj(f(conj z))`.
#[derive(Copy, Clone, Debug)]
pub struct Conjugate<F>(pub F);

impl<F: TestFunction> TestFunction for Conjugate<F> {
    fn eval(&self, z: C64) -> C64 { self.0.eval(z.conj()).conj() }

    fn support(&self) -> (f64, f64) { self.0.support() }
}
