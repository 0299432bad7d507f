//! Complex coordinate maps `x → F(x)` used to rotate the continuum into the
//! lower half of the complex energy plane.
//!
//! All maps here are odd in `x` (so that symmetric potentials keep their parity
//! under scaling) and reduce to the identity for `θ = 0`. Smooth exterior maps
//! leave the region `|x| < x0` (approximately) unscaled and rotate the
//! coordinate by `θ` beyond it:
//! ```text
//! F'(x) = 1 + (e^{iθ} - 1) s(x)
//! ```
//! where the switching function `s` goes from 0 inside to 1 outside over a
//! length scale `1 / λ`.

use std::f64::consts::{ LN_2, PI };
use num_complex::Complex64 as C64;
use crate::{
    error::ParamError,
    special::erf,
};

/// A complex scaling map.
pub trait CoordMap {
    /// Scaling angle `θ`.
    fn theta(&self) -> f64;

    /// Copy of `self` with a different scaling angle.
    ///
    /// The angle is not validated; this is used to take small finite
    /// differences in `θ`.
    fn with_theta(&self, theta: f64) -> Self
    where Self: Sized;

    /// Mapped coordinate `F(x)`.
    fn map(&self, x: f64) -> C64;

    /// Jacobian `F'(x)`.
    fn jacobian(&self, x: f64) -> C64;
}

/// Uniform complex rotation `F(x) = x e^{iθ}`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Uniform {
    theta: f64,
}

impl Uniform {
    pub fn new(theta: f64) -> Result<Self, ParamError> {
        ParamError::check_theta(theta)?;
        Ok(Self { theta })
    }

    /// The identity map (`θ = 0`).
    pub fn identity() -> Self { Self { theta: 0.0 } }
}

impl CoordMap for Uniform {
    fn theta(&self) -> f64 { self.theta }

    fn with_theta(&self, theta: f64) -> Self { Self { theta } }

    fn map(&self, x: f64) -> C64 { x * C64::cis(self.theta) }

    fn jacobian(&self, _x: f64) -> C64 { C64::cis(self.theta) }
}

// antiderivative of erf(λy) with E(0) = 1 / (λ√π)
fn erf_integral(lambda: f64, y: f64) -> f64 {
    y * erf(lambda * y) + (-(lambda * y).powi(2)).exp() / (lambda * PI.sqrt())
}

/// Smooth exterior complex scaling with an error-function switch:
/// ```text
/// s(x) = 1 - ½ [erf(λ(x + x0)) - erf(λ(x - x0))]
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ErfMap {
    theta: f64,
    x0: f64,
    lambda: f64,
}

impl ErfMap {
    pub fn new(theta: f64, x0: f64, lambda: f64) -> Result<Self, ParamError> {
        ParamError::check_theta(theta)?;
        ParamError::check_nonneg("x0", x0)?;
        ParamError::check_positive("lambda", lambda)?;
        Ok(Self { theta, x0, lambda })
    }

    pub fn x0(&self) -> f64 { self.x0 }

    pub fn lambda(&self) -> f64 { self.lambda }

    /// Switching function `s(x)`.
    pub fn switch(&self, x: f64) -> f64 {
        1.0 - 0.5 * (
            erf(self.lambda * (x + self.x0)) - erf(self.lambda * (x - self.x0))
        )
    }
}

impl CoordMap for ErfMap {
    fn theta(&self) -> f64 { self.theta }

    fn with_theta(&self, theta: f64) -> Self { Self { theta, ..*self } }

    fn map(&self, x: f64) -> C64 {
        let S = x - 0.5 * (
            erf_integral(self.lambda, x + self.x0)
            - erf_integral(self.lambda, x - self.x0)
        );
        x + (C64::cis(self.theta) - 1.0) * S
    }

    fn jacobian(&self, x: f64) -> C64 {
        1.0 + (C64::cis(self.theta) - 1.0) * self.switch(x)
    }
}

// ln cosh(u), finite for large |u|
fn ln_cosh(u: f64) -> f64 {
    let au = u.abs();
    au + (-2.0 * au).exp().ln_1p() - LN_2
}

/// Smooth exterior complex scaling with a hyperbolic-tangent switch:
/// ```text
/// s(x) = 1 - ½ [tanh(λ(x + x0)) - tanh(λ(x - x0))]
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TanhMap {
    theta: f64,
    x0: f64,
    lambda: f64,
}

impl TanhMap {
    pub fn new(theta: f64, x0: f64, lambda: f64) -> Result<Self, ParamError> {
        ParamError::check_theta(theta)?;
        ParamError::check_nonneg("x0", x0)?;
        ParamError::check_positive("lambda", lambda)?;
        Ok(Self { theta, x0, lambda })
    }

    pub fn x0(&self) -> f64 { self.x0 }

    pub fn lambda(&self) -> f64 { self.lambda }

    /// Switching function `s(x)`.
    pub fn switch(&self, x: f64) -> f64 {
        1.0 - 0.5 * (
            (self.lambda * (x + self.x0)).tanh()
            - (self.lambda * (x - self.x0)).tanh()
        )
    }
}

impl CoordMap for TanhMap {
    fn theta(&self) -> f64 { self.theta }

    fn with_theta(&self, theta: f64) -> Self { Self { theta, ..*self } }

    fn map(&self, x: f64) -> C64 {
        let l = self.lambda;
        let S = x - 0.5 * (
            ln_cosh(l * (x + self.x0)) - ln_cosh(l * (x - self.x0))
        ) / l;
        x + (C64::cis(self.theta) - 1.0) * S
    }

    fn jacobian(&self, x: f64) -> C64 {
        1.0 + (C64::cis(self.theta) - 1.0) * self.switch(x)
    }
}
