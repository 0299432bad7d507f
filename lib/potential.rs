//! One-dimensional potentials, evaluable on real grids and at complex-scaled
//! coordinates.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::ParamError,
};

/// A potential `V(x)`.
pub trait Potential {
    /// Evaluate the analytic continuation of the potential at `z`.
    fn eval(&self, z: C64) -> C64;

    /// Evaluate on the real axis.
    fn eval_real(&self, x: f64) -> f64 { self.eval(C64::from(x)).re }

    /// Half-width of the region outside of which the potential vanishes
    /// identically, if there is one.
    fn support(&self) -> Option<f64> { None }

    /// Return `true` if `V(-x) = V(x)`.
    fn is_symmetric(&self) -> bool { false }

    /// Average of the potential over a grid cell of width `h` centered on `z`.
    ///
    /// Defaults to the point value. Potentials with jumps override this.
    fn eval_cell(&self, z: C64, _h: f64) -> C64 { self.eval(z) }

    /// Sample at a set of (possibly complex) coordinates.
    fn on_grid<S>(&self, z: &Arr1<S>) -> nd::Array1<C64>
    where
        S: nd::Data<Elem = C64>,
        Self: Sized,
    {
        z.mapv(|zk| self.eval(zk))
    }

    /// Sample on a real grid.
    fn on_real_grid<S>(&self, x: &Arr1<S>) -> nd::Array1<f64>
    where
        S: nd::Data<Elem = f64>,
        Self: Sized,
    {
        x.mapv(|xk| self.eval_real(xk))
    }
}

impl<P: Potential + ?Sized> Potential for &P {
    fn eval(&self, z: C64) -> C64 { (**self).eval(z) }

    fn eval_real(&self, x: f64) -> f64 { (**self).eval_real(x) }

    fn support(&self) -> Option<f64> { (**self).support() }

    fn is_symmetric(&self) -> bool { (**self).is_symmetric() }

    fn eval_cell(&self, z: C64, h: f64) -> C64 { (**self).eval_cell(z, h) }
}

/// Continue `|z|` off the real axis as `±z` according to the sign of `Re z`.
fn cabs(z: C64) -> C64 { if z.re < 0.0 { -z } else { z } }

/// Square well of width `l` and depth `v0`, centered on the origin:
/// `V(x) = -v0` for `|x| <= l / 2`, zero otherwise.
///
/// Negative `v0` gives a square barrier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SquareWell {
    l: f64,
    v0: f64,
}

impl SquareWell {
    pub fn new(l: f64, v0: f64) -> Result<Self, ParamError> {
        ParamError::check_positive("width", l)?;
        Ok(Self { l, v0 })
    }

    /// Width of the well.
    pub fn width(&self) -> f64 { self.l }

    /// Depth of the well.
    pub fn depth(&self) -> f64 { self.v0 }

    /// Half-width of the well, `a = l / 2`.
    pub fn half_width(&self) -> f64 { self.l / 2.0 }
}

impl Potential for SquareWell {
    fn eval(&self, z: C64) -> C64 {
        if z.re.abs() <= self.half_width() {
            C64::from(-self.v0)
        } else {
            C64::from(0.0)
        }
    }

    fn support(&self) -> Option<f64> { Some(self.half_width()) }

    fn is_symmetric(&self) -> bool { true }

    fn eval_cell(&self, z: C64, h: f64) -> C64 {
        if h <= 0.0 { return self.eval(z); }
        let a = self.half_width();
        let overlap = ((z.re + h / 2.0).min(a) - (z.re - h / 2.0).max(-a)).max(0.0);
        C64::from(-self.v0 * overlap / h)
    }
}

/// Symmetric Woods-Saxon well `-V0 / (1 + exp((|x| - R) / d))`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WoodsSaxon {
    depth: f64,
    radius: f64,
    diffuseness: f64,
}

impl WoodsSaxon {
    pub fn new(depth: f64, radius: f64, diffuseness: f64)
        -> Result<Self, ParamError>
    {
        ParamError::check_positive("radius", radius)?;
        ParamError::check_positive("diffuseness", diffuseness)?;
        Ok(Self { depth, radius, diffuseness })
    }
}

impl Potential for WoodsSaxon {
    fn eval(&self, z: C64) -> C64 {
        let arg = (cabs(z) - self.radius) / self.diffuseness;
        // 1 / (1 + e^arg) written to stay finite far out
        if arg.re > 0.0 {
            let e = (-arg).exp();
            -self.depth * e / (1.0 + e)
        } else {
            -self.depth / (1.0 + arg.exp())
        }
    }

    fn is_symmetric(&self) -> bool { true }
}

/// A single Gaussian term `h exp(-(x - c)² / (2σ²))`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaussianTerm {
    pub height: f64,
    pub center: f64,
    pub sigma: f64,
}

impl GaussianTerm {
    fn eval(&self, z: C64) -> C64 {
        let d = z - self.center;
        self.height * (-d * d / (2.0 * self.sigma * self.sigma)).exp()
    }
}

/// Sum of Gaussian terms.
#[derive(Clone, Debug, PartialEq)]
pub struct Gaussians {
    terms: Vec<GaussianTerm>,
    symmetric: bool,
}

impl Gaussians {
    /// Build from `(height, center, sigma)` triples.
    pub fn new<I>(terms: I) -> Result<Self, ParamError>
    where I: IntoIterator<Item = (f64, f64, f64)>
    {
        let terms: Vec<GaussianTerm>
            = terms.into_iter()
            .map(|(height, center, sigma)| {
                ParamError::check_positive("sigma", sigma)?;
                Ok(GaussianTerm { height, center, sigma })
            })
            .collect::<Result<_, ParamError>>()?;
        let symmetric
            = terms.iter()
            .all(|t| {
                t.center == 0.0
                || terms.iter().any(|s| {
                    s.center == -t.center
                        && s.height == t.height
                        && s.sigma == t.sigma
                })
            });
        Ok(Self { terms, symmetric })
    }

    /// Symmetric double barrier: height `h` at `±x0`, width `sigma`.
    pub fn two_gaussian(h: f64, x0: f64, sigma: f64)
        -> Result<Self, ParamError>
    {
        Self::new([(h, -x0, sigma), (h, x0, sigma)])
    }

    /// Symmetric arrangement of two inner barriers at `±x1` and two outer
    /// barriers at `±x2`.
    pub fn four_gaussian(
        h1: f64,
        x1: f64,
        sigma1: f64,
        h2: f64,
        x2: f64,
        sigma2: f64,
    ) -> Result<Self, ParamError>
    {
        Self::new([
            (h2, -x2, sigma2),
            (h1, -x1, sigma1),
            (h1, x1, sigma1),
            (h2, x2, sigma2),
        ])
    }

    pub fn terms(&self) -> &[GaussianTerm] { &self.terms }
}

impl Potential for Gaussians {
    fn eval(&self, z: C64) -> C64 {
        self.terms.iter().map(|t| t.eval(z)).sum()
    }

    fn is_symmetric(&self) -> bool { self.symmetric }
}

/// A potential defined by an arbitrary closure over complex coordinates.
pub struct FnPotential<F>
where F: Fn(C64) -> C64
{
    f: F,
    support: Option<f64>,
    symmetric: bool,
}

impl<F> FnPotential<F>
where F: Fn(C64) -> C64
{
    /// Wrap a closure; the potential is assumed to be neither symmetric nor
    /// compactly supported unless declared with [`Self::symmetric`] or
    /// [`Self::with_support`].
    pub fn new(f: F) -> Self { Self { f, support: None, symmetric: false } }

    /// Declare the potential symmetric under `x → -x`.
    pub fn symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    /// Declare the potential to vanish for `|x| > a`.
    pub fn with_support(mut self, a: f64) -> Result<Self, ParamError> {
        ParamError::check_positive("support", a)?;
        self.support = Some(a);
        Ok(self)
    }
}

impl<F> Potential for FnPotential<F>
where F: Fn(C64) -> C64
{
    fn eval(&self, z: C64) -> C64 { (self.f)(z) }

    fn support(&self) -> Option<f64> { self.support }

    fn is_symmetric(&self) -> bool { self.symmetric }
}
