//! Common interface for eigenstates, whether computed analytically or on a
//! grid.

use std::fmt;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    functions::TestFunction,
};

/// Classification of an eigenstate by the location of its wavenumber.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// `k` on the positive imaginary axis.
    Bound,
    /// `k` on the negative imaginary axis.
    AntiBound,
    /// `k` in the fourth quadrant.
    Resonant,
    /// `k` in the third quadrant.
    AntiResonant,
    /// Member of the (possibly rotated or discretized) continuum.
    Continuum,
    /// Anything else, e.g. numerical eigenvalues that fit no category.
    Unknown,
}

impl StateKind {
    /// Return `true` for the kinds that are Siegert states.
    pub fn is_siegert(self) -> bool {
        matches!(
            self,
            Self::Bound | Self::AntiBound | Self::Resonant | Self::AntiResonant
        )
    }

    /// Classify a Siegert wavenumber by its quadrant.
    ///
    /// Wavenumbers with `|Re k| <= tol` are taken to lie on the imaginary axis.
    pub fn from_wavenumber(k: C64, tol: f64) -> Self {
        if k.re.abs() <= tol {
            if k.im > 0.0 { Self::Bound } else { Self::AntiBound }
        } else if k.im <= 0.0 {
            if k.re > 0.0 { Self::Resonant } else { Self::AntiResonant }
        } else {
            Self::Unknown
        }
    }

    /// Classify a numerical eigenvalue `E` with quality `virial` against a
    /// threshold:
    ///
    /// - `virial > max_virial` → `Continuum`
    /// - `Re E < 0`, `|Im E| <= max_virial` → `Bound`
    /// - `Re E > 0`, `Im E < 0` → `Resonant`
    /// - `Re E > 0`, `Im E > 0` → `AntiResonant`
    /// - otherwise `Unknown`
    pub fn from_energy(E: C64, virial: f64, max_virial: f64) -> Self {
        if !virial.is_finite() || virial > max_virial {
            Self::Continuum
        } else if E.re < 0.0 && E.im.abs() <= max_virial {
            Self::Bound
        } else if E.re > 0.0 && E.im < 0.0 {
            Self::Resonant
        } else if E.re > 0.0 && E.im > 0.0 {
            Self::AntiResonant
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bound => "bound",
            Self::AntiBound => "antibound",
            Self::Resonant => "resonant",
            Self::AntiResonant => "antiresonant",
            Self::Continuum => "continuum",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Parity of an eigenstate under `x → -x`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// `+1` for even, `-1` for odd.
    pub fn sign(self) -> f64 {
        match self {
            Self::Even => 1.0,
            Self::Odd => -1.0,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => write!(f, "e"),
            Self::Odd => write!(f, "o"),
        }
    }
}

/// Wavenumber associated with an energy, `k = sqrt(2E)` on the principal
/// branch.
pub fn wavenumber_from_energy(E: C64) -> C64 { (2.0 * E).sqrt() }

/// A single eigenstate.
pub trait Eigenstate {
    /// Wavenumber `k`.
    fn wavenumber(&self) -> C64;

    /// Energy `E = k² / 2`.
    fn energy(&self) -> C64 {
        let k = self.wavenumber();
        k * k / 2.0
    }

    fn kind(&self) -> StateKind;

    fn parity(&self) -> Option<Parity>;

    /// Quality measure; smaller is more trustworthy.
    fn virial(&self) -> f64;

    /// Wavefunction at a real coordinate.
    fn eval(&self, x: f64) -> C64;

    /// Wavefunction on a grid of real coordinates.
    fn eval_grid<S>(&self, x: &Arr1<S>) -> nd::Array1<C64>
    where
        S: nd::Data<Elem = f64>,
        Self: Sized,
    {
        x.mapv(|xk| self.eval(xk))
    }

    /// c-product `(self|f) = ∫ u(x) f(x) dx`.
    fn cproduct<F: TestFunction>(&self, f: &F) -> C64
    where Self: Sized;

    /// Hermitian product `<self|f> = ∫ u*(x) f(x) dx`.
    fn braket<F: TestFunction>(&self, f: &F) -> C64
    where Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_wavenumbers() {
        let tol = 1e-9;
        assert_eq!(StateKind::from_wavenumber(C64::new(0.0, 2.0), tol), StateKind::Bound);
        assert_eq!(StateKind::from_wavenumber(C64::new(1e-12, -0.5), tol), StateKind::AntiBound);
        assert_eq!(StateKind::from_wavenumber(C64::new(3.0, -0.5), tol), StateKind::Resonant);
        assert_eq!(StateKind::from_wavenumber(C64::new(-3.0, -0.5), tol), StateKind::AntiResonant);
        assert_eq!(StateKind::from_wavenumber(C64::new(3.0, 0.5), tol), StateKind::Unknown);
        assert!(StateKind::Resonant.is_siegert());
        assert!(!StateKind::Continuum.is_siegert());
    }

    #[test]
    fn classify_energies() {
        let maxv = 1e-5;
        assert_eq!(StateKind::from_energy(C64::new(-2.0, 1e-9), 1e-8, maxv), StateKind::Bound);
        assert_eq!(StateKind::from_energy(C64::new(3.0, -0.2), 1e-8, maxv), StateKind::Resonant);
        assert_eq!(StateKind::from_energy(C64::new(3.0, 0.2), 1e-8, maxv), StateKind::AntiResonant);
        assert_eq!(StateKind::from_energy(C64::new(3.0, -0.2), 1e-3, maxv), StateKind::Continuum);
        assert_eq!(StateKind::from_energy(C64::new(-2.0, -0.1), 1e-8, maxv), StateKind::Unknown);
        assert_eq!(StateKind::from_energy(C64::new(1.0, 0.0), f64::NAN, maxv), StateKind::Continuum);
    }

    #[test]
    fn wavenumbers() {
        let k = wavenumber_from_energy(C64::new(-2.0, 0.0));
        assert!((k - C64::new(0.0, 2.0)).norm() < 1e-14);
        assert_eq!(format!("{}{}", StateKind::Resonant, Parity::Odd), "resonanto");
        assert_eq!(Parity::Odd.sign(), -1.0);
    }
}
