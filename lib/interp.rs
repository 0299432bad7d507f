//! Locating zeros of real functions sampled on a grid.
//!
//! Sign changes between adjacent samples are bracketed, and the crossing point
//! inside each bracket is estimated by inverse Lagrange interpolation over a
//! few surrounding samples. This is how bound and antibound states are first
//! located on the imaginary wavenumber axis, where the Siegert conditions are
//! real-valued.
//!
//! ```
//! use ndarray as nd;
//! use siegert::interp::{ Zero, find_zeros };
//!
//! let x: nd::Array1<f64> = nd::Array::linspace(-5.0, 5.0, 1000);
//! let y = x.mapv(|xk| (xk + 3.0) * (xk - 0.5) * (xk - 2.0));
//! let zeros = find_zeros(&x, &y, Zero::All).unwrap();
//! assert_eq!(zeros.len(), 3);
//! assert!(
//!     [-3.0, 0.5, 2.0].into_iter()
//!         .zip(zeros)
//!         .all(|(expected, computed)| (computed - expected).abs() < 1e-6)
//! )
//! ```

use ndarray as nd;
use num_traits::Float;
use crate::{
    Arr1,
    error::*,
};

pub type InterpResult<T> = Result<T, InterpError>;

// samples on either side of a bracket used for the inverse interpolation
const STENCIL_HALF: usize = 2;

/// Direction of a sign change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zero {
    /// Positive to negative.
    Falling,
    /// Negative to positive.
    Rising,
    /// Either direction.
    All,
}

impl Zero {
    fn accepts<A: Float>(self, left: A, right: A) -> bool {
        match self {
            Self::Falling => left > right,
            Self::Rising => left < right,
            Self::All => left != right,
        }
    }
}

/// A sign change of a sampled function between two adjacent samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Crossing<A> {
    /// Left end of the bracket.
    pub lo: A,
    /// Right end of the bracket.
    pub hi: A,
    /// Interpolated location of the zero, always inside `[lo, hi]`.
    pub estimate: A,
    pub direction: Zero,
}

/// Evaluate the Lagrange polynomial through the points `(data_x, data_y)` at
/// `x`.
pub fn lagrange<S, T, A>(data_x: &Arr1<S>, data_y: &Arr1<T>, x: A)
    -> InterpResult<A>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Float,
{
    LengthError::check(data_x, data_y)?;
    let res
        = data_x.iter().zip(data_y).enumerate()
        .map(|(j, (&xj, &yj))| {
            data_x.iter().enumerate()
                .filter(|(m, _)| *m != j)
                .fold(yj, |acc, (_, &xm)| acc * (x - xm) / (xj - xm))
        })
        .fold(A::zero(), |acc, term| acc + term);
    Ok(res)
}

// zero inside one bracket from inverse interpolation on the monotonic run of
// samples around it, falling back to the secant line
fn bracket_estimate<A>(x: &[A], y: &[A], i: usize) -> A
where A: Float
{
    let n = x.len();
    let (xl, xr, yl, yr) = (x[i], x[i + 1], y[i], y[i + 1]);
    let linear = xl - yl * (xr - xl) / (yr - yl);
    let rising = yr > yl;
    let monotonic = |j: usize| (y[j + 1] > y[j]) == rising && y[j + 1] != y[j];
    let mut lo = i;
    while lo > 0 && i - lo < STENCIL_HALF && monotonic(lo - 1) { lo -= 1; }
    let mut hi = i + 1;
    while hi + 1 < n && hi - (i + 1) < STENCIL_HALF && monotonic(hi) { hi += 1; }
    let xs = nd::ArrayView1::from(&x[lo..=hi]);
    let ys = nd::ArrayView1::from(&y[lo..=hi]);
    match lagrange(&ys, &xs, A::zero()) {
        Ok(est) if est.is_finite() && est >= xl && est <= xr => est,
        _ => linear,
    }
}

/// Return all sign changes of a given direction in a sampled function.
///
/// A sample that is exactly zero is reported once, as a degenerate bracket.
/// At either end of the data, such a sample counts if its one neighbour is
/// nonzero, with the direction taken from that neighbour.
pub fn crossings<S, T, A>(data_x: &Arr1<S>, data_y: &Arr1<T>, kind: Zero)
    -> InterpResult<Vec<Crossing<A>>>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Float,
{
    LengthError::check(data_x, data_y)?;
    LagrangeError::check(data_x)?;
    let x: Vec<A> = data_x.iter().copied().collect();
    let y: Vec<A> = data_y.iter().copied().collect();
    let n = x.len();
    let z = A::zero();
    let mut found: Vec<Crossing<A>> = Vec::new();
    for i in 0..n {
        let prev = i.checked_sub(1).map(|j| y[j]);
        let next = y.get(i + 1).copied();
        if y[i] == z {
            // sign on either side of an exact zero; a missing neighbour reads
            // as zero
            let (l, r)
                = match (prev, next) {
                    (Some(l), Some(r)) if l * r < z => (l, r),
                    (None, Some(r)) if r != z => (z, r),
                    (Some(l), None) if l != z => (l, z),
                    _ => continue,
                };
            if kind.accepts(l, r) {
                let direction = if l < r { Zero::Rising } else { Zero::Falling };
                found.push(Crossing { lo: x[i], hi: x[i], estimate: x[i], direction });
            }
        } else if let Some(yr) = next {
            let yl = y[i];
            if yl * yr < z && kind.accepts(yl, yr) {
                let direction = if yl < yr { Zero::Rising } else { Zero::Falling };
                let estimate = bracket_estimate(&x, &y, i);
                found.push(Crossing { lo: x[i], hi: x[i + 1], estimate, direction });
            }
        }
    }
    Ok(found)
}

/// Return estimates of all zeros of a given direction in a sampled function.
///
/// The function should be monotonic within a few samples of each zero.
pub fn find_zeros<S, T, A>(data_x: &Arr1<S>, data_y: &Arr1<T>, kind: Zero)
    -> InterpResult<Vec<A>>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Float,
{
    Ok(crossings(data_x, data_y, kind)?.into_iter().map(|c| c.estimate).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lagrange_reproduces_polynomials() {
        let x = nd::array![0.0, 1.0, 2.0, 3.0];
        let y = x.mapv(|xk: f64| 2.0 * xk.powi(3) - xk + 1.0);
        let val = lagrange(&x, &y, 1.5).unwrap();
        assert!((val - (2.0 * 1.5_f64.powi(3) - 1.5 + 1.0)).abs() < 1e-12);
        assert!(matches!(
            lagrange(&x, &nd::array![1.0, 2.0], 0.5),
            Err(InterpError::Length(_)),
        ));
    }

    #[test]
    fn crossing_directions() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 10.0, 201);
        let y = x.mapv(f64::sin);
        let all = crossings(&x, &y, Zero::All).unwrap();
        // x = 0 is an exact zero at the left end, rising into the data
        assert_eq!(all.len(), 4);
        let falling = crossings(&x, &y, Zero::Falling).unwrap();
        assert_eq!(falling.len(), 2);
        assert!(falling.iter().all(|c| c.direction == Zero::Falling));
        assert!(falling.iter().all(|c| c.lo <= c.estimate && c.estimate <= c.hi));
        assert!((falling[0].estimate - std::f64::consts::PI).abs() < 1e-7);
        let rising = find_zeros(&x, &y, Zero::Rising).unwrap();
        assert_eq!(rising.len(), 2);
        assert_eq!(rising[0], 0.0);
        assert!((rising[1] - std::f64::consts::TAU).abs() < 1e-7);
    }

    #[test]
    fn exact_zero_sample_counted_once() {
        let x = nd::array![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let y = x.clone();
        let zeros = find_zeros(&x, &y, Zero::All).unwrap();
        assert_eq!(zeros, vec![0.0]);

        // exact zeros at either end
        let x = nd::array![0.0, 1.0, 2.0, 3.0, 4.0];
        let left = crossings(&x, &x, Zero::All).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!((left[0].estimate, left[0].direction), (0.0, Zero::Rising));
        let y = x.mapv(|xk| 4.0 - xk);
        let right = crossings(&x, &y, Zero::All).unwrap();
        assert_eq!(right.len(), 1);
        assert_eq!((right[0].estimate, right[0].direction), (4.0, Zero::Falling));
        assert!(crossings(&x, &y, Zero::Rising).unwrap().is_empty());
        // a flat run of zeros is not a crossing
        let flat = nd::array![0.0, 0.0, 1.0, 2.0, 3.0];
        assert!(find_zeros(&x, &flat, Zero::All).unwrap().is_empty());
        assert!(matches!(
            find_zeros(&nd::array![0.0, 1.0], &nd::array![-1.0, 1.0], Zero::All),
            Err(InterpError::Lagrange(_)),
        ));
    }
}
