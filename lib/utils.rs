//! Miscellaneous tools.

use ndarray::{ self as nd, Ix1, concatenate };
use ndarray_linalg::Scalar;
use num_complex::Complex64 as C64;
use rustfft as fft;

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    (dx / two) * (y[0] + two * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Integrate using the composite Simpson rule.
///
/// If `y` has an even number of points, the last interval is handled with
/// the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn simpson<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = y.len();
    if n < 3 { return trapz(y, dx); }
    let m = if n % 2 == 1 { n } else { n - 1 };
    let two = A::one() + A::one();
    let three = two + A::one();
    let four = two + two;
    let inner
        = y.iter().take(m).enumerate().skip(1).take(m - 2)
        .fold(A::zero(), |acc, (k, yk)| {
            acc + if k % 2 == 1 { four * *yk } else { two * *yk }
        });
    let mut res = (dx / three) * (y[0] + inner + y[m - 1]);
    if m < n {
        res = res + (dx / two) * (y[n - 2] + y[n - 1]);
    }
    res
}

/// Integrate a complex-valued function of a real variable over `[a, b]` with
/// the composite Simpson rule on `n` points.
///
/// *Panics if `n` is less than 2*.
pub fn integrate<F>(mut f: F, a: f64, b: f64, n: usize) -> C64
where F: FnMut(f64) -> C64
{
    let x: nd::Array1<f64> = nd::Array1::linspace(a, b, n);
    let dx = (b - a) / (n - 1) as f64;
    let y: nd::Array1<C64> = x.mapv(&mut f);
    simpson(&y, C64::from(dx))
}

/// Calculate the hermitian inner product of two wavefunctions.
///
/// *Panics if either array has length less than 2*.
pub fn wf_dot<S, T, A>(
    q: &nd::ArrayBase<S, Ix1>,
    p: &nd::ArrayBase<T, Ix1>,
    dx: A::Real,
) -> A
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = q.len().min(p.len());
    let two = A::one() + A::one();
    (A::from_real(dx) / two) * (
        q[0].conj() * p[0]
        + two * q.iter().zip(p).skip(1).take(n - 2)
            .fold(A::zero(), |acc, (qk, pk)| acc + qk.conj() * *pk)
        + q[n - 1].conj() * p[n - 1]
    )
}

/// Calculate the L² norm (squared) of a wavefunction.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S, A>(q: &nd::ArrayBase<S, Ix1>, dx: A::Real) -> A::Real
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    wf_dot(q, q, dx).re()
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling interval `dt`.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    let np = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let fp: nd::Array1<f64>
        = (0..np)
        .map(|k| k as f64 / (n as f64 * dt))
        .collect();
    let fm: nd::Array1<f64>
        = (1..n - np + 1).rev()
        .map(|k| -(k as f64) / (n as f64 * dt))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

fn process(f: &mut nd::Array1<C64>, inverse: bool) {
    let n: usize = f.len();
    let mut planner = fft::FftPlanner::new();
    let plan
        = if inverse {
            planner.plan_fft_inverse(n)
        } else {
            planner.plan_fft_forward(n)
        };
    match f.as_slice_mut() {
        Some(buf) => plan.process(buf),
        None => {
            let mut buf: Vec<C64> = f.to_vec();
            plan.process(&mut buf);
            f.iter_mut().zip(buf).for_each(|(fk, bk)| { *fk = bk; });
        },
    }
}

/// Perform the one-dimensional, complex-valued FFT in place.
pub fn fft_inplace(f: &mut nd::Array1<C64>) { process(f, false); }

/// Perform the one-dimensional, complex-valued inverse FFT in place.
pub fn ifft_inplace(x: &mut nd::Array1<C64>) {
    process(x, true);
    let n = x.len() as f64;
    x.map_inplace(|xk| { *xk /= n; });
}

/// Return the number of elements of `x` whose real and imaginary parts are both
/// finite.
pub(crate) fn count_finite<'a, I>(x: I) -> usize
where I: IntoIterator<Item = &'a C64>
{
    x.into_iter().filter(|xk| xk.re.is_finite() && xk.im.is_finite()).count()
}
