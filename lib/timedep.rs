//! Direct propagation of the 1+1-dimensional time-dependent Schrödinger
//! equation for a static potential, used as a reference for the eigenstate
//! expansions.
//!
//! The wavefunction is advanced by the symmetric split-operator scheme
//! ```text
//! q(t + dt) = e^{-i V dt / 2} F⁻¹ e^{-i p² dt / 2} F e^{-i V dt / 2} q(t)
//! ```
//! on a periodic grid, where `F` is the discrete Fourier transform. The grid
//! should be wide enough that the packet does not wrap around over the times
//! of interest.
//!
//! In all 2D arrays, the first (or zero-th) axis indexes time.

use std::f64::consts::TAU;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::{ LengthError, TError },
    potential::Potential,
    utils::{ fft_freq, fft_inplace, ifft_inplace },
};

pub type TResult<T> = Result<T, TError>;

// return an array of differences between adjacent elements of a source array
fn array_diff<S>(a: &Arr1<S>) -> Vec<f64>
where S: nd::Data<Elem = f64>
{
    a.iter().zip(a.iter().skip(1))
        .map(|(ak, akp1)| *akp1 - *ak)
        .collect()
}

fn apply_split_kinetic(phase: &nd::Array1<C64>, q: &mut nd::Array1<C64>) {
    fft_inplace(q);
    q.iter_mut().zip(phase)
        .for_each(|(qi, ph)| { *qi *= ph; });
    ifft_inplace(q);
}

fn apply_split_potential(phase: &nd::Array1<C64>, q: &mut nd::Array1<C64>) {
    q.iter_mut().zip(phase)
        .for_each(|(qi, ph)| { *qi *= ph; });
}

/// Sample a potential on a uniform real grid with spacing `dx`, averaging
/// over each grid cell (see [`Potential::eval_cell`]).
pub fn cell_potential<P, S>(potential: &P, x: &Arr1<S>, dx: f64)
    -> nd::Array1<f64>
where
    P: Potential,
    S: nd::Data<Elem = f64>,
{
    x.mapv(|xk| potential.eval_cell(C64::from(xk), dx).re)
}

/// Perform split-step integration for a time-independent potential `V` over a
/// series of time coordinates `t`, starting from `q0` at `t[0]`.
///
/// Each interval between successive time coordinates is divided into equal
/// substeps no longer than `max_dt`. Returns the wavefunction at every time
/// coordinate.
///
/// ```
/// use ndarray as nd;
/// use num_complex::Complex64 as C64;
/// use siegert::timedep::split_step;
///
/// // a plane wave in free space only picks up the phase e^{-i k² t / 2}
/// let n = 64;
/// let dx = 0.1;
/// let k = std::f64::consts::TAU * 4.0 / (n as f64 * dx);
/// let x: nd::Array1<f64> = (0..n).map(|j| j as f64 * dx).collect();
/// let q0 = x.mapv(|xj| C64::cis(k * xj));
/// let V: nd::Array1<f64> = nd::Array1::zeros(n);
/// let t = nd::array![0.0, 0.5];
/// let q = split_step(dx, &V, &q0, &t, 0.01).unwrap();
/// let expected = q0[3] * C64::cis(-k * k / 4.0);
/// assert!((q[[1, 3]] - expected).norm() < 1e-10);
/// ```
pub fn split_step<S, T, U>(
    dx: f64,
    V: &Arr1<S>,
    q0: &Arr1<T>,
    t: &Arr1<U>,
    max_dt: f64,
) -> TResult<nd::Array2<C64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
    U: nd::Data<Elem = f64>,
{
    let n = V.len();
    (n >= 2).then_some(()).ok_or(TError::TooFewPoints(n))?;
    LengthError::check(V, q0)?;
    TError::check_time_step(max_dt)?;

    let p2: nd::Array1<f64> = fft_freq(n, dx).mapv(|f| (TAU * f).powi(2));
    let dt = array_diff(t);
    let mut q: nd::Array2<C64> = nd::Array2::zeros((t.len(), n));
    if t.is_empty() { return Ok(q); }
    let mut q_temp: nd::Array1<C64> = q0.to_owned();
    q.slice_mut(nd::s![0, ..]).assign(q0);
    let iter = dt.iter().zip(q.axis_iter_mut(nd::Axis(0)).skip(1));
    for (&dtk, qkp1) in iter {
        let nsub = (dtk.abs() / max_dt).ceil().max(1.0) as usize;
        let h = dtk / nsub as f64;
        let kin: nd::Array1<C64> = p2.mapv(|p2k| C64::cis(-p2k * h / 2.0));
        let pot: nd::Array1<C64> = V.mapv(|Vk| C64::cis(-Vk * h / 2.0));
        for _ in 0..nsub {
            apply_split_potential(&pot, &mut q_temp);
            apply_split_kinetic(&kin, &mut q_temp);
            apply_split_potential(&pot, &mut q_temp);
        }
        q_temp.clone().move_into(qkp1);
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        functions::{ Gaussian, TestFunction },
        potential::SquareWell,
        utils::wf_norm,
    };

    #[test]
    fn free_gaussian_spreading() {
        // |ψ(0, t)|² for a free Gaussian of width σ centered on the origin
        let sigma = 0.5;
        let g = Gaussian::normalized(0.0, sigma, 0.0).unwrap();
        let n = 1024;
        let dx = 0.04;
        let x: nd::Array1<f64>
            = (0..n).map(|j| (j as f64 - (n / 2) as f64) * dx).collect();
        let q0 = g.on_grid(&x);
        let V: nd::Array1<f64> = nd::Array1::zeros(n);
        let t = nd::array![0.0, 0.4, 1.0];
        let q = split_step(dx, &V, &q0, &t, 0.05).unwrap();
        for (k, &tk) in t.iter().enumerate() {
            let s2 = sigma.powi(4) + tk * tk;
            let expected = sigma / (std::f64::consts::PI * s2).sqrt();
            assert!((q[[k, n / 2]].norm_sqr() - expected).abs() < 1e-8);
            assert!((wf_norm(&q.row(k), dx) - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn norm_conserved_in_well() {
        let well = SquareWell::new(3.0, 10.0).unwrap();
        let n = 512;
        let dx = 0.05;
        let x: nd::Array1<f64>
            = (0..n).map(|j| (j as f64 - (n / 2) as f64) * dx).collect();
        let V = cell_potential(&well, &x, dx);
        assert!((V[n / 2] + 10.0).abs() < 1e-12);
        let q0 = Gaussian::normalized(0.2, 0.3, 1.0).unwrap().on_grid(&x);
        let t = nd::array![0.0, 0.3];
        let q = split_step(dx, &V, &q0, &t, 1e-3).unwrap();
        assert!((wf_norm(&q.row(1), dx) - wf_norm(&q0, dx)).abs() < 1e-8);
    }

    #[test]
    fn input_checks() {
        let V: nd::Array1<f64> = nd::Array1::zeros(4);
        let q0: nd::Array1<C64> = nd::Array1::zeros(5);
        let t = nd::array![0.0, 1.0];
        assert!(matches!(
            split_step(0.1, &V, &q0, &t, 0.1),
            Err(TError::Length(_)),
        ));
        let q0: nd::Array1<C64> = nd::Array1::zeros(4);
        assert!(matches!(
            split_step(0.1, &V, &q0, &t, 0.0),
            Err(TError::BadTimeStep(_)),
        ));
        let V1: nd::Array1<f64> = nd::Array1::zeros(1);
        let q1: nd::Array1<C64> = nd::Array1::zeros(1);
        assert!(matches!(
            split_step(0.1, &V1, &q1, &t, 0.1),
            Err(TError::TooFewPoints(1)),
        ));
    }
}
