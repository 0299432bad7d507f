use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use siegert::{
    basisset::BasisSet,
    error::ExpError,
    functions::{ Gaussian, TestFunction },
    potential::SquareWell,
    swp::{ SiegertSearch, SwState },
    timedep::{ cell_potential, split_step },
};

const TIMES: [f64; 4] = [0.0, 0.05, 0.2, 1.0];

// ψ(0, t) for the packet below, from a converged continuum integral
fn reference() -> [C64; 4] {
    [
        C64::new(1.018_709_03, 0.0),
        C64::new(1.044_714_78, 0.318_451_86),
        C64::new(0.117_636_19, 0.720_527_40),
        C64::new(0.015_700_35, 0.005_409_61),
    ]
}

fn well() -> SquareWell { SquareWell::new(3.0, 10.0).unwrap() }

fn packet() -> Gaussian { Gaussian::normalized(0.2, 0.2, 0.0).unwrap() }

fn siegert_states() -> BasisSet<SwState> {
    let search = SiegertSearch { re_kmax: 25.0, ..SiegertSearch::default() };
    BasisSet::find_siegert_states(&well(), search).unwrap()
}

fn assert_close(found: &nd::Array1<C64>, expected: &[C64], tol: f64) {
    assert_eq!(found.len(), expected.len());
    for (f, e) in found.iter().zip(expected) {
        assert_abs_diff_eq!((f - e).norm(), 0.0, epsilon = tol);
    }
}

#[test]
fn siegert_propagation_at_the_center() -> anyhow::Result<()> {
    let t = nd::Array1::from(TIMES.to_vec());
    let psi = siegert_states().siegert_propagation(&packet(), 0.0, &t)?;
    assert_close(&psi, &reference(), 1e-4);
    assert_abs_diff_eq!(packet().eval_real(0.0).re, 1.018_709_35, epsilon = 1e-8);
    Ok(())
}

#[test]
fn mle_propagation_matches_siegert() -> anyhow::Result<()> {
    let states = siegert_states();
    let test = packet();
    let t = nd::array![0.2, 1.0];
    let kgrid = nd::Array1::linspace(0.0, 40.0, 4001);
    let mle = states.mle_propagation(&test, 0.0, &t, &kgrid)?;
    let exact = states.siegert_propagation(&test, 0.0, &t)?;
    assert_close(&mle, exact.as_slice().unwrap(), 1e-4);
    Ok(())
}

#[test]
fn continuum_propagation_matches_siegert() -> anyhow::Result<()> {
    let w = well();
    let test = packet();
    let cont = BasisSet::find_continuum_states(&w, 25.0, 0.02, None, None)?;
    let basis = &siegert_states() + &cont;
    let t = nd::Array1::from(TIMES.to_vec());
    let psi = basis.exact_propagation(&test, 0.0, &t)?;
    assert_close(&psi, &reference(), 1e-4);

    // without continuum states there is nothing to integrate over
    assert!(matches!(
        siegert_states().exact_propagation(&test, 0.0, &t),
        Err(ExpError::NoStates(_)),
    ));
    Ok(())
}

#[test]
fn split_step_matches_siegert() -> anyhow::Result<()> {
    let n = 2048;
    let half = 20.0;
    let dx = 2.0 * half / n as f64;
    let x: nd::Array1<f64> = (0..n).map(|j| -half + j as f64 * dx).collect();
    assert_abs_diff_eq!(x[n / 2], 0.0, epsilon = 1e-12);
    let v = cell_potential(&well(), &x, dx);
    let q0 = packet().on_grid(&x);
    let t = nd::array![0.0, 0.05, 0.2];
    let q = split_step(dx, &v, &q0, &t, 1e-3)?;
    let psi: nd::Array1<C64> = q.column(n / 2).to_owned();
    assert_close(&psi, &reference()[..3], 2e-3);
    Ok(())
}

#[test]
fn propagation_needs_points_inside_the_well() {
    let t = nd::array![0.1];
    let states = siegert_states();
    assert!(matches!(
        states.siegert_propagation(&packet(), 2.0, &t),
        Err(ExpError::OutsidePotential { .. }),
    ));
    let wide = Gaussian::normalized(1.0, 0.5, 0.0).unwrap();
    assert!(states.siegert_propagation(&wide, 0.0, &t).is_err());
}
