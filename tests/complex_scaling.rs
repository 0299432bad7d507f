use approx::{ assert_abs_diff_eq, assert_relative_eq };
use ndarray as nd;
use num_complex::Complex64 as C64;
use siegert::{
    DEF_MAX_VIRIAL,
    basisset::BasisSet,
    coordmap::ErfMap,
    eigenstate::{ Eigenstate, Parity, StateKind },
    error::ExpError,
    expansion::exact_strength_function_otf,
    functions::Gaussian,
    hamiltonian::{ Grid, GridState, Hamiltonian, Stencil },
    potential::{ Gaussians, SquareWell },
};

fn well() -> SquareWell { SquareWell::new(3.0, 10.0).unwrap() }

fn well_states() -> BasisSet<GridState> {
    let map = ErfMap::new(0.4, 3.0, 2.0).unwrap();
    let grid = Grid::symmetric(10.0, 801).unwrap();
    Hamiltonian::new(well(), map, grid, Stencil::Fourth)
        .solve(DEF_MAX_VIRIAL)
        .unwrap()
}

fn barrier_resonance(theta: f64) -> GridState {
    let pot = Gaussians::two_gaussian(5.0, 2.0, 0.3).unwrap();
    let map = ErfMap::new(theta, 3.5, 2.0).unwrap();
    let grid = Grid::symmetric(15.0, 751).unwrap();
    Hamiltonian::new(pot, map, grid, Stencil::Fourth)
        .solve(DEF_MAX_VIRIAL)
        .unwrap()
        .resonants()
        .iter()
        .min_by(|a, b| a.energy().re.total_cmp(&b.energy().re))
        .cloned()
        .unwrap()
}

#[test]
fn square_well_ground_state() {
    let states = well_states();
    let ground
        = states.iter()
        .min_by(|a, b| a.energy().re.total_cmp(&b.energy().re))
        .unwrap();
    assert_eq!(ground.parity(), Some(Parity::Even));
    assert_abs_diff_eq!(ground.energy().re, -9.585_485, epsilon = 1e-3);
}

#[test]
fn berggren_strength_matches_continuum() -> anyhow::Result<()> {
    let states = well_states();
    let test = Gaussian::normalized(0.2, 0.2, 0.0)?;
    let k: nd::Array1<f64> = nd::array![2.5, 4.0, 6.0];
    let berggren = states.berggren_strength_function(&test, &k)?;
    let exact = exact_strength_function_otf(&well(), &test, &k)?;
    for (b, e) in berggren.iter().zip(&exact) {
        assert_relative_eq!(*b, *e, max_relative = 0.02);
    }
    Ok(())
}

#[test]
fn berggren_propagation_at_time_zero() -> anyhow::Result<()> {
    // the full eigenbasis reproduces the initial packet on the grid
    let states = well_states();
    let test = Gaussian::normalized(0.2, 0.2, 0.0)?;
    let psi = states.berggren_propagation(&test, 0.0, &nd::array![0.0])?;
    assert_abs_diff_eq!((psi[0] - C64::from(1.018_709)).norm(), 0.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn berggren_input_checks() -> anyhow::Result<()> {
    let states = well_states();
    let test = Gaussian::normalized(0.2, 0.2, 0.0)?;
    assert!(matches!(
        states.berggren_propagation(&test, 0.0, &nd::array![0.0, -0.5]),
        Err(ExpError::BadTime(_)),
    ));

    // a packet whose products with the states overflow
    let huge = Gaussian::new(0.2, 0.2, 0.0, f64::MAX)?;
    assert!(matches!(
        states.berggren_propagation(&huge, 0.0, &nd::array![0.0]),
        Err(ExpError::Diverged { .. }),
    ));
    assert!(matches!(
        states.berggren_strength_function(&huge, &nd::array![1.0, 2.0]),
        Err(ExpError::Diverged { .. }),
    ));

    let empty: BasisSet<GridState> = BasisSet::new();
    assert!(matches!(
        empty.berggren_strength_function(&test, &nd::array![1.0]),
        Err(ExpError::NoStates(_)),
    ));
    Ok(())
}

#[test]
fn double_barrier_resonance() {
    let res = barrier_resonance(0.4);
    let expected = C64::new(0.361_69, -0.000_823);
    assert_abs_diff_eq!((res.energy() - expected).norm(), 0.0, epsilon = 1e-4);
    assert_eq!(res.parity(), Some(Parity::Even));
    assert_eq!(res.kind(), StateKind::Resonant);
    assert!(res.virial() < DEF_MAX_VIRIAL);

    // independent of the scaling angle
    let e1 = barrier_resonance(0.35).energy();
    let e2 = barrier_resonance(0.45).energy();
    assert_abs_diff_eq!((e1 - e2).norm(), 0.0, epsilon = 1e-5);
}
