use ndarray as nd;
use num_complex::Complex64 as C64;
use siegert::{
    basisset::BasisSet,
    functions::{ Gaussian, TestFunction },
    potential::SquareWell,
    swp::{ SiegertSearch, SwState },
    timedep::{ cell_potential, split_step },
};

mod common;

// ψ(0, t) for a Gaussian packet released in a square well, computed four ways

const X: f64 = 0.0;

fn main() -> anyhow::Result<()> {
    common::init_logging()?;

    let well = SquareWell::new(3.0, 10.0)?;
    let test = Gaussian::normalized(0.2, 0.2, 0.0)?;
    let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 11);

    let search = SiegertSearch { re_kmax: 25.0, ..SiegertSearch::default() };
    let siegerts: BasisSet<SwState> = BasisSet::find_siegert_states(&well, search)?;
    let exact = siegerts.siegert_propagation(&test, X, &t)?;
    let kgrid: nd::Array1<f64> = nd::Array1::linspace(0.0, 40.0, 4001);
    let mle = siegerts.mle_propagation(&test, X, &t, &kgrid)?;

    let continuum = BasisSet::find_continuum_states(&well, 25.0, 0.02, None, None)?;
    let full = &siegerts + &continuum;
    let cont = full.exact_propagation(&test, X, &t)?;

    let n = 2048;
    let half = 20.0;
    let dx = 2.0 * half / n as f64;
    let x: nd::Array1<f64> = (0..n).map(|j| -half + j as f64 * dx).collect();
    let v = cell_potential(&well, &x, dx);
    let q = split_step(dx, &v, &test.on_grid(&x), &t, 1e-3)?;
    let direct: nd::Array1<C64> = q.column(n / 2).to_owned();

    println!(
        "{:>5} {:>24} {:>24} {:>24} {:>24}",
        "t", "siegert", "mle", "continuum", "split-step",
    );
    for (j, tj) in t.iter().enumerate() {
        println!(
            "{tj:5.2} {:>24.6} {:>24.6} {:>24.6} {:>24.6}",
            exact[j], mle[j], cont[j], direct[j],
        );
    }
    Ok(())
}
