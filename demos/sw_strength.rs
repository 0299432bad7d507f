use ndarray as nd;
use siegert::{
    basisset::BasisSet,
    eigenstate::Eigenstate,
    expansion::exact_strength_function_otf,
    functions::Gaussian,
    potential::SquareWell,
    swp::{ SiegertSearch, SwState },
};

mod common;

// strength function of a Gaussian packet in a square well: MLE over the
// Siegert states against direct integration over the continuum

fn main() -> anyhow::Result<()> {
    common::init_logging()?;

    let well = SquareWell::new(3.0, 10.0)?;
    let search = SiegertSearch { re_kmax: 25.0, ..SiegertSearch::default() };
    let states: BasisSet<SwState> = BasisSet::find_siegert_states(&well, search)?;
    println!(
        "{} Siegert states: {} bound, {} antibound, {} resonant",
        states.len(),
        states.bounds().len(),
        states.antibounds().len(),
        states.resonants().len(),
    );
    for s in states.bounds().iter().chain(states.antibounds().iter()) {
        println!(
            "  {:>9} ({}) k = {:+.6}, E = {:+.6}",
            s.kind(),
            s.parity().map(|p| p.to_string()).unwrap_or_default(),
            s.wavenumber(),
            s.energy(),
        );
    }

    let test = Gaussian::normalized(0.2, 0.2, 0.0)?;
    let k: nd::Array1<f64> = nd::Array1::linspace(0.05, 10.0, 200);
    let mle = states.mle_strength_function(&test, &k)?;
    let exact = exact_strength_function_otf(&well, &test, &k)?;
    let max_err
        = mle.iter().zip(&exact)
        .map(|(m, e)| (m - e).abs())
        .fold(0.0, f64::max);

    println!("{:>8} {:>14} {:>14}", "k", "S_mle", "S_exact");
    k.iter().zip(&mle).zip(&exact)
        .step_by(10)
        .for_each(|((kk, m), e)| println!("{kk:8.3} {m:14.6e} {e:14.6e}"));
    println!("max |S_mle - S_exact| = {max_err:.3e}");
    Ok(())
}
