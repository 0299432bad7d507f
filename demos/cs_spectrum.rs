use ndarray as nd;
use siegert::{
    DEF_MAX_VIRIAL,
    coordmap::ErfMap,
    eigenstate::{ Eigenstate, StateKind },
    functions::Gaussian,
    hamiltonian::{ Grid, Hamiltonian, Stencil },
    potential::Gaussians,
};

mod common;

// resonances of a symmetric double Gaussian barrier by smooth exterior complex
// scaling, and the Berggren strength function of a packet trapped between the
// barriers

fn main() -> anyhow::Result<()> {
    common::init_logging()?;

    let pot = Gaussians::two_gaussian(5.0, 2.0, 0.3)?;
    let grid = Grid::symmetric(15.0, 751)?;
    for theta in [0.35, 0.45] {
        let map = ErfMap::new(theta, 3.5, 2.0)?;
        let states = Hamiltonian::new(&pot, map, grid, Stencil::Fourth)
            .solve(DEF_MAX_VIRIAL)?;
        println!(
            "θ = {theta}: {} states, {} resonant, {} continuum",
            states.len(),
            states.resonants().len(),
            states.continuum().len(),
        );
        states.iter()
            .filter(|s| s.kind() == StateKind::Resonant && s.energy().re < 5.0)
            .for_each(|s| {
                println!(
                    "  E = {:+.8} ({}) virial = {:.2e}",
                    s.energy(),
                    s.parity().map(|p| p.to_string()).unwrap_or_default(),
                    s.virial(),
                );
            });

        let test = Gaussian::normalized(0.0, 0.4, 0.0)?;
        let k: nd::Array1<f64> = nd::Array1::linspace(0.5, 3.0, 11);
        let strength = states.berggren_strength_function(&test, &k)?;
        k.iter().zip(&strength)
            .for_each(|(kk, s)| println!("  S({:.3}) = {s:.6e}", kk * kk / 2.0));
    }
    Ok(())
}
