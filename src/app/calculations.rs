//! # Calculations
//!
//! Delegated functions from `App`, one for each subcommand
//!

use super::Configuration;
use crate::{
    checkpoint::{Checkpoint, Species},
    lattice::{grid_from_checkpoint, lattice_points, species_values},
};
use hopper_mesher::{Grid, Values, Xyzv};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub(crate) struct ResetOptions {
    pub(crate) keep_electrons: bool,
    pub(crate) keep_holes: bool,
    pub(crate) fill_defaults: bool,
    pub(crate) quiet_output: bool,
}

pub(crate) fn inspect(path: &Path, config: &Configuration) -> color_eyre::Result<()> {
    let checkpoint = Checkpoint::from_path(path)?;
    let grid = grid_from_checkpoint(&checkpoint, config.lattice.spacing)?;
    let mut term = console::Term::stdout();

    writeln!(term, "{}", console::style(path.display()).bold())?;
    writeln!(term, "{}", checkpoint.summary())?;
    writeln!(
        term,
        "lattice         : {:?} sites, {} in total",
        grid.shape(),
        grid.number_of_points()
    )?;
    writeln!(
        term,
        "extent          : {:.3} x {:.3} x {:.3} nm",
        grid.lengths().x,
        grid.lengths().y,
        grid.lengths().z
    )?;
    Ok(())
}

pub(crate) fn reset(input: &Path, output: &Path, options: ResetOptions) -> color_eyre::Result<()> {
    let mut checkpoint = Checkpoint::from_path(input)?;
    checkpoint.reset(options.keep_electrons, options.keep_holes)?;
    if options.fill_defaults {
        checkpoint.parameters.set_empty();
    }
    if options.quiet_output {
        checkpoint.parameters.reset_output_parameters();
    }
    checkpoint.save_path(output)?;
    tracing::info!("Reset {} into {}", input.display(), output.display());
    Ok(())
}

pub(crate) fn fix_traps(input: &Path, output: &Path) -> color_eyre::Result<()> {
    let mut checkpoint = Checkpoint::from_path(input)?;
    checkpoint.fix_traps()?;
    checkpoint.save_path(output)?;
    tracing::info!(
        "Fixed {} traps, trap.percentage = {:?}",
        checkpoint.traps.len(),
        checkpoint.parameters.get_float("trap.percentage")?
    );
    Ok(())
}

pub(crate) fn defaults(output: &Path, parameters: Option<&Path>) -> color_eyre::Result<()> {
    let mut checkpoint = Checkpoint::new();
    checkpoint.parameters.set_defaults();
    if let Some(path) = parameters {
        tracing::info!("Applying parameters from {}", path.display());
        checkpoint
            .parameters
            .load(BufReader::new(File::open(path)?))?;
    }
    checkpoint.save_path(output)?;
    tracing::info!("Wrote default parameters to {}", output.display());
    Ok(())
}

pub(crate) fn export(
    path: &Path,
    species: Species,
    output: Option<&Path>,
    config: &Configuration,
) -> color_eyre::Result<()> {
    let checkpoint = Checkpoint::from_path(path)?;
    let grid = grid_from_checkpoint(&checkpoint, config.lattice.spacing)?;
    let xyzv = species_values(&checkpoint, &grid, species)?;
    tracing::info!("Exporting {} {}", xyzv.len(), species);

    let mut writer = open_output(output, config)?;
    xyzv.write_table(&mut writer)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn potential(
    path: &Path,
    species: Species,
    output: Option<&Path>,
    config: &Configuration,
) -> color_eyre::Result<()> {
    let checkpoint = Checkpoint::from_path(path)?;
    let grid = grid_from_checkpoint(&checkpoint, config.lattice.spacing)?;
    let sources = lattice_points(&checkpoint, &grid, species)?;
    let charge = checkpoint.charge(species)? * config.coulomb_prefactor();

    let field = grid
        .interaction_mesh()
        .coulomb_everywhere(&sources, charge);
    let xyzv = potential_table(&grid, &field)?;

    let mut writer = open_output(output, config)?;
    xyzv.write_table(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Every site of the grid, in site order, carrying its value in `field`
fn potential_table(grid: &Grid<f64>, field: &ndarray::Array3<f64>) -> color_eyre::Result<Xyzv<f64>> {
    let indexer = grid.indexer();
    let sites: Vec<usize> = (0..grid.number_of_points()).collect();
    let values = sites
        .iter()
        .map(|&s| {
            let point = indexer.decode(s);
            field[[point.x, point.y, point.z]]
        })
        .collect();
    Ok(Xyzv::new(grid, &sites, Values::PerSite(values))?)
}

pub(crate) fn energy(path: &Path, config: &Configuration) -> color_eyre::Result<()> {
    let checkpoint = Checkpoint::from_path(path)?;
    let grid = grid_from_checkpoint(&checkpoint, config.lattice.spacing)?;
    let terms = interaction_energies(&checkpoint, &grid, config.coulomb_prefactor())?;

    let mut term = console::Term::stdout();
    let mut total = 0.0;
    for (a, b, energy) in terms {
        writeln!(term, "{:>9} - {:<9}: {:.6e} eV", a, b, energy)?;
        total += energy;
    }
    writeln!(term, "{}", console::style(format!("total: {:.6e} eV", total)).bold())?;
    Ok(())
}

/// The Coulomb energy of every pair of charged species, in eV
///
/// Like species interact through each of their unique pairs, unlike species through the full
/// cross product. Species with no charge, and so traps, are left out.
pub(crate) fn interaction_energies(
    checkpoint: &Checkpoint,
    grid: &Grid<f64>,
    prefactor: f64,
) -> color_eyre::Result<Vec<(Species, Species, f64)>> {
    let mesh = grid.interaction_mesh();
    let mut charged = Vec::new();
    for species in [Species::Electrons, Species::Holes, Species::Defects] {
        let charge = checkpoint.charge(species)?;
        if charge != 0.0 {
            charged.push((species, charge, lattice_points(checkpoint, grid, species)?));
        }
    }

    let mut terms = Vec::new();
    for (n, (a, charge_a, sites_a)) in charged.iter().enumerate() {
        terms.push((
            *a,
            *a,
            mesh.pair_energy(sites_a, charge_a * charge_a * prefactor),
        ));
        for (b, charge_b, sites_b) in charged.iter().skip(n + 1) {
            let energy = mesh.coulomb(sites_a, sites_b, charge_a * charge_b * prefactor).sum();
            terms.push((*a, *b, energy));
        }
    }
    Ok(terms)
}

fn open_output(
    output: Option<&Path>,
    config: &Configuration,
) -> color_eyre::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let path = config.output.directory.join(path);
            tracing::info!("Writing to {}", path.display());
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(console::Term::stdout()),
    })
}
