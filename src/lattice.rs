//! # Lattice
//!
//! Builds the geometry a checkpoint was written on from its `grid.*` parameters

use crate::checkpoint::{Checkpoint, Species};
use crate::error::CheckpointError;
use hopper_mesher::{Grid, LatticePoint, Values, Xyzv};
use nalgebra::{Point3, Vector3};

/// The grid sampled by the checkpoint's lattice, with its first site at the origin and
/// neighbouring sites `spacing` apart
pub fn grid_from_checkpoint(
    checkpoint: &Checkpoint,
    spacing: f64,
) -> Result<Grid<f64>, CheckpointError> {
    let shape = checkpoint.grid_shape()?;
    tracing::debug!("Lattice of {:?} sites with spacing {}", shape, spacing);
    Ok(Grid::from_spacing(
        Point3::origin(),
        Vector3::repeat(spacing),
        shape,
    )?)
}

/// The lattice coordinates of every particle of `species`
pub fn lattice_points(
    checkpoint: &Checkpoint,
    grid: &Grid<f64>,
    species: Species,
) -> Result<Vec<LatticePoint>, CheckpointError> {
    let sites = checkpoint.sites(species);
    check_sites(species, sites, grid.number_of_points())?;
    Ok(grid.indexer().decode_all(sites))
}

/// The particles of `species` scattered onto `grid`
///
/// Traps carry their energies, every other species carries its charge.
pub fn species_values(
    checkpoint: &Checkpoint,
    grid: &Grid<f64>,
    species: Species,
) -> Result<Xyzv<f64>, CheckpointError> {
    let sites = checkpoint.sites(species);
    check_sites(species, sites, grid.number_of_points())?;
    let values = match species {
        Species::Traps => Values::PerSite(checkpoint.trap_energies()?),
        _ => Values::Uniform(checkpoint.charge(species)?),
    };
    Ok(Xyzv::new(grid, sites, values)?)
}

fn check_sites(species: Species, sites: &[usize], volume: usize) -> Result<(), CheckpointError> {
    match sites.iter().find(|&&site| site >= volume) {
        Some(&site) => Err(CheckpointError::SiteOutOfRange {
            species,
            site,
            volume,
        }),
        None => Ok(()),
    }
}
