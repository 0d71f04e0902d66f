//! Lattice geometry for post-processing hopping transport simulations.
//!
//! The simulator works on a regular cubic lattice and only ever stores flat site
//! indices. This crate provides the pieces needed to turn those indices back into
//! geometry:
//!
//! - [`IndexMapper`] converts between flat site indices and lattice coordinates,
//! - [`Grid`] describes the real-space box sampled by the lattice,
//! - [`InteractionMesh`] precomputes a distance table indexed by coordinate delta,
//!   so pairwise distances and Coulomb potentials become table lookups,
//! - [`Xyzv`] scatters sparse per-site values onto the dense grid for export.

mod error;
mod generate;
mod grid;
mod indexer;
mod mesh;
mod primitives;
mod xyzv;

pub use error::MesherError;
pub use grid::*;
pub use indexer::IndexMapper;
pub use mesh::InteractionMesh;
pub use primitives::*;
pub use xyzv::{Values, Xyzv};

use nalgebra::RealField;
use num_traits::ToPrimitive;

/// A composite trait for the scalar type of a grid
///
/// Coordinates, distances and potentials are all stored in the same field, which
/// must be castable to and from the integer lattice
pub trait MeshScalar: Copy + RealField + ToPrimitive {}

impl<T> MeshScalar for T where T: Copy + RealField + ToPrimitive {}

/// Cast a lattice count into the grid scalar
pub(crate) fn cast<T: MeshScalar>(value: usize) -> T {
    T::from_usize(value).expect("Must be able to fit usize in T")
}
