// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Hopper is a state toolkit for kinetic Monte Carlo hopping transport simulations
//!
//! # Overview
//! A hopping simulation places electrons, holes, charged defects and traps on the sites of a
//! regular cubic lattice, and periodically writes its full mutable state to a checkpoint file.
//! Hopper reads, edits and writes those checkpoints, and maps the particles they hold back onto
//! real-space geometry so that their Coulomb potentials and interaction energies can be computed.
//!
//! # Usage
//! Hopper is distributed with a binary, `hopper`, which operates on checkpoint files:
//!
//! ```text
//! hopper inspect run.chk
//! hopper fix-traps run.chk fixed.chk.gz
//! hopper potential fixed.chk.gz --species electrons --output potential.xyzv
//! ```
//!
//! Files whose name ends in `.gz` are read and written gzip compressed. Lattice spacing, the
//! dielectric environment and the output directory are read from `.config/default.toml`.

#![allow(clippy::new_without_default)]

/// The command line application, configuration and tracing
pub mod app;

/// The checkpoint store and its file format
pub mod checkpoint;

/// Physical constants
pub mod constants;

/// Error handling
mod error;

/// Lattice geometry of a checkpoint
pub mod lattice;

/// The typed parameter schema and store
pub mod parameters;

pub use error::{CheckpointError, ParameterError};
