// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! Errors raised by the parameter and checkpoint stores

use crate::checkpoint::{Field, Species};
use crate::parameters::Kind;
use miette::Diagnostic;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Errors raised while reading or mutating a parameter set
pub enum ParameterError {
    #[error("unknown parameter `{0}`")]
    #[diagnostic(code(hopper::parameters::unknown_key))]
    UnknownKey(String),
    #[error("expected a `key = value` line, found `{0}`")]
    #[diagnostic(code(hopper::parameters::malformed))]
    Malformed(String),
    #[error("parameter `{key}` expects {expected}, found {found}")]
    #[diagnostic(code(hopper::parameters::type_mismatch))]
    Type {
        key: String,
        expected: Kind,
        found: Kind,
    },
    #[error("parameter `{key}` expects {expected}, could not parse `{value}`")]
    #[diagnostic(code(hopper::parameters::parse))]
    Parse {
        key: String,
        expected: Kind,
        value: String,
    },
    #[error("parameter `{key}` cannot be written as a quoted string: {value:?}")]
    #[diagnostic(code(hopper::parameters::unquotable))]
    Unquotable { key: String, value: String },
    #[error(transparent)]
    #[diagnostic(code(hopper::io_error))]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Errors raised while loading, saving or normalising a checkpoint
pub enum CheckpointError {
    #[error(transparent)]
    #[diagnostic(code(hopper::io_error))]
    Io(#[from] std::io::Error),
    #[error("I/O error at path '{path}': {source}")]
    #[diagnostic(code(hopper::io_error))]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mesher(#[from] hopper_mesher::MesherError),
    #[error("line {line}: `{content}` is outside of any section")]
    #[diagnostic(code(hopper::checkpoint::orphan_line))]
    Orphan { line: usize, content: String },
    #[error("line {line}: unknown section header `{header}`")]
    #[diagnostic(code(hopper::checkpoint::unknown_section))]
    UnknownSection { line: usize, header: String },
    #[error("line {line}: could not read `{content}` in section {field}")]
    #[diagnostic(code(hopper::checkpoint::value))]
    Value {
        line: usize,
        field: Field,
        content: String,
    },
    #[error("section {field} declares {expected} entries but only {found} were read")]
    #[diagnostic(code(hopper::checkpoint::truncated))]
    Truncated {
        field: Field,
        expected: usize,
        found: usize,
    },
    #[error("{potentials} trap potentials were given for {traps} traps")]
    #[diagnostic(code(hopper::checkpoint::trap_potentials))]
    TrapPotentialCount { traps: usize, potentials: usize },
    #[error("a lattice of {shape:?} sites is too large to index")]
    #[diagnostic(code(hopper::checkpoint::volume))]
    Volume { shape: [usize; 3] },
    #[error("{traps} traps do not fit on a lattice of {volume} sites")]
    #[diagnostic(code(hopper::checkpoint::too_many_traps))]
    TooManyTraps { traps: usize, volume: usize },
    #[error("parameter `{key}` = {value} is not a valid lattice dimension")]
    #[diagnostic(code(hopper::checkpoint::dimension))]
    Dimension { key: &'static str, value: i64 },
    #[error("{species} site {site} lies outside a lattice of {volume} sites")]
    #[diagnostic(code(hopper::checkpoint::site_out_of_range))]
    SiteOutOfRange {
        species: Species,
        site: usize,
        volume: usize,
    },
    #[error("field {field} holds {expected}")]
    #[diagnostic(code(hopper::checkpoint::field_type))]
    FieldType { field: Field, expected: &'static str },
}
