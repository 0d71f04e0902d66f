//! The sectioned text format of checkpoint files
//!
//! ```text
//! [Electrons]
//! 2
//! 15
//! 1021
//! [RandomState]
//! 5489 1301868182 2938499221
//! [Parameters]
//! grid.x = 128
//! ```
//!
//! List sections hold a count followed by one value per line, except the random state which
//! is a single line. Files whose name ends in `.gz` are gzip compressed.

use super::{Checkpoint, Field, Section};
use crate::error::CheckpointError;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where the reader is within a file
#[derive(Copy, Clone, Debug)]
enum ReadState {
    /// Between sections, only a header may follow
    Idle,
    /// Expecting the entry count of a list section
    Count(Field),
    /// Reading the entries of a list section
    Entries {
        field: Field,
        expected: usize,
        remaining: usize,
    },
    /// Expecting the single line of random state
    RandomState,
    Parameters,
}

impl ReadState {
    /// Fail if a list section was left before all its entries were read
    fn finish(self) -> Result<(), CheckpointError> {
        match self {
            ReadState::Count(field) => Err(CheckpointError::Truncated {
                field,
                expected: 1,
                found: 0,
            }),
            ReadState::Entries {
                field,
                expected,
                remaining,
            } if remaining > 0 => Err(CheckpointError::Truncated {
                field,
                expected,
                found: expected - remaining,
            }),
            _ => Ok(()),
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map_or(false, |extension| extension == "gz")
}

impl Checkpoint {
    /// Read a checkpoint file, decompressing it if the name ends in `.gz`
    #[tracing::instrument(level = "debug")]
    pub fn from_path(path: &Path) -> Result<Self, CheckpointError> {
        let file = File::open(path).map_err(|source| CheckpointError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let reader: Box<dyn BufRead> = if is_gzip(path) {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        let mut checkpoint = Self::new();
        checkpoint.load(reader)?;
        tracing::debug!("Loaded {:?}", checkpoint.summary());
        Ok(checkpoint)
    }

    /// Write a checkpoint file, compressing it if the name ends in `.gz`
    ///
    /// The checkpoint is written to a temporary file beside `path` which is then renamed over
    /// it, so an interrupted save never leaves a truncated checkpoint behind.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn save_path(&self, path: &Path) -> Result<(), CheckpointError> {
        let partial = partial_path(path);
        let result = self
            .write_partial(&partial, is_gzip(path))
            .and_then(|_| {
                std::fs::rename(&partial, path).map_err(|source| CheckpointError::File {
                    path: path.to_path_buf(),
                    source,
                })
            });
        if result.is_err() && partial.exists() {
            if let Err(error) = std::fs::remove_file(&partial) {
                tracing::warn!("Could not remove {}: {}", partial.display(), error);
            }
        }
        result
    }

    fn write_partial(&self, partial: &Path, compress: bool) -> Result<(), CheckpointError> {
        let to_file_error = |source| CheckpointError::File {
            path: partial.to_path_buf(),
            source,
        };

        let file = File::create(partial).map_err(to_file_error)?;
        let mut writer = BufWriter::new(file);
        if compress {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            self.save(&mut encoder)?;
            writer = encoder.finish().map_err(to_file_error)?;
        } else {
            self.save(&mut writer)?;
        }
        writer.flush().map_err(to_file_error)
    }

    /// Replace the contents of this checkpoint with those read from `reader`
    ///
    /// Sections may come in any order. Blank lines are ignored.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<(), CheckpointError> {
        self.clear();
        let mut state = ReadState::Idle;

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let number = n + 1;
            let content = line.trim();
            if content.is_empty() {
                continue;
            }

            if content.starts_with('[') {
                let section = Section::from_header(content).ok_or_else(|| {
                    CheckpointError::UnknownSection {
                        line: number,
                        header: content.to_owned(),
                    }
                })?;
                state.finish()?;
                tracing::trace!("Reading section {:?} from line {}", section, number);
                state = match section {
                    Section::List(Field::RandomState) => ReadState::RandomState,
                    Section::List(field) => ReadState::Count(field),
                    Section::Parameters => ReadState::Parameters,
                };
                continue;
            }

            state = match state {
                ReadState::Idle => {
                    return Err(CheckpointError::Orphan {
                        line: number,
                        content: content.to_owned(),
                    })
                }
                ReadState::Count(field) => {
                    let expected: usize = content.parse().map_err(|_| CheckpointError::Value {
                        line: number,
                        field,
                        content: content.to_owned(),
                    })?;
                    match expected {
                        0 => ReadState::Idle,
                        _ => ReadState::Entries {
                            field,
                            expected,
                            remaining: expected,
                        },
                    }
                }
                ReadState::Entries {
                    field,
                    expected,
                    remaining,
                } => {
                    self.push_entry(field, content)
                        .map_err(|_| CheckpointError::Value {
                            line: number,
                            field,
                            content: content.to_owned(),
                        })?;
                    match remaining - 1 {
                        0 => ReadState::Idle,
                        remaining => ReadState::Entries {
                            field,
                            expected,
                            remaining,
                        },
                    }
                }
                ReadState::RandomState => {
                    self.random_state = content
                        .split_whitespace()
                        .map(str::parse)
                        .collect::<Result<_, _>>()
                        .map_err(|_| CheckpointError::Value {
                            line: number,
                            field: Field::RandomState,
                            content: content.to_owned(),
                        })?;
                    ReadState::Idle
                }
                ReadState::Parameters => {
                    self.parameters.load_line(content)?;
                    ReadState::Parameters
                }
            };
        }

        state.finish()
    }

    fn push_entry(&mut self, field: Field, content: &str) -> Result<(), ()> {
        match field {
            Field::Electrons => self.electrons.push(content.parse().map_err(drop)?),
            Field::Holes => self.holes.push(content.parse().map_err(drop)?),
            Field::Defects => self.defects.push(content.parse().map_err(drop)?),
            Field::Traps => self.traps.push(content.parse().map_err(drop)?),
            Field::TrapPotentials => self.trap_potentials.push(content.parse().map_err(drop)?),
            Field::FluxState => self.flux_state.push(content.parse().map_err(drop)?),
            Field::RandomState => self.random_state.push(content.parse().map_err(drop)?),
        }
        Ok(())
    }

    /// Write every non-empty section in canonical order, followed by the parameters
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), CheckpointError> {
        write_sites(writer, Field::Electrons, &self.electrons)?;
        write_sites(writer, Field::Holes, &self.holes)?;
        write_sites(writer, Field::Defects, &self.defects)?;
        write_sites(writer, Field::Traps, &self.traps)?;
        write_sites(writer, Field::TrapPotentials, &self.trap_potentials)?;
        write_sites(writer, Field::FluxState, &self.flux_state)?;
        if !self.random_state.is_empty() {
            writeln!(writer, "{}", Field::RandomState.header())?;
            writeln!(writer, "{}", self.random_state.iter().join(" "))?;
        }
        if !self.parameters.is_empty() {
            writeln!(writer, "{}", Section::PARAMETERS_HEADER)?;
            self.parameters.save(writer)?;
        }
        Ok(())
    }
}

fn write_sites<W: Write, T: std::fmt::Display>(
    writer: &mut W,
    field: Field,
    values: &[T],
) -> std::io::Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{}", field.header())?;
    writeln!(writer, "{}", values.len())?;
    for value in values {
        writeln!(writer, "{}", value)?;
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

impl std::str::FromStr for Checkpoint {
    type Err = CheckpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut checkpoint = Self::new();
        checkpoint.load(s.as_bytes())?;
        Ok(checkpoint)
    }
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut buffer = Vec::new();
        self.save(&mut buffer).map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buffer))
    }
}
