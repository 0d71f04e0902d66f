/// This module governs the command line interface to checkpoint files
mod calculations;
mod configuration;
mod telemetry;

pub(crate) use configuration::Configuration;

use crate::checkpoint::Species;
use clap::{ArgEnum, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    #[clap(arg_enum, short, long, global = true, default_value = "info")]
    log_level: LogLevel,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", level)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the size of every section and the lattice a checkpoint was written on
    Inspect { checkpoint: PathBuf },
    /// Turn a checkpoint into a fresh starting state
    Reset {
        input: PathBuf,
        output: PathBuf,
        #[clap(long)]
        keep_electrons: bool,
        #[clap(long)]
        keep_holes: bool,
        /// Fill in every unset parameter with its default
        #[clap(long)]
        fill_defaults: bool,
        /// Switch off every optional output of the simulator
        #[clap(long)]
        quiet_output: bool,
    },
    /// Validate the traps and bring the trap parameters in line with them
    FixTraps { input: PathBuf, output: PathBuf },
    /// Write a checkpoint holding only the default parameters
    Defaults {
        output: PathBuf,
        /// A file of `key = value` lines applied over the defaults
        #[clap(short, long)]
        parameters: Option<PathBuf>,
    },
    /// Write the position and value of every particle of a species
    Export {
        checkpoint: PathBuf,
        #[clap(arg_enum, short, long)]
        species: SpeciesArg,
        /// Relative paths are placed in the output directory, stdout is used if absent
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the Coulomb potential of a species at every lattice site
    Potential {
        checkpoint: PathBuf,
        #[clap(arg_enum, short, long)]
        species: SpeciesArg,
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the Coulomb interaction energy of the charged particles
    Energy { checkpoint: PathBuf },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum SpeciesArg {
    Electrons,
    Holes,
    Defects,
    Traps,
}

impl From<SpeciesArg> for Species {
    fn from(species: SpeciesArg) -> Self {
        match species {
            SpeciesArg::Electrons => Species::Electrons,
            SpeciesArg::Holes => Species::Holes,
            SpeciesArg::Defects => Species::Defects,
            SpeciesArg::Traps => Species::Traps,
        }
    }
}

pub fn run() -> color_eyre::Result<()> {
    let cli = App::parse();

    let config = Configuration::build()?;
    std::fs::create_dir_all(&config.output.directory)?;

    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, &config.output.directory);
    telemetry::init_subscriber(subscriber)?;
    tracing::debug!("{:?}", config);

    match cli.command {
        Command::Inspect { checkpoint } => calculations::inspect(&checkpoint, &config),
        Command::Reset {
            input,
            output,
            keep_electrons,
            keep_holes,
            fill_defaults,
            quiet_output,
        } => calculations::reset(
            &input,
            &output,
            calculations::ResetOptions {
                keep_electrons,
                keep_holes,
                fill_defaults,
                quiet_output,
            },
        ),
        Command::FixTraps { input, output } => calculations::fix_traps(&input, &output),
        Command::Defaults { output, parameters } => {
            calculations::defaults(&output, parameters.as_deref())
        }
        Command::Export {
            checkpoint,
            species,
            output,
        } => calculations::export(&checkpoint, species.into(), output.as_deref(), &config),
        Command::Potential {
            checkpoint,
            species,
            output,
        } => calculations::potential(&checkpoint, species.into(), output.as_deref(), &config),
        Command::Energy { checkpoint } => calculations::energy(&checkpoint, &config),
    }
}

#[cfg(test)]
mod test {
    use super::{App, Command, LogLevel};
    use clap::Parser;

    #[test]
    fn log_level_is_global() {
        let cli = App::try_parse_from(["hopper", "energy", "run.chk", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_level.to_string(), "debug");
        assert!(matches!(cli.command, Command::Energy { .. }));
    }

    #[test]
    fn reset_flags_default_to_off() {
        let cli = App::try_parse_from(["hopper", "reset", "in.chk", "out.chk", "--keep-holes"])
            .unwrap();
        match cli.command {
            Command::Reset {
                keep_electrons,
                keep_holes,
                fill_defaults,
                quiet_output,
                ..
            } => {
                assert!(!keep_electrons);
                assert!(keep_holes);
                assert!(!fill_defaults);
                assert!(!quiet_output);
            }
            _ => panic!("parsed the wrong subcommand"),
        }
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn defaults_take_an_optional_parameter_file() {
        let cli = App::try_parse_from(["hopper", "defaults", "out.chk", "-p", "run.par"]).unwrap();
        match cli.command {
            Command::Defaults { parameters, .. } => {
                assert_eq!(parameters.unwrap().to_str(), Some("run.par"))
            }
            _ => panic!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn species_is_required_for_export() {
        assert!(App::try_parse_from(["hopper", "export", "run.chk"]).is_err());
        assert!(App::try_parse_from(["hopper", "export", "run.chk", "-s", "traps"]).is_ok());
    }
}
