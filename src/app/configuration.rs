//! # Configuration
//!
//! Settings which describe the physical environment of a checkpoint rather than its contents.
//! Sources are layered, later ones overriding earlier ones:
//! 1. built-in defaults,
//! 2. `.config/default.toml`,
//! 3. `.config/{RUN_MODE}.toml`, with `RUN_MODE` defaulting to `development`,
//! 4. environment variables prefixed `HOPPER__`, for example `HOPPER__LATTICE__SPACING=1.5`.

use color_eyre::eyre::eyre;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub(crate) struct Configuration {
    pub(crate) lattice: LatticeConfiguration,
    pub(crate) coulomb: CoulombConfiguration,
    pub(crate) output: OutputConfiguration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatticeConfiguration {
    /// Distance between neighbouring sites in nm
    pub(crate) spacing: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoulombConfiguration {
    pub(crate) relative_permittivity: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputConfiguration {
    /// Where the log file is written
    pub(crate) directory: PathBuf,
}

impl Configuration {
    pub(crate) fn build() -> color_eyre::Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            .add_source(File::with_name(".config/default").required(false))
            .add_source(File::with_name(&format!(".config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("HOPPER").separator("__"))
            .build()?;

        Self::deserialize_from(s)
    }

    fn defaults() -> color_eyre::Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("lattice.spacing", 1.0)?
            .set_default("coulomb.relative_permittivity", 3.5)?
            .set_default("output.directory", "results")?)
    }

    fn deserialize_from(s: Config) -> color_eyre::Result<Self> {
        let configuration: Self = s
            .try_deserialize()
            .map_err(|e| eyre!(format!("Failed to deserialize the config file: {:?}", e)))?;
        if configuration.lattice.spacing <= 0.0 {
            return Err(eyre!(
                "lattice.spacing must be positive, got {}",
                configuration.lattice.spacing
            ));
        }
        if configuration.coulomb.relative_permittivity <= 0.0 {
            return Err(eyre!(
                "coulomb.relative_permittivity must be positive, got {}",
                configuration.coulomb.relative_permittivity
            ));
        }
        Ok(configuration)
    }

    /// The potential in V of an elementary charge one nanometre away in this environment
    pub(crate) fn coulomb_prefactor(&self) -> f64 {
        crate::constants::coulomb_prefactor(self.coulomb.relative_permittivity)
    }
}

#[cfg(test)]
mod test {
    use super::Configuration;
    use approx::assert_relative_eq;
    use config::{File, FileFormat};

    #[test]
    fn defaults_fill_missing_settings() {
        let s = Configuration::defaults()
            .unwrap()
            .add_source(File::from_str(
                "[lattice]\nspacing = 1.8\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let configuration = Configuration::deserialize_from(s).unwrap();
        assert_relative_eq!(configuration.lattice.spacing, 1.8);
        assert_relative_eq!(configuration.coulomb.relative_permittivity, 3.5);
        assert_eq!(configuration.output.directory.to_str(), Some("results"));
        assert_relative_eq!(
            configuration.coulomb_prefactor(),
            1.439964 / 3.5,
            epsilon = 1e-5
        );
    }

    #[test]
    fn non_positive_spacings_are_rejected() {
        let s = Configuration::defaults()
            .unwrap()
            .add_source(File::from_str(
                "[lattice]\nspacing = 0.0\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();
        assert!(Configuration::deserialize_from(s).is_err());
    }
}
