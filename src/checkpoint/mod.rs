//! # Checkpoint
//! A snapshot of the full mutable state of a simulation
//!
//! The simulator periodically dumps carrier positions, trap energetics, the state of its
//! random number generator and flux counters, and its parameters. Positions are stored as
//! flat site indices, see [`hopper_mesher::IndexMapper`]. The random and flux state are
//! opaque to this crate and are carried through untouched.

mod fields;
mod format;

pub use fields::{Field, FieldData, FieldValue, Item, Key, Section, Species};

use crate::{constants::TRAP_PERCENTAGE_BIAS, error::CheckpointError, parameters::Parameters};
use crate::parameters::Value;
use crate::error::ParameterError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Checkpoint {
    pub electrons: Vec<usize>,
    pub holes: Vec<usize>,
    pub defects: Vec<usize>,
    pub traps: Vec<usize>,
    /// Either empty, in which case every trap has the `trap.potential` parameter, or one
    /// energy per entry of `traps`
    pub trap_potentials: Vec<f64>,
    pub flux_state: Vec<i64>,
    pub random_state: Vec<i64>,
    pub parameters: Parameters,
}

/// The number of entries in each part of a checkpoint
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub electrons: usize,
    pub holes: usize,
    pub defects: usize,
    pub traps: usize,
    pub trap_potentials: usize,
    pub flux_state: usize,
    pub random_state: usize,
    pub parameters: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "electrons       : {}", self.electrons)?;
        writeln!(f, "holes           : {}", self.holes)?;
        writeln!(f, "defects         : {}", self.defects)?;
        writeln!(f, "traps           : {}", self.traps)?;
        writeln!(f, "trap potentials : {}", self.trap_potentials)?;
        writeln!(f, "flux state      : {}", self.flux_state)?;
        writeln!(f, "random state    : {}", self.random_state)?;
        write!(f, "parameters      : {}", self.parameters)
    }
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every list and the parameter set
    pub fn clear(&mut self) {
        self.electrons.clear();
        self.holes.clear();
        self.defects.clear();
        self.traps.clear();
        self.trap_potentials.clear();
        self.flux_state.clear();
        self.random_state.clear();
        self.parameters.clear();
    }

    /// Turn a snapshot back into a fresh starting state
    ///
    /// The step counter and seed are zeroed and the random and flux state are dropped, so the
    /// simulator reseeds on start. Carriers are removed unless asked to keep them.
    pub fn reset(&mut self, keep_electrons: bool, keep_holes: bool) -> Result<(), CheckpointError> {
        self.parameters.set("current.step", 0)?;
        self.parameters.set("random.seed", 0)?;
        self.random_state.clear();
        self.flux_state.clear();
        if !keep_electrons {
            self.electrons.clear();
        }
        if !keep_holes {
            self.holes.clear();
        }
        Ok(())
    }

    /// The lattice dimensions `[grid.x, grid.y, grid.z]`
    ///
    /// A missing dimension is taken to be 1.
    pub fn grid_shape(&self) -> Result<[usize; 3], CheckpointError> {
        let mut shape = [1; 3];
        for (n, key) in ["grid.x", "grid.y", "grid.z"].into_iter().enumerate() {
            match self.parameters.get_int(key)? {
                Some(value) => {
                    shape[n] = match usize::try_from(value) {
                        Ok(dimension) if dimension > 0 => dimension,
                        _ => return Err(CheckpointError::Dimension { key, value }),
                    }
                }
                None => tracing::warn!("{} is not set, assuming a single site", key),
            }
        }
        if shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n)).is_none() {
            return Err(CheckpointError::Volume { shape });
        }
        Ok(shape)
    }

    /// The number of sites on the lattice, `grid.x * grid.y * grid.z`
    pub fn grid_volume(&self) -> Result<usize, CheckpointError> {
        Ok(self.grid_shape()?.iter().product())
    }

    /// Validate the traps and bring their parameters in line with them
    ///
    /// A per-site potential list holding a single repeated energy is folded into the
    /// `trap.potential` parameter. Any other list is kept, and `trap.potential` is zeroed to
    /// mark that the list is authoritative. The trap percentage is then recomputed from the
    /// number of traps and seeding is switched off.
    pub fn fix_traps(&mut self) -> Result<(), CheckpointError> {
        if !self.trap_potentials.is_empty() {
            if self.trap_potentials.len() != self.traps.len() {
                return Err(CheckpointError::TrapPotentialCount {
                    traps: self.traps.len(),
                    potentials: self.trap_potentials.len(),
                });
            }
            let first = self.trap_potentials[0];
            if self.trap_potentials.iter().all(|&potential| potential == first) {
                tracing::debug!("Collapsing uniform trap potentials to {}", first);
                self.parameters.set("trap.potential", first)?;
                self.trap_potentials.clear();
            } else {
                self.parameters.set("trap.potential", 0.0)?;
            }
        }

        let volume = self.grid_volume()?;
        if self.traps.len() > volume {
            return Err(CheckpointError::TooManyTraps {
                traps: self.traps.len(),
                volume,
            });
        }

        let percentage = (self.traps.len() as f64 + TRAP_PERCENTAGE_BIAS) / volume as f64;
        self.parameters.set("trap.percentage", percentage)?;
        self.parameters.set("seed.percentage", 0.0)?;
        Ok(())
    }

    /// The energy of every trap, from the per-site list if present or else the
    /// `trap.potential` parameter
    pub fn trap_energies(&self) -> Result<Vec<f64>, CheckpointError> {
        if !self.trap_potentials.is_empty() {
            return Ok(self.trap_potentials.clone());
        }
        let potential = self.parameters.float_or_default("trap.potential")?;
        Ok(vec![potential; self.traps.len()])
    }

    pub fn sites(&self, species: Species) -> &[usize] {
        match species {
            Species::Electrons => &self.electrons,
            Species::Holes => &self.holes,
            Species::Defects => &self.defects,
            Species::Traps => &self.traps,
        }
    }

    /// The charge of one particle of `species` in units of the elementary charge
    pub fn charge(&self, species: Species) -> Result<f64, CheckpointError> {
        Ok(match species {
            Species::Electrons => -1.0,
            Species::Holes => 1.0,
            Species::Defects => self.parameters.float_or_default("defects.charge")?,
            Species::Traps => 0.0,
        })
    }

    pub fn get_field(&self, field: Field) -> FieldData<'_> {
        match field {
            Field::Electrons => FieldData::Sites(&self.electrons),
            Field::Holes => FieldData::Sites(&self.holes),
            Field::Defects => FieldData::Sites(&self.defects),
            Field::Traps => FieldData::Sites(&self.traps),
            Field::TrapPotentials => FieldData::Energies(&self.trap_potentials),
            Field::FluxState => FieldData::State(&self.flux_state),
            Field::RandomState => FieldData::State(&self.random_state),
        }
    }

    /// Replace a list field, which must be given data of its own type
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), CheckpointError> {
        match (field, value) {
            (Field::Electrons, FieldValue::Sites(sites)) => self.electrons = sites,
            (Field::Holes, FieldValue::Sites(sites)) => self.holes = sites,
            (Field::Defects, FieldValue::Sites(sites)) => self.defects = sites,
            (Field::Traps, FieldValue::Sites(sites)) => self.traps = sites,
            (Field::TrapPotentials, FieldValue::Energies(energies)) => {
                self.trap_potentials = energies
            }
            (Field::FluxState, FieldValue::State(state)) => self.flux_state = state,
            (Field::RandomState, FieldValue::State(state)) => self.random_state = state,
            (field, _) => {
                let expected = match field {
                    Field::TrapPotentials => "energies",
                    Field::FluxState | Field::RandomState => "integer state",
                    _ => "site indices",
                };
                return Err(CheckpointError::FieldType { field, expected });
            }
        }
        Ok(())
    }

    pub fn get_parameter(&self, key: &str) -> Result<Option<&Value>, ParameterError> {
        self.parameters.get(key)
    }

    pub fn set_parameter(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ParameterError> {
        self.parameters.set(key, value)
    }

    /// Look up a field or parameter by name
    pub fn get(&self, name: &str) -> Result<Item<'_>, CheckpointError> {
        Ok(match name.parse::<Key>()? {
            Key::Field(field) => Item::Field(self.get_field(field)),
            Key::Parameter(entry) => Item::Parameter(self.parameters.get(entry.name)?),
        })
    }

    pub fn summary(&self) -> Summary {
        Summary {
            electrons: self.electrons.len(),
            holes: self.holes.len(),
            defects: self.defects.len(),
            traps: self.traps.len(),
            trap_potentials: self.trap_potentials.len(),
            flux_state: self.flux_state.len(),
            random_state: self.random_state.len(),
            parameters: self.parameters.len(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Checkpoint, Field, FieldData, FieldValue, Item, Species};
    use crate::error::CheckpointError;
    use crate::parameters::Value;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn cube_of_volume_ten() -> Checkpoint {
        let mut checkpoint = Checkpoint::new();
        checkpoint.parameters.set("grid.x", 10).unwrap();
        checkpoint.parameters.set("grid.y", 1).unwrap();
        checkpoint.parameters.set("grid.z", 1).unwrap();
        checkpoint
    }

    #[test]
    fn uniform_trap_potentials_collapse_into_the_parameter() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.traps = vec![1, 2, 3];
        checkpoint.trap_potentials = vec![0.5, 0.5, 0.5];
        checkpoint.fix_traps().unwrap();

        assert!(checkpoint.trap_potentials.is_empty());
        assert_eq!(
            checkpoint.parameters.get_float("trap.potential").unwrap(),
            Some(0.5)
        );
        assert_relative_eq!(
            checkpoint.parameters.get_float("trap.percentage").unwrap().unwrap(),
            (3.0 + 0.25) / 10.0
        );
        assert_relative_eq!(
            checkpoint.parameters.get_float("trap.percentage").unwrap().unwrap(),
            0.325
        );
        assert_eq!(
            checkpoint.parameters.get_float("seed.percentage").unwrap(),
            Some(0.0)
        );
    }

    #[test]
    fn varied_trap_potentials_are_kept() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.traps = vec![4, 5];
        checkpoint.trap_potentials = vec![0.1, 0.2];
        checkpoint.fix_traps().unwrap();
        assert_eq!(checkpoint.trap_potentials, vec![0.1, 0.2]);
        assert_eq!(
            checkpoint.parameters.get_float("trap.potential").unwrap(),
            Some(0.0)
        );
        assert_eq!(checkpoint.trap_energies().unwrap(), vec![0.1, 0.2]);
    }

    #[test]
    fn more_traps_than_sites_is_an_error() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.traps = (0..11).collect();
        assert!(matches!(
            checkpoint.fix_traps(),
            Err(CheckpointError::TooManyTraps {
                traps: 11,
                volume: 10
            })
        ));
    }

    #[test]
    fn trap_potentials_must_match_traps() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.traps = vec![1, 2, 3];
        checkpoint.trap_potentials = vec![0.5, 0.5];
        assert!(matches!(
            checkpoint.fix_traps(),
            Err(CheckpointError::TrapPotentialCount {
                traps: 3,
                potentials: 2
            })
        ));
    }

    #[test]
    fn missing_grid_dimensions_default_to_one() {
        let mut checkpoint = Checkpoint::new();
        checkpoint.parameters.set("grid.x", 4).unwrap();
        assert_eq!(checkpoint.grid_shape().unwrap(), [4, 1, 1]);
        checkpoint.traps = vec![0, 1];
        checkpoint.fix_traps().unwrap();
        assert_relative_eq!(
            checkpoint.parameters.get_float("trap.percentage").unwrap().unwrap(),
            2.25 / 4.0
        );
        assert_eq!(checkpoint.trap_energies().unwrap(), vec![0.1, 0.1]);
    }

    #[test]
    fn negative_grid_dimensions_are_rejected() {
        let mut checkpoint = Checkpoint::new();
        checkpoint.parameters.set("grid.y", -2).unwrap();
        assert!(matches!(
            checkpoint.grid_shape(),
            Err(CheckpointError::Dimension { key: "grid.y", value: -2 })
        ));
    }

    #[test]
    fn lattices_too_large_to_index_are_rejected() {
        let mut checkpoint = Checkpoint::new();
        for key in ["grid.x", "grid.y", "grid.z"] {
            checkpoint.parameters.set(key, 10_000_000).unwrap();
        }
        checkpoint.traps = vec![0];
        assert!(matches!(
            checkpoint.fix_traps(),
            Err(CheckpointError::Volume { .. })
        ));
        assert!(checkpoint.grid_shape().is_err());
        assert_eq!(cube_of_volume_ten().grid_volume().unwrap(), 10);
    }

    #[test]
    fn reset_drops_simulator_state_and_optionally_carriers() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.electrons = vec![1, 2];
        checkpoint.holes = vec![3];
        checkpoint.traps = vec![4];
        checkpoint.flux_state = vec![1, 2, 3];
        checkpoint.random_state = vec![9, 9];
        checkpoint.parameters.set("current.step", 500).unwrap();
        checkpoint.parameters.set("random.seed", 42).unwrap();

        let mut kept = checkpoint.clone();
        kept.reset(true, false).unwrap();
        assert_eq!(kept.electrons, vec![1, 2]);
        assert!(kept.holes.is_empty());
        assert_eq!(kept.traps, vec![4]);
        assert!(kept.flux_state.is_empty());
        assert!(kept.random_state.is_empty());
        assert_eq!(kept.parameters.get_int("current.step").unwrap(), Some(0));
        assert_eq!(kept.parameters.get_int("random.seed").unwrap(), Some(0));

        checkpoint.reset(false, false).unwrap();
        assert!(checkpoint.electrons.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.electrons = vec![1];
        checkpoint.random_state = vec![1];
        checkpoint.clear();
        assert_eq!(checkpoint, Checkpoint::new());
    }

    #[test]
    fn lookups_reach_fields_and_parameters() {
        let mut checkpoint = cube_of_volume_ten();
        checkpoint.holes = vec![7, 8];
        assert_eq!(
            checkpoint.get("holes").unwrap(),
            Item::Field(FieldData::Sites(&[7, 8]))
        );
        assert_eq!(
            checkpoint.get("grid.x").unwrap(),
            Item::Parameter(Some(&Value::Int(10)))
        );
        assert_eq!(
            checkpoint.get("trap.potential").unwrap(),
            Item::Parameter(None)
        );
        assert!(checkpoint.get("positrons").is_err());
    }

    #[test]
    fn set_field_checks_the_data_type() {
        let mut checkpoint = Checkpoint::new();
        checkpoint
            .set_field(Field::Electrons, FieldValue::Sites(vec![0, 5, 10]))
            .unwrap();
        assert_eq!(checkpoint.electrons, vec![0, 5, 10]);
        assert!(matches!(
            checkpoint.set_field(Field::TrapPotentials, FieldValue::Sites(vec![1])),
            Err(CheckpointError::FieldType { .. })
        ));
    }

    #[test]
    fn species_charges() {
        let mut checkpoint = Checkpoint::new();
        assert_eq!(checkpoint.charge(Species::Electrons).unwrap(), -1.0);
        assert_eq!(checkpoint.charge(Species::Holes).unwrap(), 1.0);
        assert_eq!(checkpoint.charge(Species::Defects).unwrap(), -1.0);
        checkpoint.parameters.set("defects.charge", 2).unwrap();
        assert_eq!(checkpoint.charge(Species::Defects).unwrap(), 2.0);
    }

    proptest! {
        #[test]
        fn fixed_traps_never_keep_a_uniform_list(
            traps in proptest::collection::vec(0usize..10, 1..10),
            potential in -1.0f64..1.0,
        ) {
            let mut checkpoint = cube_of_volume_ten();
            checkpoint.trap_potentials = vec![potential; traps.len()];
            checkpoint.traps = traps;
            checkpoint.fix_traps().unwrap();

            prop_assert!(checkpoint.trap_potentials.is_empty());
            prop_assert_eq!(
                checkpoint.parameters.get_float("trap.potential").unwrap(),
                Some(potential)
            );
            let energies = checkpoint.trap_energies().unwrap();
            prop_assert_eq!(energies.len(), checkpoint.traps.len());
            prop_assert!(energies.iter().all(|&energy| energy == potential));
        }
    }
}
