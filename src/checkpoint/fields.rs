use crate::parameters::{schema, Entry, Value};
use crate::error::ParameterError;

/// The list fields of a checkpoint, in the order they are saved
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Electrons,
    Holes,
    Defects,
    Traps,
    TrapPotentials,
    FluxState,
    RandomState,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Electrons,
        Field::Holes,
        Field::Defects,
        Field::Traps,
        Field::TrapPotentials,
        Field::FluxState,
        Field::RandomState,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Field::Electrons => "[Electrons]",
            Field::Holes => "[Holes]",
            Field::Defects => "[Defects]",
            Field::Traps => "[Traps]",
            Field::TrapPotentials => "[TrapPotentials]",
            Field::FluxState => "[FluxState]",
            Field::RandomState => "[RandomState]",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Electrons => "electrons",
            Field::Holes => "holes",
            Field::Defects => "defects",
            Field::Traps => "traps",
            Field::TrapPotentials => "trap_potentials",
            Field::FluxState => "flux_state",
            Field::RandomState => "random_state",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// A section of the checkpoint file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Section {
    List(Field),
    Parameters,
}

impl Section {
    pub const PARAMETERS_HEADER: &'static str = "[Parameters]";

    /// The section introduced by `line`, which must match a header exactly
    pub fn from_header(line: &str) -> Option<Self> {
        if line == Self::PARAMETERS_HEADER {
            return Some(Section::Parameters);
        }
        Field::ALL
            .into_iter()
            .find(|field| field.header() == line)
            .map(Section::List)
    }
}

/// Anything that can be looked up on a checkpoint by name
///
/// Names are resolved against the checkpoint's own fields first, then against the parameter
/// schema.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Key {
    Field(Field),
    Parameter(&'static Entry),
}

impl std::str::FromStr for Key {
    type Err = ParameterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(field) = Field::from_name(name) {
            return Ok(Key::Field(field));
        }
        schema::lookup(name)
            .map(Key::Parameter)
            .ok_or_else(|| ParameterError::UnknownKey(name.to_owned()))
    }
}

/// A borrowed view of a list field
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldData<'a> {
    Sites(&'a [usize]),
    Energies(&'a [f64]),
    State(&'a [i64]),
}

impl FieldData<'_> {
    pub fn len(&self) -> usize {
        match self {
            FieldData::Sites(values) => values.len(),
            FieldData::Energies(values) => values.len(),
            FieldData::State(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An owned replacement for a list field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Sites(Vec<usize>),
    Energies(Vec<f64>),
    State(Vec<i64>),
}

/// The result of a lookup by [`Key`]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Item<'a> {
    Field(FieldData<'a>),
    Parameter(Option<&'a Value>),
}

/// The kinds of particle stored on the lattice
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Species {
    Electrons,
    Holes,
    Defects,
    Traps,
}

impl Species {
    pub fn field(&self) -> Field {
        match self {
            Species::Electrons => Field::Electrons,
            Species::Holes => Field::Holes,
            Species::Defects => Field::Defects,
            Species::Traps => Field::Traps,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.pad(self.field().name())
    }
}

#[cfg(test)]
mod test {
    use super::{Field, Key, Section};

    #[test]
    fn headers_must_match_exactly() {
        assert_eq!(
            Section::from_header("[TrapPotentials]"),
            Some(Section::List(Field::TrapPotentials))
        );
        assert_eq!(Section::from_header("[Parameters]"), Some(Section::Parameters));
        assert_eq!(Section::from_header("[electrons]"), None);
        assert_eq!(Section::from_header("[Electrons] "), None);
    }

    #[test]
    fn keys_resolve_fields_before_parameters() {
        assert_eq!("holes".parse::<Key>().unwrap(), Key::Field(Field::Holes));
        match "trap.potential".parse::<Key>().unwrap() {
            Key::Parameter(entry) => assert_eq!(entry.name, "trap.potential"),
            key => panic!("resolved to {:?}", key),
        }
        assert!("trap.potentials".parse::<Key>().is_err());
    }
}
