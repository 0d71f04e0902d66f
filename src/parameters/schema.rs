//! # Schema
//! The fixed table of simulation parameters
//!
//! The order of [`SCHEMA`] is the order in which parameters are written, so two parameter sets
//! holding the same values always serialize identically.

use super::Value;

/// The type a parameter value must have
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Int,
    Float,
    Bool,
    Str,
    FloatList,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Kind::Int => write!(f, "an integer"),
            Kind::Float => write!(f, "a float"),
            Kind::Bool => write!(f, "a boolean"),
            Kind::Str => write!(f, "a string"),
            Kind::FloatList => write!(f, "a list of floats"),
        }
    }
}

/// How a value is printed when saved
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// Plain integer, `42`
    Integer,
    /// Floats with a decimal point, `300.0`
    Decimal,
    /// Floats in exponent notation, `1e-3`
    Scientific,
    /// `true` or `false`
    Flag,
    /// Bare text
    Text,
    /// Bracketed, comma separated floats, `[1.0, 2.5]`
    List,
}

/// The default value of a parameter
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'static str),
    FloatList(&'static [f64]),
}

impl Literal {
    pub fn kind(&self) -> Kind {
        match self {
            Literal::Int(_) => Kind::Int,
            Literal::Float(_) => Kind::Float,
            Literal::Bool(_) => Kind::Bool,
            Literal::Str(_) => Kind::Str,
            Literal::FloatList(_) => Kind::FloatList,
        }
    }

    pub fn to_value(&self) -> Value {
        match *self {
            Literal::Int(value) => Value::Int(value),
            Literal::Float(value) => Value::Float(value),
            Literal::Bool(value) => Value::Bool(value),
            Literal::Str(value) => Value::Str(value.to_owned()),
            Literal::FloatList(value) => Value::FloatList(value.to_vec()),
        }
    }
}

/// A single parameter declaration
#[derive(Debug, PartialEq)]
pub struct Entry {
    pub name: &'static str,
    pub default: Literal,
    /// Physical unit, for documentation only
    pub unit: &'static str,
    pub format: Format,
}

impl Entry {
    pub fn kind(&self) -> Kind {
        self.default.kind()
    }

    /// Print a value in this parameter's canonical format
    pub fn format_value(&self, value: &Value) -> String {
        match (self.format, value) {
            (Format::Decimal, Value::Float(value)) => format!("{:?}", value),
            (Format::Scientific, Value::Float(value)) => format!("{:e}", value),
            (Format::List, Value::FloatList(values)) => {
                let values: Vec<String> = values.iter().map(|value| format!("{:?}", value)).collect();
                format!("[{}]", values.join(", "))
            }
            (Format::Text, Value::Str(value)) => match value.contains('\'') {
                true => format!("\"{}\"", value),
                false => format!("'{}'", value),
            },
            (_, value) => value.to_string(),
        }
    }
}

const fn int(name: &'static str, default: i64, unit: &'static str) -> Entry {
    Entry {
        name,
        default: Literal::Int(default),
        unit,
        format: Format::Integer,
    }
}

const fn decimal(name: &'static str, default: f64, unit: &'static str) -> Entry {
    Entry {
        name,
        default: Literal::Float(default),
        unit,
        format: Format::Decimal,
    }
}

const fn rate(name: &'static str, default: f64) -> Entry {
    Entry {
        name,
        default: Literal::Float(default),
        unit: "1/step",
        format: Format::Scientific,
    }
}

const fn flag(name: &'static str, default: bool) -> Entry {
    Entry {
        name,
        default: Literal::Bool(default),
        unit: "",
        format: Format::Flag,
    }
}

const fn text(name: &'static str, default: &'static str) -> Entry {
    Entry {
        name,
        default: Literal::Str(default),
        unit: "",
        format: Format::Text,
    }
}

const fn list(name: &'static str, default: &'static [f64], unit: &'static str) -> Entry {
    Entry {
        name,
        default: Literal::FloatList(default),
        unit,
        format: Format::List,
    }
}

/// Every parameter the simulator understands, in canonical order
pub static SCHEMA: &[Entry] = &[
    text("simulation.type", "solarcell"),
    int("random.seed", 0, ""),
    int("grid.z", 1, "nm"),
    int("grid.y", 128, "nm"),
    int("grid.x", 128, "nm"),
    int("hopping.range", 1, "nm"),
    decimal("electron.percentage", 0.01, "%"),
    decimal("hole.percentage", 0.01, "%"),
    flag("seed.charges", false),
    decimal("seed.percentage", 1.0, "%"),
    decimal("defect.percentage", 0.0, "%"),
    int("defects.charge", -1, "e"),
    decimal("trap.percentage", 0.0, "%"),
    decimal("trap.potential", 0.1, "V"),
    decimal("gaussian.stdev", 0.0, "eV"),
    decimal("gaussian.average", 0.0, "eV"),
    decimal("voltage.left", 0.0, "V"),
    decimal("voltage.right", 0.0, "V"),
    decimal("slope.z", 0.0, "V/nm"),
    decimal("temperature.kelvin", 300.0, "K"),
    flag("coulomb.carriers", false),
    decimal("coulomb.gaussian.sigma", 0.0, "nm"),
    decimal("exciton.binding", 0.0, "eV"),
    rate("source.rate", 0.9),
    rate("e.source.l.rate", -1.0),
    rate("e.source.r.rate", -1.0),
    rate("h.source.l.rate", -1.0),
    rate("h.source.r.rate", -1.0),
    rate("generation.rate", 1e-3),
    flag("source.metropolis", false),
    flag("source.coulomb", false),
    rate("drain.rate", 0.9),
    rate("e.drain.l.rate", -1.0),
    rate("e.drain.r.rate", -1.0),
    rate("h.drain.l.rate", -1.0),
    rate("h.drain.r.rate", -1.0),
    rate("recombination.rate", 0.0),
    int("recombination.range", 0, "nm"),
    flag("balance.charges", false),
    int("iterations.real", 1000, "step"),
    int("iterations.print", 10, "step"),
    int("current.step", 0, "step"),
    text("output.stub", "out"),
    text("output.ext", "dat"),
    int("output.precision", 5, ""),
    int("output.width", 20, ""),
    flag("output.is.on", true),
    int("output.step.chk", 0, "step"),
    flag("output.chk.trap.potential", false),
    flag("output.ids.on.delete", false),
    flag("output.ids.on.encounter", false),
    int("output.coulomb", 0, "step"),
    flag("output.potential", false),
    list("output.potential.slices", &[], "nm"),
    int("output.xyz", 0, "step"),
    flag("output.xyz.e", false),
    flag("output.xyz.h", false),
    flag("output.xyz.d", false),
    flag("output.xyz.t", false),
    int("output.xyz.mode", 0, ""),
    flag("image.traps", false),
    flag("image.defects", false),
    int("image.carriers", 0, "step"),
    flag("use.opencl", false),
    int("work.x", 4, ""),
    int("work.y", 4, ""),
    int("work.z", 4, ""),
    int("work.size", 256, ""),
    int("max.threads", -1, ""),
    int("opencl.threshold", 256, ""),
    int("opencl.device.id", 0, ""),
];

/// Output parameters and the quietest value for each, applied by
/// [`Parameters::reset_output_parameters`](super::Parameters::reset_output_parameters)
pub static QUIET_OUTPUT: &[(&str, Literal)] = &[
    ("output.ids.on.delete", Literal::Bool(false)),
    ("output.ids.on.encounter", Literal::Bool(false)),
    ("output.coulomb", Literal::Int(0)),
    ("output.potential", Literal::Bool(false)),
    ("output.xyz", Literal::Int(0)),
    ("output.xyz.e", Literal::Bool(false)),
    ("output.xyz.h", Literal::Bool(false)),
    ("output.xyz.d", Literal::Bool(false)),
    ("output.xyz.t", Literal::Bool(false)),
    ("image.traps", Literal::Bool(false)),
    ("image.defects", Literal::Bool(false)),
    ("image.carriers", Literal::Int(0)),
];

/// The position of `name` in [`SCHEMA`]
pub fn position(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|entry| entry.name == name)
}

pub fn lookup(name: &str) -> Option<&'static Entry> {
    position(name).map(|n| &SCHEMA[n])
}

#[cfg(test)]
mod test {
    use super::{lookup, Kind, QUIET_OUTPUT, SCHEMA};
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = SCHEMA.iter().map(|entry| entry.name).collect();
        assert_eq!(names.len(), SCHEMA.len());
    }

    #[test]
    fn quiet_output_only_names_known_keys_of_the_right_kind() {
        for (name, literal) in QUIET_OUTPUT {
            let entry = lookup(name).unwrap();
            assert_eq!(entry.kind(), literal.kind(), "{}", name);
        }
    }

    #[test]
    fn grid_dimensions_are_integers() {
        for name in ["grid.x", "grid.y", "grid.z", "random.seed", "current.step"] {
            assert_eq!(lookup(name).unwrap().kind(), Kind::Int);
        }
        assert_eq!(lookup("trap.potential").unwrap().kind(), Kind::Float);
        assert!(lookup("grid.w").is_none());
    }
}
