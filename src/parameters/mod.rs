//! # Parameters
//! The typed parameter set carried by every checkpoint
//!
//! Parameters are stored against the fixed [`schema::SCHEMA`]. Keys outside the schema are
//! rejected and values are parsed with the declared type of their key rather than evaluated,
//! so a checkpoint can never smuggle in a value the simulator would misread.

pub mod schema;
mod value;

pub use schema::{Entry, Format, Kind, Literal, SCHEMA};
pub use value::Value;

use crate::error::ParameterError;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// A set of simulation parameters, iterated and saved in schema order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    // Keyed by position in the schema
    values: BTreeMap<usize, Value>,
}

fn position(key: &str) -> Result<usize, ParameterError> {
    schema::position(key).ok_or_else(|| ParameterError::UnknownKey(key.to_owned()))
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parameter set holding the default of every key
    pub fn with_defaults() -> Self {
        let mut parameters = Self::new();
        parameters.set_defaults();
        parameters
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn contains(&self, key: &str) -> Result<bool, ParameterError> {
        Ok(self.values.contains_key(&position(key)?))
    }

    pub fn get(&self, key: &str) -> Result<Option<&Value>, ParameterError> {
        Ok(self.values.get(&position(key)?))
    }

    /// Set `key`, returning the previous value
    ///
    /// Integers are accepted for float parameters, any other type mismatch is an error.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ParameterError> {
        let n = position(key)?;
        let value = value.into().coerce(&SCHEMA[n])?;
        Ok(self.values.insert(n, value))
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, ParameterError> {
        Ok(self.values.remove(&position(key)?))
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>, ParameterError> {
        Ok(self.get(key)?.and_then(Value::as_int))
    }

    pub fn get_float(&self, key: &str) -> Result<Option<f64>, ParameterError> {
        Ok(self.get(key)?.and_then(Value::as_float))
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ParameterError> {
        Ok(self.get(key)?.and_then(Value::as_bool))
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ParameterError> {
        Ok(self.get(key)?.and_then(Value::as_str))
    }

    pub fn get_float_list(&self, key: &str) -> Result<Option<&[f64]>, ParameterError> {
        Ok(self.get(key)?.and_then(Value::as_float_list))
    }

    /// The value of a float parameter, falling back to its schema default when unset
    pub fn float_or_default(&self, key: &str) -> Result<f64, ParameterError> {
        let n = position(key)?;
        let value = match self.values.get(&n) {
            Some(value) => value.clone(),
            None => SCHEMA[n].default.to_value(),
        };
        value.as_float().ok_or(ParameterError::Type {
            key: key.to_owned(),
            expected: Kind::Float,
            found: value.kind(),
        })
    }

    /// Iterate over the set parameters in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static Entry, &Value)> {
        self.values.iter().map(|(&n, value)| (&SCHEMA[n], value))
    }

    /// Overwrite every parameter with its default
    pub fn set_defaults(&mut self) {
        self.values = SCHEMA
            .iter()
            .enumerate()
            .map(|(n, entry)| (n, entry.default.to_value()))
            .collect();
    }

    /// Fill in the default of every parameter which is not set, leaving the rest alone
    pub fn set_empty(&mut self) {
        for (n, entry) in SCHEMA.iter().enumerate() {
            self.values
                .entry(n)
                .or_insert_with(|| entry.default.to_value());
        }
    }

    /// Turn every optional output of the simulator off
    pub fn reset_output_parameters(&mut self) {
        for (key, literal) in schema::QUIET_OUTPUT {
            if let Some(n) = schema::position(key) {
                self.values.insert(n, literal.to_value());
            }
        }
    }

    /// Parse a single `key = value` line
    ///
    /// Anything after a `#` outside of quotes is a comment. Lines which are empty once the
    /// comment is removed are skipped.
    pub fn load_line(&mut self, line: &str) -> Result<(), ParameterError> {
        let content = split_unquoted(line, '#')[0].trim();
        if content.is_empty() {
            return Ok(());
        }

        let tokens: Vec<&str> = split_unquoted(content, '=')
            .into_iter()
            .map(str::trim)
            .collect();
        let (key, literal) = match tokens.as_slice() {
            [key, literal] if !key.is_empty() && !literal.is_empty() => (*key, *literal),
            _ => return Err(ParameterError::Malformed(content.to_owned())),
        };
        let n = position(key)?;
        let value = Value::parse(&SCHEMA[n], literal)?;
        self.values.insert(n, value);
        Ok(())
    }

    /// Read `key = value` lines until the reader is exhausted
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<(), ParameterError> {
        for line in reader.lines() {
            self.load_line(&line?)?;
        }
        Ok(())
    }

    pub fn save<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (entry, value) in self.iter() {
            writeln!(writer, "{} = {}", entry.name, entry.format_value(value))?;
        }
        Ok(())
    }
}

/// Split `text` at every `separator` which is not inside a quoted string
fn split_unquoted(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut quote = None;
    for (n, c) in text.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == separator => {
                pieces.push(&text[start..n]);
                start = n + c.len_utf8();
            }
            None => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

impl std::str::FromStr for Parameters {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parameters = Self::new();
        for line in s.lines() {
            parameters.load_line(line)?;
        }
        Ok(parameters)
    }
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (entry, value) in self.iter() {
            writeln!(f, "{} = {}", entry.name, entry.format_value(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Parameters, Value, SCHEMA};
    use crate::error::ParameterError;

    #[test]
    fn output_follows_schema_order_not_insertion_order() {
        let mut first = Parameters::new();
        first.set("grid.x", 10).unwrap();
        first.set("simulation.type", "transistor").unwrap();
        first.set("trap.potential", 0.25).unwrap();

        let mut second = Parameters::new();
        second.set("trap.potential", 0.25).unwrap();
        second.set("grid.x", 10).unwrap();
        second.set("simulation.type", "transistor").unwrap();

        let text = first.to_string();
        assert_eq!(text, second.to_string());
        assert_eq!(
            text,
            "simulation.type = 'transistor'\ngrid.x = 10\ntrap.potential = 0.25\n"
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut parameters = Parameters::new();
        assert!(matches!(
            parameters.set("grid.w", 3),
            Err(ParameterError::UnknownKey(_))
        ));
        assert!(matches!(
            parameters.load_line("grid.w = 3"),
            Err(ParameterError::UnknownKey(_))
        ));
        assert!(parameters.get("grid.w").is_err());
    }

    #[test]
    fn type_mismatches_are_rejected_but_integers_widen_to_floats() {
        let mut parameters = Parameters::new();
        assert!(matches!(
            parameters.set("grid.x", 1.5),
            Err(ParameterError::Type { .. })
        ));
        parameters.set("temperature.kelvin", 250).unwrap();
        assert_eq!(
            parameters.get("temperature.kelvin").unwrap(),
            Some(&Value::Float(250.0))
        );
    }

    #[test]
    fn load_strips_comments_and_normalises_booleans() {
        let parameters: Parameters = "
            # a full line comment
            grid.x = 32   # trailing comment
            coulomb.carriers = TRUE
            output.is.on = False
            simulation.type = 'transistor'
            output.potential.slices = [1.0, 2.5]
            generation.rate = 1.0e-04
        "
        .parse()
        .unwrap();
        assert_eq!(parameters.get_int("grid.x").unwrap(), Some(32));
        assert_eq!(parameters.get_bool("coulomb.carriers").unwrap(), Some(true));
        assert_eq!(parameters.get_bool("output.is.on").unwrap(), Some(false));
        assert_eq!(
            parameters.get_str("simulation.type").unwrap(),
            Some("transistor")
        );
        assert_eq!(
            parameters.get_float_list("output.potential.slices").unwrap(),
            Some(&[1.0, 2.5][..])
        );
        assert_eq!(parameters.get_float("generation.rate").unwrap(), Some(1.0e-4));
    }

    #[test]
    fn lines_must_split_into_key_and_value() {
        let mut parameters = Parameters::new();
        for line in ["grid.x 3", "grid.x = 3 = 4", "= 3", "grid.x ="] {
            assert!(
                matches!(
                    parameters.load_line(line),
                    Err(ParameterError::Malformed(_))
                ),
                "{}",
                line
            );
        }
    }

    #[test]
    fn unparseable_values_are_rejected() {
        let mut parameters = Parameters::new();
        assert!(matches!(
            parameters.load_line("grid.x = ten"),
            Err(ParameterError::Parse { .. })
        ));
        assert!(matches!(
            parameters.load_line("seed.charges = yes"),
            Err(ParameterError::Parse { .. })
        ));
    }

    #[test]
    fn defaults_round_trip_through_text() {
        let parameters = Parameters::with_defaults();
        assert_eq!(parameters.len(), SCHEMA.len());
        let reloaded: Parameters = parameters.to_string().parse().unwrap();
        assert_eq!(reloaded, parameters);
    }

    #[test]
    fn awkward_strings_round_trip_through_text() {
        for stub in ["", "run#2", "a = b", "it's", "say \"hi\"", "  padded  "] {
            let mut parameters = Parameters::new();
            parameters.set("output.stub", stub).unwrap();
            let reloaded: Parameters = parameters.to_string().parse().unwrap();
            assert_eq!(reloaded.get_str("output.stub").unwrap(), Some(stub), "{}", stub);
        }
        let mut parameters = Parameters::new();
        assert!(matches!(
            parameters.set("output.stub", "both ' and \""),
            Err(ParameterError::Unquotable { .. })
        ));
        assert!(parameters.set("output.stub", "two\nlines").is_err());
    }

    #[test]
    fn load_applies_every_line_of_a_reader() {
        let mut parameters = Parameters::with_defaults();
        let file = "# overrides\ngrid.x = 64\n\nsimulation.type = \"transistor\"\n";
        parameters.load(file.as_bytes()).unwrap();
        assert_eq!(parameters.len(), SCHEMA.len());
        assert_eq!(parameters.get_int("grid.x").unwrap(), Some(64));
        assert_eq!(
            parameters.get_str("simulation.type").unwrap(),
            Some("transistor")
        );

        let result = parameters.load("grid.x = 8\ngrid.q = 1\n".as_bytes());
        assert!(matches!(result, Err(ParameterError::UnknownKey(_))));
        assert_eq!(parameters.get_int("grid.x").unwrap(), Some(8));
    }

    #[test]
    fn comments_inside_quotes_are_kept() {
        let parameters: Parameters = "output.stub = 'run#2' # the second run".parse().unwrap();
        assert_eq!(parameters.get_str("output.stub").unwrap(), Some("run#2"));
    }

    #[test]
    fn set_empty_keeps_existing_values() {
        let mut parameters = Parameters::new();
        parameters.set("grid.x", 7).unwrap();
        parameters.set_empty();
        assert_eq!(parameters.len(), SCHEMA.len());
        assert_eq!(parameters.get_int("grid.x").unwrap(), Some(7));
        assert_eq!(parameters.get_int("grid.y").unwrap(), Some(128));
    }

    #[test]
    fn reset_output_parameters_silences_output() {
        let mut parameters = Parameters::with_defaults();
        parameters.set("output.xyz", 100).unwrap();
        parameters.set("image.traps", true).unwrap();
        parameters.reset_output_parameters();
        assert_eq!(parameters.get_int("output.xyz").unwrap(), Some(0));
        assert_eq!(parameters.get_bool("image.traps").unwrap(), Some(false));
        assert_eq!(parameters.get_int("grid.x").unwrap(), Some(128));
    }

    #[test]
    fn float_or_default_falls_back_to_the_schema() {
        let mut parameters = Parameters::new();
        assert_eq!(parameters.float_or_default("trap.potential").unwrap(), 0.1);
        parameters.set("trap.potential", 0.3).unwrap();
        assert_eq!(parameters.float_or_default("trap.potential").unwrap(), 0.3);
    }
}
