use super::{Entry, Kind};
use crate::error::ParameterError;

/// A typed parameter value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    FloatList(Vec<f64>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Str(_) => Kind::Str,
            Value::FloatList(_) => Kind::FloatList,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Floats, or integers widened to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            Value::FloatList(values) => Some(values),
            _ => None,
        }
    }

    /// Convert into the declared type of `entry`
    ///
    /// Strings must fit on one line inside a single kind of quote.
    pub(crate) fn coerce(self, entry: &Entry) -> Result<Self, ParameterError> {
        match (entry.kind(), self) {
            (Kind::Float, Value::Int(value)) => Ok(Value::Float(value as f64)),
            (Kind::Str, Value::Str(value))
                if value.contains(|c: char| c == '\n' || c == '\r')
                    || (value.contains('\'') && value.contains('"')) =>
            {
                Err(ParameterError::Unquotable {
                    key: entry.name.to_owned(),
                    value,
                })
            }
            (kind, value) if kind == value.kind() => Ok(value),
            (kind, value) => Err(ParameterError::Type {
                key: entry.name.to_owned(),
                expected: kind,
                found: value.kind(),
            }),
        }
    }

    /// Parse a literal as the declared type of `entry`
    pub(crate) fn parse(entry: &Entry, literal: &str) -> Result<Self, ParameterError> {
        let literal = literal.trim();
        let error = || ParameterError::Parse {
            key: entry.name.to_owned(),
            expected: entry.kind(),
            value: literal.to_owned(),
        };
        match entry.kind() {
            Kind::Int => literal.parse().map(Value::Int).map_err(|_| error()),
            Kind::Float => literal.parse().map(Value::Float).map_err(|_| error()),
            Kind::Bool => match literal.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(error()),
            },
            Kind::Str => Value::Str(unquote(literal).to_owned()).coerce(entry),
            Kind::FloatList => {
                let inner = literal
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .or_else(|| {
                        literal
                            .strip_prefix('(')
                            .and_then(|rest| rest.strip_suffix(')'))
                    })
                    .unwrap_or(literal);
                inner
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(|token| token.parse::<f64>().map_err(|_| error()))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::FloatList)
            }
        }
    }
}

fn unquote(literal: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = literal
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    literal
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:?}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
            Value::FloatList(values) => {
                write!(f, "[")?;
                for (n, value) in values.iter().enumerate() {
                    if n > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::FloatList(values)
    }
}
