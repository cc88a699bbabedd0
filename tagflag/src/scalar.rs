//! Scalar leaf types and their width-correct parsers.
//!
//! Every primitive a schema leaf may hold implements [`Scalar`]. The trait is
//! the closed dispatch table the walk relies on: the derive macro emits a
//! call per field, and the type system picks the parser, the zero value and
//! the `clap` argument configuration at compile time.

use clap::parser::MatchesError;
use clap::{Arg, ArgAction, ArgMatches};
use figment::value::Value;
use thiserror::Error;

/// Failure to parse a string into a scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {input:?} as {type_name}: {reason}")]
pub struct ScalarParseError {
    /// Rust name of the target type.
    pub type_name: &'static str,
    /// Text that failed to parse.
    pub input: String,
    /// Parser diagnostic.
    pub reason: String,
}

impl ScalarParseError {
    fn new<S: Scalar>(input: &str, reason: impl ToString) -> Self {
        Self {
            type_name: S::TYPE_NAME,
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// A primitive that can back a command-line flag.
///
/// Implemented for `bool`, the signed and unsigned integers of every width,
/// `f32`, `f64` and `String`.
pub trait Scalar: Clone + Send + Sync + 'static {
    /// Rust name of the type, used in diagnostics and documentation.
    const TYPE_NAME: &'static str;

    /// Parse `raw` at this type's exact width.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarParseError`] when `raw` is malformed or out of range.
    fn parse_str(raw: &str) -> Result<Self, ScalarParseError>;

    /// Value used when a field declares no default.
    fn zero() -> Self;

    /// Convert into a `figment` value for layering.
    fn to_value(&self) -> Value;

    /// Text shown as the default in `--help` output.
    fn render(&self) -> String;

    /// Attach the value parser and arity this type needs.
    #[must_use]
    fn configure(arg: Arg) -> Arg {
        arg.value_parser(Self::parse_str).action(ArgAction::Set)
    }
}

impl Scalar for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_str(raw: &str) -> Result<Self, ScalarParseError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ScalarParseError::new::<Self>(raw, "expected a boolean")),
        }
    }

    fn zero() -> Self {
        false
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    // `--flag` alone means true; an explicit value needs `=`.
    fn configure(arg: Arg) -> Arg {
        arg.value_parser(Self::parse_str)
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    }
}

impl Scalar for String {
    const TYPE_NAME: &'static str = "String";

    fn parse_str(raw: &str) -> Result<Self, ScalarParseError> {
        Ok(raw.to_owned())
    }

    fn zero() -> Self {
        Self::new()
    }

    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

macro_rules! unsigned_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn parse_str(raw: &str) -> Result<Self, ScalarParseError> {
                raw.parse::<$ty>()
                    .map_err(|err| ScalarParseError::new::<Self>(raw, err))
            }

            fn zero() -> Self {
                0
            }

            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

macro_rules! signed_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn parse_str(raw: &str) -> Result<Self, ScalarParseError> {
                raw.parse::<$ty>()
                    .map_err(|err| ScalarParseError::new::<Self>(raw, err))
            }

            fn zero() -> Self {
                0
            }

            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn configure(arg: Arg) -> Arg {
                arg.value_parser(Self::parse_str)
                    .action(ArgAction::Set)
                    .allow_negative_numbers(true)
            }
        }
    )*};
}

macro_rules! float_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn parse_str(raw: &str) -> Result<Self, ScalarParseError> {
                let value = raw
                    .parse::<$ty>()
                    .map_err(|err| ScalarParseError::new::<Self>(raw, err))?;
                if value.is_infinite() && !names_infinity(raw) {
                    return Err(ScalarParseError::new::<Self>(
                        raw,
                        "value out of range",
                    ));
                }
                Ok(value)
            }

            fn zero() -> Self {
                0.0
            }

            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn configure(arg: Arg) -> Arg {
                arg.value_parser(Self::parse_str)
                    .action(ArgAction::Set)
                    .allow_negative_numbers(true)
            }
        }
    )*};
}

unsigned_scalar!(u8, u16, u32, u64, usize);
signed_scalar!(i8, i16, i32, i64, isize);
float_scalar!(f32, f64);

/// Whether `raw` spells infinity rather than overflowing into it.
fn names_infinity(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Type-erased handle on a [`Scalar`] implementation.
///
/// Bindings keep one of these so later stages (environment parsing, reading
/// parsed flags) can reach the right parser without generics.
#[derive(Clone, Copy)]
pub(crate) struct ScalarCodec {
    pub(crate) type_name: &'static str,
    parse: fn(&str) -> Result<Value, ScalarParseError>,
    matched: fn(&ArgMatches, &str) -> Result<Option<Value>, MatchesError>,
}

impl ScalarCodec {
    pub(crate) fn of<S: Scalar>() -> Self {
        Self {
            type_name: S::TYPE_NAME,
            parse: parse_value::<S>,
            matched: matched_value::<S>,
        }
    }

    /// Parse text (for example an environment value) into a layer value.
    pub(crate) fn parse(&self, raw: &str) -> Result<Value, ScalarParseError> {
        (self.parse)(raw)
    }

    /// Read the parsed flag `id` back out of `matches`.
    pub(crate) fn matched(
        &self,
        matches: &ArgMatches,
        id: &str,
    ) -> Result<Option<Value>, MatchesError> {
        (self.matched)(matches, id)
    }
}

impl std::fmt::Debug for ScalarCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarCodec")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn parse_value<S: Scalar>(raw: &str) -> Result<Value, ScalarParseError> {
    S::parse_str(raw).map(|v| v.to_value())
}

fn matched_value<S: Scalar>(
    matches: &ArgMatches,
    id: &str,
) -> Result<Option<Value>, MatchesError> {
    Ok(matches.try_get_one::<S>(id)?.map(Scalar::to_value))
}
