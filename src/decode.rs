//! Conversion of a single token into a typed value.
//!
//! Supporting a new flag type is only a matter of implementing [`Decoder`].
use std::{convert::Infallible, error::Error as StdError, marker::PhantomData, str::FromStr};

/// Error produced by a decoder, boxed so that flags of any type can report through the same sink
/// contract.
pub type DecodeError = Box<dyn StdError + Send + Sync + 'static>;

/// Builds one value out of one token.
///
/// Decoders are never instantiated: they are type-level tags passed to
/// [`Parser::register`](crate::Parser::register) and must not keep state between calls.
pub trait Decoder {
    type Value;
    type Err: StdError + Send + Sync + 'static;

    /// Value stored when the flag is merely present in the token stream.
    ///
    /// A singleton flag backed by a decoder with a presence value never takes the following
    /// token; it is set as soon as its name is seen.
    const PRESENCE: Option<&'static str> = None;

    fn decode(token: &str) -> Result<Self::Value, Self::Err>;
}

/// Base-10 integers, `i64`.
#[derive(Debug)]
pub enum Int {}

impl Decoder for Int {
    type Value = i64;
    type Err = std::num::ParseIntError;

    fn decode(token: &str) -> Result<i64, Self::Err> {
        token.parse()
    }
}

/// Raw strings, never fails.
#[derive(Debug)]
pub enum Str {}

impl Decoder for Str {
    type Value = String;
    type Err = Infallible;

    fn decode(token: &str) -> Result<String, Infallible> {
        Ok(token.to_string())
    }
}

/// Switches: set to `true` by presence alone.
#[derive(Debug)]
pub enum Bool {}

impl Decoder for Bool {
    type Value = bool;
    type Err = std::str::ParseBoolError;

    const PRESENCE: Option<&'static str> = Some("true");

    fn decode(token: &str) -> Result<bool, Self::Err> {
        token.parse()
    }
}

/// Any type implementing [`FromStr`], e.g. `Parsed<PathBuf>` or `Parsed<f64>`.
#[derive(Debug)]
pub struct Parsed<T>(PhantomData<fn() -> T>);

impl<T> Decoder for Parsed<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    type Value = T;
    type Err = T::Err;

    fn decode(token: &str) -> Result<T, T::Err> {
        token.parse()
    }
}
