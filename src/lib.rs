//! Command line flags bound to caller-owned destinations.
//!
//! Flags are registered against a [`Parser`] together with a `&mut` destination, and optionally
//! configured with aliases and a default through the returned [`FluentFlag`]. Parsing then routes
//! every token either to a flag or to the positional collection:
//!
//! ```
//! let (mut jobs, mut verbose) = (0, false);
//! let mut parser = flagbind::Parser::new();
//! parser.int("jobs", &mut jobs, "Number of workers").alias(["j"]).default(4);
//! parser.bool("verbose", &mut verbose, "Print more");
//!
//! parser.parse(["-j", "8", "input.txt", "--verbose"]).unwrap();
//! assert_eq!(parser.positional(), ["input.txt"]);
//! drop(parser);
//!
//! assert_eq!((jobs, verbose), (8, true));
//! ```
//!
//! Singleton flags take one value per occurrence, repeated flags take every value that follows
//! them, and boolean flags take none. Declaration mistakes (empty or duplicate names, colliding
//! aliases) are collected and reported together by the first call to [`Parser::parse`].
use std::fmt;

mod decode;
mod flag;
mod help;
mod parser;

pub use crate::{
    decode::{Bool, DecodeError, Decoder, Int, Parsed, Str},
    flag::{Flag, FluentFlag, Sink},
    parser::{name_to_token, Parser},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} flag definition errors, refusing to parse{}", .0.len(), Lines(.0))]
    Definition(Vec<DefinitionError>),
    #[error("{} flag errors after aliases expansion, refusing to parse{}", .0.len(), Lines(.0))]
    Expansion(Vec<DefinitionError>),
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("flag {0} requires a value but none was provided")]
    MissingValue(String),
    #[error("when consuming {name} ({kind}): {source}")]
    Decode {
        name: String,
        kind: String,
        #[source]
        source: DecodeError,
    },
    /// The built-in help flag was given; carries the rendered help page.
    #[error("{0}")]
    Help(String),
}

impl Error {
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Help(_))
    }
}

/// A mistake in the way flags were declared, as opposed to the way they were used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("{kind} (names: {names:?}) has an empty name")]
    EmptyName { kind: String, names: Vec<String> },
    #[error("flag {0} already exists")]
    Duplicate(String),
}

struct Lines<'e>(&'e [DefinitionError]);

impl fmt::Display for Lines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in self.0 {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}
