//! Everything a token can be routed to.
//!
//! [`Sink`] is the contract the parsing loop relies on, [`Flag`] adds what the parser needs to
//! manage named flags, and [`FluentFlag`] is the handle returned at registration to finish
//! configuring a flag.
use std::{any::type_name, marker::PhantomData};

use crate::{decode::DecodeError, Decoder, Parser};

/// Anything capable of accepting and storing tokens.
pub trait Sink {
    /// Decodes and stores one token.
    fn consume(&mut self, token: &str) -> Result<(), DecodeError>;
    /// Whether the sink refuses more tokens for now. Rejected tokens become positional.
    fn is_full(&self) -> bool;
    /// Human-readable kind, e.g. `i64 singleton` or `slice of String`.
    fn kind(&self) -> String;
    /// Canonical name first, then aliases in registration order.
    fn names(&self) -> &[String];
}

/// A registered flag, as seen by the parser and by help renderers.
pub trait Flag: Sink {
    fn doc(&self) -> &str;
    /// Copies the default into the destination unless a value was consumed during this parse.
    /// Repeated flags also skip it once they have consumed a value in an earlier parse.
    fn enforce_default(&mut self);
    /// Whether a value was consumed during the current (or last) parse.
    fn is_set(&self) -> bool;
    /// Value consumed as soon as the flag is seen, for flags that never take a following token.
    fn presence(&self) -> Option<&'static str> {
        None
    }
    /// Called every time the flag's token is seen, before any value is routed to it.
    fn select(&mut self) {}
    /// Forgets per-parse state. Destinations are left as they are.
    fn rewind(&mut self);
}

/// State shared by singleton and repeated flags.
pub(crate) struct FlagBase<'a, T> {
    names: Vec<String>,
    doc: String,
    dest: &'a mut T,
    default: Option<T>,
    set: bool,
}

impl<'a, T: Clone> FlagBase<'a, T> {
    fn new(name: &str, dest: &'a mut T, doc: &str) -> Self {
        FlagBase { names: vec![name.to_string()], doc: doc.to_string(), dest, default: None, set: false }
    }

    fn enforce_default(&mut self) {
        if self.set {
            return;
        }
        if let Some(default) = &self.default {
            *self.dest = default.clone();
        }
    }
}

/// Flag storing a single value, last occurrence wins.
pub(crate) struct SingletonFlag<'a, D: Decoder> {
    base: FlagBase<'a, D::Value>,
    // Value consumed since the flag was last selected.
    full: bool,
    decoder: PhantomData<D>,
}

impl<'a, D: Decoder> SingletonFlag<'a, D>
where
    D::Value: Clone,
{
    pub(crate) fn new(name: &str, dest: &'a mut D::Value, doc: &str) -> Self {
        SingletonFlag { base: FlagBase::new(name, dest, doc), full: false, decoder: PhantomData }
    }
}

impl<D: Decoder> Sink for SingletonFlag<'_, D> {
    fn consume(&mut self, token: &str) -> Result<(), DecodeError> {
        *self.base.dest = D::decode(token)?;
        self.base.set = true;
        self.full = true;
        Ok(())
    }

    fn is_full(&self) -> bool {
        self.full
    }

    fn kind(&self) -> String {
        format!("{} singleton", short_type_name::<D::Value>())
    }

    fn names(&self) -> &[String] {
        &self.base.names
    }
}

impl<D: Decoder> Flag for SingletonFlag<'_, D>
where
    D::Value: Clone,
{
    fn doc(&self) -> &str {
        &self.base.doc
    }

    fn enforce_default(&mut self) {
        self.base.enforce_default()
    }

    fn is_set(&self) -> bool {
        self.base.set
    }

    fn presence(&self) -> Option<&'static str> {
        D::PRESENCE
    }

    fn select(&mut self) {
        self.full = false;
    }

    fn rewind(&mut self) {
        self.base.set = false;
        self.full = false;
    }
}

/// Flag appending every value routed to it.
pub(crate) struct RepeatedFlag<'a, D: Decoder> {
    base: FlagBase<'a, Vec<D::Value>>,
    // Received a value in any parse so far; the destination then holds real values.
    accumulated: bool,
    decoder: PhantomData<D>,
}

impl<'a, D: Decoder> RepeatedFlag<'a, D>
where
    D::Value: Clone,
{
    pub(crate) fn new(name: &str, dest: &'a mut Vec<D::Value>, doc: &str) -> Self {
        RepeatedFlag {
            base: FlagBase::new(name, dest, doc),
            accumulated: false,
            decoder: PhantomData,
        }
    }
}

impl<D: Decoder> Sink for RepeatedFlag<'_, D> {
    fn consume(&mut self, token: &str) -> Result<(), DecodeError> {
        let value = D::decode(token)?;
        self.base.dest.push(value);
        self.base.set = true;
        self.accumulated = true;
        Ok(())
    }

    fn is_full(&self) -> bool {
        false
    }

    fn kind(&self) -> String {
        format!("slice of {}", short_type_name::<D::Value>())
    }

    fn names(&self) -> &[String] {
        &self.base.names
    }
}

impl<D: Decoder> Flag for RepeatedFlag<'_, D>
where
    D::Value: Clone,
{
    fn doc(&self) -> &str {
        &self.base.doc
    }

    fn enforce_default(&mut self) {
        // Values from earlier parses accumulate, a default would wipe them.
        if !self.accumulated {
            self.base.enforce_default()
        }
    }

    fn is_set(&self) -> bool {
        self.base.set
    }

    fn rewind(&mut self) {
        self.base.set = false;
    }
}

/// Tokens that were not taken by any flag, in encounter order.
#[derive(Debug, Default)]
pub(crate) struct Positional {
    values: Vec<String>,
}

impl Positional {
    pub(crate) fn as_slice(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear()
    }
}

impl Sink for Positional {
    fn consume(&mut self, token: &str) -> Result<(), DecodeError> {
        self.values.push(token.to_string());
        Ok(())
    }

    fn is_full(&self) -> bool {
        false
    }

    fn kind(&self) -> String {
        "positional argument".to_string()
    }

    fn names(&self) -> &[String] {
        &[]
    }
}

/// The `--help, -h` switch registered by [`Parser::with_help`]. Owns its state since nobody
/// outside the parser reads it.
pub(crate) struct HelpFlag {
    names: Vec<String>,
    requested: bool,
}

impl HelpFlag {
    pub(crate) fn new() -> Self {
        HelpFlag { names: vec!["help".to_string(), "h".to_string()], requested: false }
    }
}

impl Sink for HelpFlag {
    fn consume(&mut self, _token: &str) -> Result<(), DecodeError> {
        self.requested = true;
        Ok(())
    }

    fn is_full(&self) -> bool {
        self.requested
    }

    fn kind(&self) -> String {
        "bool singleton".to_string()
    }

    fn names(&self) -> &[String] {
        &self.names
    }
}

impl Flag for HelpFlag {
    fn doc(&self) -> &str {
        "Print this help page"
    }

    fn enforce_default(&mut self) {}

    fn is_set(&self) -> bool {
        self.requested
    }

    fn presence(&self) -> Option<&'static str> {
        Some("true")
    }

    fn rewind(&mut self) {
        self.requested = false;
    }
}

/// Access to the typed configuration of a flag that is not registered yet.
pub(crate) trait Configurable<'a, T>: Flag {
    fn base_mut(&mut self) -> &mut FlagBase<'a, T>;
    fn into_flag(self: Box<Self>) -> Box<dyn Flag + 'a>;
}

impl<'a, D> Configurable<'a, D::Value> for SingletonFlag<'a, D>
where
    D: Decoder + 'a,
    D::Value: Clone + 'a,
{
    fn base_mut(&mut self) -> &mut FlagBase<'a, D::Value> {
        &mut self.base
    }

    fn into_flag(self: Box<Self>) -> Box<dyn Flag + 'a> {
        self
    }
}

impl<'a, D> Configurable<'a, Vec<D::Value>> for RepeatedFlag<'a, D>
where
    D: Decoder + 'a,
    D::Value: Clone + 'a,
{
    fn base_mut(&mut self) -> &mut FlagBase<'a, Vec<D::Value>> {
        &mut self.base
    }

    fn into_flag(self: Box<Self>) -> Box<dyn Flag + 'a> {
        self
    }
}

/// Handle to finish configuring a freshly declared flag.
///
/// The flag joins the parser when the handle is dropped, which for the usual
/// `parser.int(..).alias(..).default(..);` chain is the end of the statement.
pub struct FluentFlag<'p, 'a, T> {
    parser: &'p mut Parser<'a>,
    flag: Option<Box<dyn Configurable<'a, T> + 'a>>,
}

impl<'p, 'a, T: 'a> FluentFlag<'p, 'a, T> {
    pub(crate) fn new(parser: &'p mut Parser<'a>, flag: Box<dyn Configurable<'a, T> + 'a>) -> Self {
        FluentFlag { parser, flag: Some(flag) }
    }

    /// Registers additional names. Single-character names are spelled `-x`, others `--name`.
    pub fn alias<I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if let Some(flag) = &mut self.flag {
            flag.base_mut().names.extend(aliases.into_iter().map(Into::into));
        }
        self
    }

    /// Sets the value stored when the flag does not appear in the tokens.
    pub fn default(mut self, value: T) -> Self {
        if let Some(flag) = &mut self.flag {
            flag.base_mut().default = Some(value);
        }
        self
    }
}

impl<T> Drop for FluentFlag<'_, '_, T> {
    fn drop(&mut self) {
        if let Some(flag) = self.flag.take() {
            self.parser.add_flag(flag.into_flag());
        }
    }
}

/// `alloc::vec::Vec<alloc::string::String>` -> `Vec<String>`.
fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let mut res = String::with_capacity(full.len());
    let mut segments = full.split("::").peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            res.push_str(segment);
            break;
        }
        let path_start = segment
            .rfind(|c: char| !(c.is_alphanumeric() || c == '_'))
            .map_or(0, |idx| idx + 1);
        res.push_str(&segment[..path_start]);
    }
    res
}
