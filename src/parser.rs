//! Flag registration and token routing.
use std::collections::{hash_map::Entry, HashMap};

use crate::{
    decode::{Bool, Decoder, Int, Str},
    flag::{Flag, FluentFlag, HelpFlag, Positional, RepeatedFlag, SingletonFlag, Sink},
    DefinitionError, Error, Result,
};

/// Registry of flags and the tokens they answer to.
///
/// A parser mutably borrows the destination of every registered flag for `'a`; the destinations
/// can be read again once the parser is dropped.
pub struct Parser<'a> {
    flags: FlagSet,
    canonical: Vec<Box<dyn Flag + 'a>>,
    definition_errors: Vec<DefinitionError>,
    positional: Positional,
    usage: String,
    help_flag: Option<usize>,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Parser::new()
    }
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Parser {
            flags: FlagSet::default(),
            canonical: Vec::new(),
            definition_errors: Vec::new(),
            positional: Positional::default(),
            usage: String::new(),
            help_flag: None,
        }
    }

    /// Sets the usage banner to `{arg0} {usage}` and registers a `--help, -h` switch.
    ///
    /// When the switch is given, [`Parser::parse`] returns [`Error::Help`] with the rendered help
    /// instead of enforcing defaults. Exiting is left to the caller.
    pub fn with_help(mut self, arg0: &str, usage: &str) -> Self {
        self.usage = format!("{arg0} {usage}");
        self.help_flag = Some(self.canonical.len());
        self.add_flag(Box::new(HelpFlag::new()));
        self
    }

    /// Registers a flag storing one value decoded by `D`.
    ///
    /// Registering different flags to the same destination is prevented by the borrow checker.
    pub fn register<D>(
        &mut self,
        name: &str,
        dest: &'a mut D::Value,
        doc: &str,
    ) -> FluentFlag<'_, 'a, D::Value>
    where
        D: Decoder + 'a,
        D::Value: Clone + 'a,
    {
        FluentFlag::<D::Value>::new(self, Box::new(SingletonFlag::<D>::new(name, dest, doc)))
    }

    /// Registers a flag appending every value decoded by `D`.
    pub fn register_repeated<D>(
        &mut self,
        name: &str,
        dest: &'a mut Vec<D::Value>,
        doc: &str,
    ) -> FluentFlag<'_, 'a, Vec<D::Value>>
    where
        D: Decoder + 'a,
        D::Value: Clone + 'a,
    {
        FluentFlag::<Vec<D::Value>>::new(self, Box::new(RepeatedFlag::<D>::new(name, dest, doc)))
    }

    pub fn int(&mut self, name: &str, dest: &'a mut i64, doc: &str) -> FluentFlag<'_, 'a, i64> {
        self.register::<Int>(name, dest, doc)
    }

    pub fn string(
        &mut self,
        name: &str,
        dest: &'a mut String,
        doc: &str,
    ) -> FluentFlag<'_, 'a, String> {
        self.register::<Str>(name, dest, doc)
    }

    /// Switch set to `true` by its mere presence; never takes a value.
    pub fn bool(&mut self, name: &str, dest: &'a mut bool, doc: &str) -> FluentFlag<'_, 'a, bool> {
        self.register::<Bool>(name, dest, doc)
    }

    pub fn int_repeated(
        &mut self,
        name: &str,
        dest: &'a mut Vec<i64>,
        doc: &str,
    ) -> FluentFlag<'_, 'a, Vec<i64>> {
        self.register_repeated::<Int>(name, dest, doc)
    }

    pub fn string_repeated(
        &mut self,
        name: &str,
        dest: &'a mut Vec<String>,
        doc: &str,
    ) -> FluentFlag<'_, 'a, Vec<String>> {
        self.register_repeated::<Str>(name, dest, doc)
    }

    /// Parses `tokens`, storing values in the registered destinations.
    ///
    /// Declaration errors are all reported at once and prevent any token from being consumed.
    /// Otherwise parsing stops at the first bad token, and values stored before it are kept.
    ///
    /// Can be called several times. Positional arguments only describe the last call, but
    /// repeated flags keep appending to their destinations: they are never cleared, and once a
    /// repeated flag has received a value its default is no longer applied.
    ///
    /// A flag without a configured default leaves its destination untouched when absent; it is
    /// not reset to the type's zero value.
    pub fn parse<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tokens = tokens.into_iter().collect::<Vec<_>>();
        let expanded = self.validate_and_expand()?;

        self.positional.clear();
        for flag in &mut self.canonical {
            flag.rewind();
        }

        self.process_tokens(&tokens, &expanded)?;
        self.finalize()
    }

    /// Tokens not consumed by any flag during the last parse, in encounter order.
    pub fn positional(&self) -> &[String] {
        self.positional.as_slice()
    }

    /// Registered flags in registration order.
    pub fn flags(&self) -> impl Iterator<Item = &(dyn Flag + 'a)> + '_ {
        self.canonical.iter().map(|flag| &**flag)
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub(crate) fn add_flag(&mut self, flag: Box<dyn Flag + 'a>) {
        let index = self.canonical.len();
        let name = flag.names().first().map_or("", String::as_str);
        if let Err(err) = self.flags.add(name_to_token(name), index, &*flag) {
            tracing::debug!(%err, "recording flag definition error");
            self.definition_errors.push(err);
        }
        self.canonical.push(flag);
    }

    fn validate_and_expand(&self) -> Result<FlagSet> {
        if !self.definition_errors.is_empty() {
            return Err(Error::Definition(self.definition_errors.clone()));
        }

        let (expanded, errors) = self.flags.expand(&self.canonical);
        if !errors.is_empty() {
            for err in &errors {
                tracing::debug!(%err, "alias expansion failed");
            }
            return Err(Error::Expansion(errors));
        }

        Ok(expanded)
    }

    fn process_tokens<T: AsRef<str>>(&mut self, tokens: &[T], flags: &FlagSet) -> Result<()> {
        let mut target = Target::Positional;

        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();

            if !token.starts_with('-') {
                if self.is_full(target) {
                    target = Target::Positional;
                }
                tracing::trace!(token, ?target, "routing value");
                self.consume(target, token)?;
                continue;
            }

            let index = flags.get(token).ok_or_else(|| Error::UnknownFlag(token.to_string()))?;
            let flag = &mut self.canonical[index];
            flag.select();
            target = Target::Flag(index);

            if let Some(value) = flag.presence() {
                self.consume(target, value)?;
            } else if i + 1 == tokens.len() {
                return Err(Error::MissingValue(token.to_string()));
            }
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if let Some(index) = self.help_flag {
            if self.canonical[index].is_set() {
                return Err(Error::Help(self.help()));
            }
        }

        for flag in &mut self.canonical {
            if !flag.is_set() {
                tracing::debug!(names = ?flag.names(), "enforcing default");
            }
            flag.enforce_default();
        }

        Ok(())
    }

    fn is_full(&self, target: Target) -> bool {
        match target {
            Target::Positional => self.positional.is_full(),
            Target::Flag(index) => self.canonical[index].is_full(),
        }
    }

    fn consume(&mut self, target: Target, token: &str) -> Result<()> {
        let res = match target {
            Target::Positional => self.positional.consume(token),
            Target::Flag(index) => self.canonical[index].consume(token),
        };
        res.map_err(|source| {
            let (name, kind) = match target {
                Target::Positional => ("positional".to_string(), self.positional.kind()),
                Target::Flag(index) => {
                    let flag = &self.canonical[index];
                    (flag.names().first().cloned().unwrap_or_default(), flag.kind())
                }
            };
            Error::Decode { name, kind, source }
        })
    }
}

/// Where the next value token goes.
#[derive(Debug, Clone, Copy)]
enum Target {
    Positional,
    Flag(usize),
}

/// Mapping from fully qualified tokens (`-x`, `--name`) to indices of canonical flags.
#[derive(Debug, Default, Clone)]
struct FlagSet {
    tokens: HashMap<String, usize>,
}

impl FlagSet {
    fn get(&self, token: &str) -> Option<usize> {
        self.tokens.get(token).copied()
    }

    /// Fails if `token` is empty or already claimed.
    fn add(&mut self, token: String, index: usize, flag: &dyn Flag) -> Result<(), DefinitionError> {
        if token.is_empty() {
            return Err(DefinitionError::EmptyName {
                kind: flag.kind(),
                names: flag.names().to_vec(),
            });
        }
        match self.tokens.entry(token) {
            Entry::Occupied(entry) => Err(DefinitionError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(index);
                Ok(())
            }
        }
    }

    /// Returns a new set with every alias added after the canonical names, together with all the
    /// collisions found on the way.
    fn expand(&self, flags: &[Box<dyn Flag + '_>]) -> (FlagSet, Vec<DefinitionError>) {
        let mut res = self.clone();
        let mut errors = Vec::new();

        for (index, flag) in flags.iter().enumerate() {
            for alias in flag.names().iter().skip(1) {
                if let Err(err) = res.add(name_to_token(alias), index, &**flag) {
                    errors.push(err);
                }
            }
        }

        (res, errors)
    }
}

/// Spells `name` the way it appears on the command line: `x` -> `-x`, `name` -> `--name`.
///
/// The empty name stays empty and is rejected at registration.
pub fn name_to_token(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (None, _) => String::new(),
        (Some(_), None) => format!("-{name}"),
        (Some(_), Some(_)) => format!("--{name}"),
    }
}
