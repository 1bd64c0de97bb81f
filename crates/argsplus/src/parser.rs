//! Single-pass, fail-fast token parser.

use std::ops::Index;

use crate::config::{ParserConfig, ProgramInfo};
use crate::error::{ParseError, ParseResult, Target};
use crate::flags::FlagSet;
use crate::registry::{
    Declaration, FlagRegistration, Handle, Registration, Registry, ValueHandle,
};
use crate::value::ValueConverter;

/// Declarations plus the grammar used to match tokens against them.
///
/// Parsing mutates declaration state in place. Calling [`Parser::parse`]
/// again accumulates onto the previous results; nothing is reset.
#[derive(Debug, Default)]
pub struct Parser {
    config: ParserConfig,
    info: ProgramInfo,
    registry: Registry,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn info(mut self, info: ProgramInfo) -> Self {
        self.info = info;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ParserConfig {
        &mut self.config
    }

    pub fn program_info(&self) -> &ProgramInfo {
        &self.info
    }

    pub fn program_info_mut(&mut self) -> &mut ProgramInfo {
        &mut self.info
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// See [`Registry::add_option`].
    pub fn add_option<C>(
        &mut self,
        name: impl Into<String>,
        flags: FlagSet,
        converter: C,
    ) -> Registration<'_, C::Value>
    where
        C: ValueConverter + 'static,
        C::Value: Default + 'static,
    {
        self.registry.add_option(name, flags, converter)
    }

    /// See [`Registry::add_flag`].
    pub fn add_flag(&mut self, name: impl Into<String>, flags: FlagSet) -> FlagRegistration<'_> {
        self.registry.add_flag(name, flags)
    }

    /// See [`Registry::add_positional`].
    pub fn add_positional<C>(
        &mut self,
        name: impl Into<String>,
        converter: C,
    ) -> Registration<'_, C::Value>
    where
        C: ValueConverter + 'static,
        C::Value: Default + 'static,
    {
        self.registry.add_positional(name, converter)
    }

    /// Current value of a declaration.
    ///
    /// # Panics
    ///
    /// Panics if `handle` came from another parser. Use [`Parser::get`] to
    /// avoid the panic.
    pub fn value<T: 'static>(&self, handle: &ValueHandle<T>) -> &T {
        &self.registry[handle]
    }

    pub fn get<T: 'static>(&self, handle: &ValueHandle<T>) -> Option<&T> {
        self.registry.value(handle)
    }

    pub fn default_value<T: 'static>(&self, handle: &ValueHandle<T>) -> Option<&T> {
        self.registry.default_value(handle)
    }

    pub fn set_default<T: Clone + 'static>(&mut self, handle: &ValueHandle<T>, value: T) -> bool {
        self.registry.set_default(handle, value)
    }

    pub fn matched<H: Handle>(&self, handle: &H) -> bool {
        self.registry.matched(handle)
    }

    pub fn declaration<H: Handle>(&self, handle: &H) -> Option<&Declaration> {
        self.registry.declaration(handle)
    }

    /// Parse `args` (program name already stripped).
    ///
    /// Stops at the first error. Declarations that never matched keep their
    /// current value, which is the default unless an earlier parse set it.
    pub fn parse<I>(&mut self, args: I) -> ParseResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        tracing::debug!(
            options = self.registry.options().count(),
            positionals = self.registry.positionals().count(),
            "parsing arguments"
        );
        let mut engine = Engine {
            config: &self.config,
            registry: &mut self.registry,
        };
        match engine.run(args.into_iter()) {
            Ok(()) => {
                tracing::debug!("arguments parsed");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "argument parsing failed");
                Err(err)
            }
        }
    }
}

impl<T: 'static> Index<&ValueHandle<T>> for Parser {
    type Output = T;

    fn index(&self, handle: &ValueHandle<T>) -> &T {
        &self.registry[handle]
    }
}

/// `token` minus `prefix`, if it has the prefix and something after it.
fn strip_flag_prefix<'t>(token: &'t str, prefix: &str) -> Option<&'t str> {
    token.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

fn assign(
    declaration: &mut Declaration,
    raw: &str,
    target: impl FnOnce() -> Target,
) -> ParseResult<()> {
    declaration
        .parse_value(raw)
        .map_err(|source| ParseError::InvalidValue {
            target: target(),
            source,
        })
}

struct Engine<'p> {
    config: &'p ParserConfig,
    registry: &'p mut Registry,
}

impl Engine<'_> {
    fn run<J>(&mut self, mut tokens: J) -> ParseResult<()>
    where
        J: Iterator,
        J::Item: AsRef<str>,
    {
        let mut terminated = false;

        while let Some(item) = tokens.next() {
            let token = item.as_ref();

            if !terminated {
                if token == self.config.terminator {
                    tracing::trace!(token, "option terminator");
                    terminated = true;
                    continue;
                }
                if let Some(body) = strip_flag_prefix(token, &self.config.long_prefix) {
                    tracing::trace!(token, "long flag");
                    self.long_flag(body, &mut tokens)?;
                    continue;
                }
                if let Some(body) = strip_flag_prefix(token, &self.config.short_prefix) {
                    tracing::trace!(token, "short flag cluster");
                    self.short_flags(body, &mut tokens)?;
                    continue;
                }
            }

            tracing::trace!(token, terminated, "positional");
            self.positional(token)?;
        }

        Ok(())
    }

    fn long_display(&self, name: &str) -> String {
        format!("{}{name}", self.config.long_prefix)
    }

    // --name, --name=value, --name value
    fn long_flag<J>(&mut self, body: &str, tokens: &mut J) -> ParseResult<()>
    where
        J: Iterator,
        J::Item: AsRef<str>,
    {
        let separator = self.config.long_separator.as_str();
        let (name, inline) = match body.split_once(separator) {
            Some((name, value)) if !separator.is_empty() => (name, Some(value)),
            _ => (body, None),
        };
        let flag = self.long_display(name);

        let Some(declaration) = self
            .registry
            .find_option_by_long(name)
            .and_then(|id| self.registry.declaration_mut(&id))
        else {
            return Err(ParseError::UnmatchedFlag { flag });
        };
        declaration.set_matched(true);

        if !declaration.takes_value() {
            return match inline {
                Some(value) => Err(ParseError::UnexpectedValueOnFlag {
                    flag,
                    value: value.to_string(),
                }),
                None => Ok(()),
            };
        }

        match inline {
            Some(value) => {
                if !self.config.allow_joined_long {
                    return Err(ParseError::DisallowedJoinedValue { flag });
                }
                assign(declaration, value, || Target::Flag(flag))
            }
            None => {
                let Some(next) = tokens.next() else {
                    return Err(ParseError::MissingValue { flag });
                };
                if !self.config.allow_separate_long {
                    return Err(ParseError::DisallowedSeparateValue { flag });
                }
                assign(declaration, next.as_ref(), || Target::Flag(flag))
            }
        }
    }

    // -abc, -d5, -d 5
    fn short_flags<J>(&mut self, body: &str, tokens: &mut J) -> ParseResult<()>
    where
        J: Iterator,
        J::Item: AsRef<str>,
    {
        for (idx, c) in body.char_indices() {
            let flag = || format!("{}{c}", self.config.short_prefix);
            let Some(declaration) = self
                .registry
                .find_option_by_short(c)
                .and_then(|id| self.registry.declaration_mut(&id))
            else {
                return Err(ParseError::UnmatchedFlag { flag: flag() });
            };
            declaration.set_matched(true);

            if !declaration.takes_value() {
                continue;
            }

            // A value-bearing flag swallows the rest of the cluster.
            let rest = &body[idx + c.len_utf8()..];
            if !rest.is_empty() {
                if !self.config.allow_joined_short {
                    return Err(ParseError::DisallowedJoinedValue { flag: flag() });
                }
                return assign(declaration, rest, || Target::Flag(flag()));
            }

            let Some(next) = tokens.next() else {
                return Err(ParseError::MissingValue { flag: flag() });
            };
            if !self.config.allow_separate_short {
                return Err(ParseError::DisallowedSeparateValue { flag: flag() });
            }
            return assign(declaration, next.as_ref(), || Target::Flag(flag()));
        }

        Ok(())
    }

    fn positional(&mut self, token: &str) -> ParseResult<()> {
        let Some(declaration) = self
            .registry
            .next_unmatched_positional()
            .and_then(|id| self.registry.declaration_mut(&id))
        else {
            return Err(ParseError::NoPositionalSlot {
                token: token.to_string(),
            });
        };
        if let Err(source) = declaration.parse_value(token) {
            return Err(ParseError::InvalidValue {
                target: Target::Positional(declaration.name().to_string()),
                source,
            });
        }
        declaration.set_matched(true);
        Ok(())
    }
}
