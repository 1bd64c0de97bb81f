//! Declared options and positionals.
//!
//! The registry owns every declaration in two arenas (options and
//! positionals). Callers get index handles back, which stay valid for the
//! registry's whole lifetime because declarations are never removed.

use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ConversionError;
use crate::flags::{FlagName, FlagSet};
use crate::value::ValueConverter;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Type-erased storage for one declaration's current and default value.
trait Slot: fmt::Debug {
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError>;
    fn value(&self) -> &dyn Any;
    fn value_mut(&mut self) -> &mut dyn Any;
    fn default_value(&self) -> &dyn Any;
    fn default_mut(&mut self) -> &mut dyn Any;
}

struct TypedSlot<C: ValueConverter> {
    converter: C,
    value: C::Value,
    default: C::Value,
}

impl<C> TypedSlot<C>
where
    C: ValueConverter,
    C::Value: Default,
{
    fn new(converter: C) -> Self {
        Self {
            converter,
            value: C::Value::default(),
            default: C::Value::default(),
        }
    }
}

impl<C: ValueConverter> fmt::Debug for TypedSlot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSlot")
            .field("type", &type_name::<C::Value>())
            .finish_non_exhaustive()
    }
}

impl<C> Slot for TypedSlot<C>
where
    C: ValueConverter,
    C::Value: 'static,
{
    fn assign(&mut self, raw: &str) -> Result<(), ConversionError> {
        self.value = self.converter.convert(raw)?;
        Ok(())
    }

    fn value(&self) -> &dyn Any {
        &self.value
    }

    fn value_mut(&mut self) -> &mut dyn Any {
        &mut self.value
    }

    fn default_value(&self) -> &dyn Any {
        &self.default
    }

    fn default_mut(&mut self) -> &mut dyn Any {
        &mut self.default
    }
}

#[derive(Debug)]
enum Kind {
    /// `slot` is `None` for flags that take no value.
    Option {
        flags: FlagSet,
        slot: Option<Box<dyn Slot>>,
    },
    Positional {
        slot: Box<dyn Slot>,
    },
}

/// One declared option or positional.
#[derive(Debug)]
pub struct Declaration {
    name: String,
    help: String,
    matched: bool,
    kind: Kind,
}

impl Declaration {
    fn new(name: String, kind: Kind) -> Self {
        Self {
            name,
            help: String::new(),
            matched: false,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn set_help(&mut self, help: impl Into<String>) {
        self.help = help.into();
    }

    /// Set by the parser on the first flag sighting or value assignment.
    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn set_matched(&mut self, matched: bool) {
        self.matched = matched;
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind, Kind::Positional { .. })
    }

    /// Whether a value must accompany this declaration.
    pub fn takes_value(&self) -> bool {
        self.slot().is_some()
    }

    /// Flag aliases, or `None` for positionals.
    pub fn flags(&self) -> Option<&FlagSet> {
        match &self.kind {
            Kind::Option { flags, .. } => Some(flags),
            Kind::Positional { .. } => None,
        }
    }

    /// Whether `name` identifies this option. Positionals never match.
    pub fn matches<N: FlagName>(&self, name: N) -> bool {
        self.flags().is_some_and(|flags| flags.matches(name))
    }

    /// Convert `raw` and store it as the current value.
    ///
    /// On failure the current value is left untouched.
    pub fn parse_value(&mut self, raw: &str) -> Result<(), ConversionError> {
        match self.slot_mut() {
            Some(slot) => slot.assign(raw),
            None => Err(ConversionError::new(raw, "nothing (flag takes no value)")),
        }
    }

    fn slot(&self) -> Option<&dyn Slot> {
        match &self.kind {
            Kind::Option { slot, .. } => slot.as_deref(),
            Kind::Positional { slot } => Some(slot.as_ref()),
        }
    }

    fn slot_mut(&mut self) -> Option<&mut (dyn Slot + 'static)> {
        match &mut self.kind {
            Kind::Option { slot, .. } => slot.as_deref_mut(),
            Kind::Positional { slot } => Some(slot.as_mut()),
        }
    }

    fn typed_value<T: 'static>(&self) -> Option<&T> {
        self.slot()?.value().downcast_ref::<T>()
    }

    fn typed_default<T: 'static>(&self) -> Option<&T> {
        self.slot()?.default_value().downcast_ref::<T>()
    }

    /// Sets both default and current value. Returns `false` on a type mismatch.
    fn store_default<T: Clone + 'static>(&mut self, value: T) -> bool {
        let Some(slot) = self.slot_mut() else {
            return false;
        };
        let Some(default) = slot.default_mut().downcast_mut::<T>() else {
            return false;
        };
        *default = value.clone();
        match slot.value_mut().downcast_mut::<T>() {
            Some(current) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    fn store_value<T: 'static>(&mut self, value: T) -> bool {
        match self
            .slot_mut()
            .and_then(|slot| slot.value_mut().downcast_mut::<T>())
        {
            Some(current) => {
                *current = value;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    Option,
    Positional,
}

/// Untyped reference to a declaration inside one [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarationId {
    registry: u64,
    section: Section,
    index: usize,
}

/// Typed handle to a value-bearing option or positional.
pub struct ValueHandle<T> {
    id: DeclarationId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ValueHandle<T> {
    fn new(id: DeclarationId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for ValueHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ValueHandle<T> {}

impl<T> fmt::Debug for ValueHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHandle")
            .field("id", &self.id)
            .field("type", &type_name::<T>())
            .finish()
    }
}

/// Handle to an option that takes no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagHandle {
    id: DeclarationId,
}

/// Anything that names a declaration.
pub trait Handle {
    fn id(&self) -> DeclarationId;
}

impl Handle for DeclarationId {
    fn id(&self) -> DeclarationId {
        *self
    }
}

impl<T> Handle for ValueHandle<T> {
    fn id(&self) -> DeclarationId {
        self.id
    }
}

impl Handle for FlagHandle {
    fn id(&self) -> DeclarationId {
        self.id
    }
}

/// Fluent view over a freshly registered value-bearing declaration.
pub struct Registration<'r, T> {
    declaration: &'r mut Declaration,
    handle: ValueHandle<T>,
}

impl<T: Clone + 'static> Registration<'_, T> {
    /// Set the default, which is also the value until a token assigns one.
    pub fn default(self, value: T) -> Self {
        self.declaration.store_default(value);
        self
    }
}

impl<T: 'static> Registration<'_, T> {
    pub fn help(self, help: impl Into<String>) -> Self {
        self.declaration.set_help(help);
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.declaration.typed_value::<T>()
    }

    pub fn matched(&self) -> bool {
        self.declaration.matched()
    }

    pub fn handle(&self) -> ValueHandle<T> {
        self.handle
    }
}

impl<T> From<Registration<'_, T>> for ValueHandle<T> {
    fn from(registration: Registration<'_, T>) -> Self {
        registration.handle
    }
}

/// Fluent view over a freshly registered flag.
pub struct FlagRegistration<'r> {
    declaration: &'r mut Declaration,
    handle: FlagHandle,
}

impl FlagRegistration<'_> {
    pub fn help(self, help: impl Into<String>) -> Self {
        self.declaration.set_help(help);
        self
    }

    pub fn handle(&self) -> FlagHandle {
        self.handle
    }
}

impl From<FlagRegistration<'_>> for FlagHandle {
    fn from(registration: FlagRegistration<'_>) -> Self {
        registration.handle
    }
}

/// Ordered options and positionals.
///
/// Option order breaks ties between overlapping flag sets (first registered
/// wins). Positional order is consumption order.
#[derive(Debug)]
pub struct Registry {
    id: u64,
    options: Vec<Declaration>,
    positionals: Vec<Declaration>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            options: Vec::new(),
            positionals: Vec::new(),
        }
    }

    fn push(
        &mut self,
        section: Section,
        declaration: Declaration,
    ) -> (DeclarationId, &mut Declaration) {
        let arena = match section {
            Section::Option => &mut self.options,
            Section::Positional => &mut self.positionals,
        };
        let index = arena.len();
        arena.push(declaration);
        let id = DeclarationId {
            registry: self.id,
            section,
            index,
        };
        (id, &mut arena[index])
    }

    /// Register a value-bearing option.
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
        let kind = Kind::Option {
            flags,
            slot: Some(Box::new(TypedSlot::new(converter))),
        };
        let (id, declaration) = self.push(Section::Option, Declaration::new(name.into(), kind));
        Registration {
            declaration,
            handle: ValueHandle::new(id),
        }
    }

    /// Register an option that takes no value; only its matched status is recorded.
    pub fn add_flag(&mut self, name: impl Into<String>, flags: FlagSet) -> FlagRegistration<'_> {
        let kind = Kind::Option { flags, slot: None };
        let (id, declaration) = self.push(Section::Option, Declaration::new(name.into(), kind));
        FlagRegistration {
            declaration,
            handle: FlagHandle { id },
        }
    }

    /// Register a positional. Positionals fill in registration order.
    pub fn add_positional<C>(
        &mut self,
        name: impl Into<String>,
        converter: C,
    ) -> Registration<'_, C::Value>
    where
        C: ValueConverter + 'static,
        C::Value: Default + 'static,
    {
        let kind = Kind::Positional {
            slot: Box::new(TypedSlot::new(converter)),
        };
        let (id, declaration) =
            self.push(Section::Positional, Declaration::new(name.into(), kind));
        Registration {
            declaration,
            handle: ValueHandle::new(id),
        }
    }

    /// First registered option whose short flags include `flag`.
    pub fn find_option_by_short(&self, flag: char) -> Option<DeclarationId> {
        self.find_option(|d| d.matches(flag))
    }

    /// First registered option whose long flags include `flag`.
    pub fn find_option_by_long(&self, flag: &str) -> Option<DeclarationId> {
        self.find_option(|d| d.matches(flag))
    }

    fn find_option(&self, pred: impl Fn(&Declaration) -> bool) -> Option<DeclarationId> {
        self.options
            .iter()
            .position(pred)
            .map(|index| self.make_id(Section::Option, index))
    }

    /// First positional, in registration order, that has not matched yet.
    pub fn next_unmatched_positional(&self) -> Option<DeclarationId> {
        self.positionals
            .iter()
            .position(|d| !d.matched())
            .map(|index| self.make_id(Section::Positional, index))
    }

    fn make_id(&self, section: Section, index: usize) -> DeclarationId {
        DeclarationId {
            registry: self.id,
            section,
            index,
        }
    }

    pub fn options(&self) -> impl Iterator<Item = &Declaration> + '_ {
        self.options.iter()
    }

    pub fn positionals(&self) -> impl Iterator<Item = &Declaration> + '_ {
        self.positionals.iter()
    }

    /// `None` if the handle belongs to another registry.
    pub fn declaration<H: Handle>(&self, handle: &H) -> Option<&Declaration> {
        let id = handle.id();
        if id.registry != self.id {
            return None;
        }
        match id.section {
            Section::Option => self.options.get(id.index),
            Section::Positional => self.positionals.get(id.index),
        }
    }

    pub fn declaration_mut<H: Handle>(&mut self, handle: &H) -> Option<&mut Declaration> {
        let id = handle.id();
        if id.registry != self.id {
            return None;
        }
        match id.section {
            Section::Option => self.options.get_mut(id.index),
            Section::Positional => self.positionals.get_mut(id.index),
        }
    }

    /// Current value (the default until a token assigned one).
    pub fn value<T: 'static>(&self, handle: &ValueHandle<T>) -> Option<&T> {
        self.declaration(handle)?.typed_value::<T>()
    }

    pub fn default_value<T: 'static>(&self, handle: &ValueHandle<T>) -> Option<&T> {
        self.declaration(handle)?.typed_default::<T>()
    }

    /// Set default and current value. Returns `false` for a foreign handle.
    pub fn set_default<T: Clone + 'static>(&mut self, handle: &ValueHandle<T>, value: T) -> bool {
        self.declaration_mut(handle)
            .is_some_and(|d| d.store_default(value))
    }

    /// Overwrite the current value without touching the default.
    pub fn set_value<T: 'static>(&mut self, handle: &ValueHandle<T>, value: T) -> bool {
        self.declaration_mut(handle)
            .is_some_and(|d| d.store_value(value))
    }

    pub fn matched<H: Handle>(&self, handle: &H) -> bool {
        self.declaration(handle).is_some_and(Declaration::matched)
    }
}

impl<T: 'static> Index<&ValueHandle<T>> for Registry {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `handle` was issued by a different registry.
    fn index(&self, handle: &ValueHandle<T>) -> &T {
        match self.value(handle) {
            Some(value) => value,
            None => panic!("{handle:?} does not belong to this registry"),
        }
    }
}
