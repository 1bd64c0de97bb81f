//! Flag names and the matcher that identifies a single option.

use std::collections::HashSet;

/// One flag name: a single short character or a long name.
///
/// Used to build a [`FlagSet`] from one mixed list without relying on
/// literal types to tell short and long names apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    Short(char),
    Long(String),
}

impl Flag {
    /// Convenience constructor for a long flag.
    pub fn long(name: impl Into<String>) -> Self {
        Self::Long(name.into())
    }
}

/// Immutable set of short and long aliases naming one option.
///
/// Matching is exact equality; there is no prefix or abbreviation matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    short: HashSet<char>,
    long: HashSet<String>,
}

impl FlagSet {
    /// Build from separate collections of short and long names.
    pub fn new<S, L>(short: S, long: L) -> Self
    where
        S: IntoIterator<Item = char>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            short: short.into_iter().collect(),
            long: long.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from one mixed list of [`Flag`]s.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = Flag>,
    {
        flags.into_iter().collect()
    }

    /// Whether `name` is one of this set's aliases.
    ///
    /// Accepts a `char` (short flag) or a `&str` (long flag).
    pub fn matches<N: FlagName>(&self, name: N) -> bool {
        name.is_in(self)
    }

    pub fn matches_short(&self, flag: char) -> bool {
        self.short.contains(&flag)
    }

    pub fn matches_long(&self, flag: &str) -> bool {
        self.long.contains(flag)
    }

    pub fn short_flags(&self) -> impl Iterator<Item = char> + '_ {
        self.short.iter().copied()
    }

    pub fn long_flags(&self) -> impl Iterator<Item = &str> + '_ {
        self.long.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.short.is_empty() && self.long.is_empty()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::default();
        for flag in iter {
            match flag {
                Flag::Short(c) => {
                    set.short.insert(c);
                }
                Flag::Long(name) => {
                    set.long.insert(name);
                }
            }
        }
        set
    }
}

/// A name a [`FlagSet`] can be asked about.
pub trait FlagName {
    fn is_in(self, set: &FlagSet) -> bool;
}

impl FlagName for char {
    fn is_in(self, set: &FlagSet) -> bool {
        set.matches_short(self)
    }
}

impl FlagName for &str {
    fn is_in(self, set: &FlagSet) -> bool {
        set.matches_long(self)
    }
}

impl FlagName for &String {
    fn is_in(self, set: &FlagSet) -> bool {
        set.matches_long(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Flag, FlagSet};

    #[test]
    fn mixed_list_splits_short_and_long() {
        let set = FlagSet::from_flags([Flag::Short('h'), Flag::long("help")]);
        assert!(set.matches('h'));
        assert!(set.matches("help"));
        assert!(!set.matches("h"));
        assert!(!set.matches('e'));
    }

    #[test]
    fn separate_collections() {
        let set = FlagSet::new(['f', 'F'], ["foo", "FoO"]);
        assert!(set.matches('f'));
        assert!(set.matches('F'));
        assert!(set.matches("foo"));
        assert!(set.matches("FoO"));
        assert!(!set.matches("FOO"));
    }

    #[test]
    fn no_prefix_matching() {
        let set = FlagSet::from_flags([Flag::long("verbose")]);
        assert!(!set.matches("verb"));
        assert!(!set.matches("verbose2"));
        assert!(set.matches(&"verbose".to_string()));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = FlagSet::default();
        assert!(set.is_empty());
        assert!(!set.matches('a'));
        assert!(!set.matches(""));
    }

    #[test]
    fn single_character_long_name_stays_long() {
        let set = FlagSet::from_flags([Flag::long("x")]);
        assert!(set.matches("x"));
        assert!(!set.matches('x'));
    }
}
