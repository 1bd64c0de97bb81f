//! Parser grammar settings and program metadata.

use serde::{Deserialize, Serialize};

/// Token grammar used by the parser.
///
/// Every field is optional when deserializing; missing fields fall back to
/// the conventional `--long`, `-s`, `--long=value`, `--` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserConfig {
    pub long_prefix: String,
    pub short_prefix: String,
    /// Splits `--name=value`. Empty disables inline values for long flags.
    pub long_separator: String,
    /// After this token every remaining token is positional.
    pub terminator: String,
    /// `-d5`
    pub allow_joined_short: bool,
    /// `--double=5`
    pub allow_joined_long: bool,
    /// `-d 5`
    pub allow_separate_short: bool,
    /// `--double 5`
    pub allow_separate_long: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            long_prefix: "--".to_string(),
            short_prefix: "-".to_string(),
            long_separator: "=".to_string(),
            terminator: "--".to_string(),
            allow_joined_short: true,
            allow_joined_long: true,
            allow_separate_short: true,
            allow_separate_long: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn long_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.long_prefix = prefix.into();
        self
    }

    pub fn short_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.short_prefix = prefix.into();
        self
    }

    pub fn long_separator(mut self, separator: impl Into<String>) -> Self {
        self.long_separator = separator.into();
        self
    }

    pub fn terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    pub fn allow_joined_short(mut self, allow: bool) -> Self {
        self.allow_joined_short = allow;
        self
    }

    pub fn allow_joined_long(mut self, allow: bool) -> Self {
        self.allow_joined_long = allow;
        self
    }

    pub fn allow_separate_short(mut self, allow: bool) -> Self {
        self.allow_separate_short = allow;
        self
    }

    pub fn allow_separate_long(mut self, allow: bool) -> Self {
        self.allow_separate_long = allow;
        self
    }
}

/// Descriptive program data. Not consulted while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProgramInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prog: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub epilog: String,
}

impl ProgramInfo {
    pub fn new(description: impl Into<String>, epilog: impl Into<String>) -> Self {
        Self {
            prog: String::new(),
            description: description.into(),
            epilog: epilog.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParserConfig, ProgramInfo};

    #[test]
    fn defaults_are_conventional() {
        let config = ParserConfig::default();
        assert_eq!(config.long_prefix, "--");
        assert_eq!(config.short_prefix, "-");
        assert_eq!(config.long_separator, "=");
        assert_eq!(config.terminator, "--");
        assert!(config.allow_joined_short);
        assert!(config.allow_joined_long);
        assert!(config.allow_separate_short);
        assert!(config.allow_separate_long);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ParserConfig = serde_json::from_str(
            r#"{ "short-prefix": "/", "allow-separate-long": false }"#,
        )
        .unwrap();
        assert_eq!(config.short_prefix, "/");
        assert!(!config.allow_separate_long);
        assert_eq!(config.long_prefix, "--");
        assert!(config.allow_joined_long);
    }

    #[test]
    fn builder_setters() {
        let config = ParserConfig::new()
            .long_prefix("++")
            .long_separator(":")
            .terminator("---")
            .allow_joined_short(false);
        assert_eq!(config.long_prefix, "++");
        assert_eq!(config.long_separator, ":");
        assert_eq!(config.terminator, "---");
        assert!(!config.allow_joined_short);
    }

    #[test]
    fn program_info_skips_empty_fields() {
        let info = ProgramInfo::new("A test program", "");
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"description":"A test program"}"#);
    }
}
