//! Declarative command-line argument parsing.
//!
//! Register options (short/long flags) and positionals on a [`Parser`], each
//! bound to a [`ValueConverter`], then hand it the argument list. Parsing is a
//! single pass that stops at the first [`ParseError`]; values and matched
//! status are read back through the handles returned at registration.
//!
//! Token grammar (all of it configurable through [`ParserConfig`]):
//! - `--` ends flag parsing; everything after it is positional
//! - `--name`, `--name=value`, `--name value`
//! - `-abc` clusters of short flags; a value-taking flag inside a cluster
//!   takes the rest of the cluster (`-ofile`) or the next token (`-o file`)
//! - anything else fills the next unmatched positional
//!
//! ```
//! use argsplus::{Flag, FlagSet, Float, Parser, Text};
//!
//! let mut parser = Parser::new();
//! let verbose = parser
//!     .add_flag("verbose", FlagSet::from_flags([Flag::Short('v'), Flag::long("verbose")]))
//!     .handle();
//! let scale = parser
//!     .add_option("scale", FlagSet::new(['s'], ["scale"]), Float::<f64>::new())
//!     .default(1.0)
//!     .handle();
//! let input = parser.add_positional("INPUT", Text).handle();
//!
//! parser.parse(["-vs", "2.5", "data.csv"]).unwrap();
//! assert!(parser.matched(&verbose));
//! assert_eq!(parser[&scale], 2.5);
//! assert_eq!(parser[&input], "data.csv");
//! ```

mod cli;
mod config;
mod error;
mod flags;
mod parser;
mod registry;
mod value;

pub use config::{ParserConfig, ProgramInfo};
pub use error::{ConversionError, ErrorKind, ParseError, ParseResult, Target};
pub use flags::{Flag, FlagName, FlagSet};
pub use parser::Parser;
pub use registry::{
    Declaration, DeclarationId, FlagHandle, FlagRegistration, Handle, Registration, Registry,
    ValueHandle,
};
pub use value::{Boolean, Float, FnConverter, Integer, Parsed, Text, ValueConverter, from_fn};
