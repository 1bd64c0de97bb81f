//! Process argument vector glue.

use std::ffi::OsString;

use crate::error::ParseResult;
use crate::parser::Parser;

impl Parser {
    /// Parse a full argument vector, program name first.
    ///
    /// The program name fills [`ProgramInfo::prog`](crate::ProgramInfo::prog)
    /// only when it is still empty. An empty `argv` parses as no arguments.
    pub fn parse_cli<I>(&mut self, argv: I) -> ParseResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut argv = argv.into_iter();
        if let Some(prog) = argv.next() {
            let info = self.program_info_mut();
            if info.prog.is_empty() {
                info.prog = prog.as_ref().to_string();
            }
        }
        self.parse(argv)
    }

    /// Parse this process's own arguments.
    ///
    /// Arguments that are not valid UTF-8 are converted lossily.
    pub fn parse_env(&mut self) -> ParseResult<()> {
        self.parse_cli(std::env::args_os().map(lossy))
    }
}

fn lossy(arg: OsString) -> String {
    match arg.into_string() {
        Ok(arg) => arg,
        Err(arg) => arg.to_string_lossy().into_owned(),
    }
}
