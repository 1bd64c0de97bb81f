use anyhow::{Context, Result};
use argsplus::{
    Boolean, Declaration, Flag, FlagHandle, FlagSet, Float, Integer, Parser, ParserConfig,
    ProgramInfo, Text, ValueHandle,
};
use serde::Serialize;
use std::{fs, path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt};

/// Path to a JSON `ParserConfig`; unset means the default grammar.
const CONFIG_ENV: &str = "ARGSPLUS_CONFIG";

/// Exit status for command-line usage errors.
const USAGE_ERROR: u8 = 2;

struct DemoArgs {
    help: FlagHandle,
    boolean: FlagHandle,
    inverse: ValueHandle<bool>,
    double: ValueHandle<f64>,
    count: ValueHandle<u32>,
    name: ValueHandle<String>,
}

impl DemoArgs {
    fn register(parser: &mut Parser) -> Self {
        let help = parser
            .add_flag("HELP", flags('h', "help"))
            .help("Show this help text")
            .handle();
        let boolean = parser
            .add_flag("BOOLFLAG", flags('b', "bool"))
            .help("This is a boolean flag")
            .handle();
        let inverse = parser
            .add_option("INVBOOLFLAG", flags('i', "inverse"), Boolean)
            .default(false)
            .help("This is an inverse boolean flag")
            .handle();
        let double = parser
            .add_option("DUBFLAG", flags('d', "double"), Float::<f64>::new())
            .default(25.0)
            .help("This is some double flag")
            .handle();
        let count = parser
            .add_positional("COUNT", Integer::<u32>::new())
            .default(17)
            .help("How many times")
            .handle();
        let name = parser
            .add_positional("NAME", Text)
            .help("Who to greet")
            .handle();

        Self {
            help,
            boolean,
            inverse,
            double,
            count,
            name,
        }
    }

    fn report<'p>(&self, parser: &'p Parser) -> Report<'p> {
        Report {
            prog: &parser.program_info().prog,
            boolean: parser.matched(&self.boolean),
            inverse: Entry::read(parser, &self.inverse),
            double: Entry::read(parser, &self.double),
            count: Entry::read(parser, &self.count),
            name: Entry::read(parser, &self.name),
        }
    }
}

#[derive(Serialize)]
struct Report<'p> {
    prog: &'p str,
    #[serde(rename = "bool")]
    boolean: bool,
    inverse: Entry<'p, bool>,
    double: Entry<'p, f64>,
    count: Entry<'p, u32>,
    name: Entry<'p, String>,
}

#[derive(Serialize)]
struct Entry<'p, T> {
    matched: bool,
    value: &'p T,
}

impl<'p, T: 'static> Entry<'p, T> {
    fn read(parser: &'p Parser, handle: &ValueHandle<T>) -> Self {
        Self {
            matched: parser.matched(handle),
            value: parser.value(handle),
        }
    }
}

fn flags(short: char, long: &str) -> FlagSet {
    FlagSet::from_flags([Flag::Short(short), Flag::long(long)])
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let config = load_config()?;
    let mut parser = Parser::with_config(config).info(ProgramInfo::new(
        "This is a test program",
        "This is the big epilogue",
    ));
    let args = DemoArgs::register(&mut parser);

    if let Err(err) = parser.parse_env() {
        eprintln!("{}: {err}", parser.program_info().prog);
        return Ok(ExitCode::from(USAGE_ERROR));
    }

    if parser.matched(&args.help) {
        print!("{}", help(&parser));
        return Ok(ExitCode::SUCCESS);
    }

    let report = args.report(&parser);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

fn load_config() -> Result<ParserConfig> {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return Ok(ParserConfig::default());
    };
    let path = PathBuf::from(path);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read parser config: {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse parser config JSON: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded parser config");
    Ok(config)
}

fn format_flags(config: &ParserConfig, decl: &Declaration) -> String {
    let Some(flags) = decl.flags() else {
        return format!("[{}]", decl.name());
    };
    let mut short: Vec<char> = flags.short_flags().collect();
    let mut long: Vec<&str> = flags.long_flags().collect();
    short.sort_unstable();
    long.sort_unstable();

    let mut names: Vec<String> = short
        .into_iter()
        .map(|c| format!("{}{c}", config.short_prefix))
        .collect();
    names.extend(long.into_iter().map(|l| format!("{}{l}", config.long_prefix)));
    let mut out = names.join(", ");
    if decl.takes_value() {
        out.push_str(&format!(" <{}>", decl.name()));
    }
    out
}

fn push_rows<'d>(out: &mut String, title: &str, rows: impl Iterator<Item = (String, &'d str)>) {
    let rows: Vec<(String, &str)> = rows.collect();
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

fn help(parser: &Parser) -> String {
    let info = parser.program_info();
    let config = parser.config();
    let registry = parser.registry();

    let mut out = format!("Usage: {} [OPTIONS]", info.prog);
    for decl in registry.positionals() {
        out.push_str(&format!(" [{}]", decl.name()));
    }
    out.push('\n');

    if !info.description.trim().is_empty() {
        out.push('\n');
        out.push_str(info.description.trim_end());
        out.push('\n');
    }

    push_rows(
        &mut out,
        "Arguments",
        registry
            .positionals()
            .map(|d| (format_flags(config, d), d.help())),
    );
    push_rows(
        &mut out,
        "Options",
        registry
            .options()
            .map(|d| (format_flags(config, d), d.help())),
    );

    if !info.epilog.trim().is_empty() {
        out.push('\n');
        out.push_str(info.epilog.trim_end());
        out.push('\n');
    }
    out
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
