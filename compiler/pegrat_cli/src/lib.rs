//! Calculator front end for the pegrat engine.
//!
//! `pegrat eval <expr>` evaluates an integer expression, `pegrat tree
//! <expr>` prints how it was grouped. `--trace` prints every rule
//! invocation to stderr, `--trace=log` routes the same events through
//! `tracing` (enable with `RUST_LOG=pegrat::trace=trace`).

pub mod calc;

use std::io::{self, Read};
use std::sync::Once;

use pegrat::{ParseContext, ParseError, ParserConfig, TracingSink, WriterSink};

use calc::EvalError;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
                .with(filter)
                .init();
        }
    });
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Eval,
    Tree,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceMode {
    #[default]
    Off,
    /// Indented event listing on stderr.
    Print,
    /// Events as `tracing` records.
    Log,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub command: Command,
    /// Expression text, or `-` to read standard input.
    pub source: String,
    pub memoize: bool,
    pub trace: TraceMode,
}

pub const USAGE: &str = "\
Usage: pegrat <command> <expr> [options]

Commands:
  eval <expr>     Evaluate an integer expression
  tree <expr>     Print the expression fully parenthesized

<expr> may be `-` to read standard input.

Options:
  --no-memo       Disable memoization
  --trace         Print rule invocations to stderr
  --trace=log     Emit rule invocations as tracing events";

/// Parse command-line arguments, without the program name.
pub fn parse_args<I>(args: I) -> Result<Options, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut command = None;
    let mut source = None;
    let mut memoize = true;
    let mut trace = TraceMode::Off;

    for arg in args {
        match arg.as_str() {
            "--no-memo" => memoize = false,
            "--trace" => trace = TraceMode::Print,
            "--trace=log" => trace = TraceMode::Log,
            "eval" if command.is_none() => command = Some(Command::Eval),
            "tree" if command.is_none() => command = Some(Command::Tree),
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option `{flag}`")));
            }
            _ if command.is_none() => {
                return Err(CliError::Usage(format!("unknown command `{arg}`")));
            }
            _ if source.is_none() => source = Some(arg),
            _ => return Err(CliError::Usage(format!("unexpected argument `{arg}`"))),
        }
    }

    let Some(command) = command else {
        return Err(CliError::Usage(USAGE.to_owned()));
    };
    let Some(source) = source else {
        return Err(CliError::Usage("missing expression".to_owned()));
    };
    Ok(Options {
        command,
        source,
        memoize,
        trace,
    })
}

/// The expression text named by `source`.
pub fn read_source(source: &str) -> Result<String, CliError> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(source.to_owned())
    }
}

/// Parse `text` and run the selected command on it.
pub fn run(options: &Options, text: &str) -> Result<String, CliError> {
    let config = ParserConfig::new().memoize(options.memoize);
    let mut ctx = ParseContext::with_config(text, config);
    match options.trace {
        TraceMode::Off => {}
        TraceMode::Print => ctx.add_sink(Box::new(WriterSink::new(io::stderr()))),
        TraceMode::Log => ctx.add_sink(Box::new(TracingSink)),
    }

    let expr = ctx.parse(calc::expression)?;
    tracing::debug!(command = ?options.command, cached = ctx.cache_len(), "parsed expression");
    match options.command {
        Command::Eval => Ok(expr.eval()?.to_string()),
        Command::Tree => Ok(expr.to_string()),
    }
}

#[cfg(test)]
mod tests;
