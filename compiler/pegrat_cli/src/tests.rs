use super::*;
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|&s| s.to_owned()).collect()
}

fn options(command: Command, source: &str) -> Options {
    Options {
        command,
        source: source.to_owned(),
        memoize: true,
        trace: TraceMode::Off,
    }
}

#[test]
fn parse_command_and_flags() {
    let parsed = parse_args(args(&["tree", "--no-memo", "1+2", "--trace=log"]));
    assert_eq!(
        parsed.ok(),
        Some(Options {
            command: Command::Tree,
            source: "1+2".to_owned(),
            memoize: false,
            trace: TraceMode::Log,
        })
    );
}

#[test]
fn usage_errors() {
    assert!(matches!(parse_args(args(&[])), Err(CliError::Usage(msg)) if msg == USAGE));
    assert!(matches!(parse_args(args(&["eval"])), Err(CliError::Usage(_))));
    assert!(matches!(parse_args(args(&["frobnicate", "1"])), Err(CliError::Usage(_))));
    assert!(matches!(parse_args(args(&["eval", "--fast", "1"])), Err(CliError::Usage(_))));
    assert!(matches!(parse_args(args(&["eval", "1", "2"])), Err(CliError::Usage(_))));
}

#[test]
fn literal_source_is_used_verbatim() {
    assert_eq!(read_source("1 + 2").ok().as_deref(), Some("1 + 2"));
}

#[test]
fn eval_and_tree() {
    assert_eq!(run(&options(Command::Eval, ""), "2 * (3 + 4)").ok().as_deref(), Some("14"));
    assert_eq!(
        run(&options(Command::Tree, ""), "2 * (3 + 4)").ok().as_deref(),
        Some("(2 * (3 + 4))")
    );
}

#[test]
fn run_reports_parse_and_eval_errors() {
    let parse = run(&options(Command::Eval, ""), "2 *");
    assert!(matches!(parse, Err(CliError::Parse(ParseError::Syntax(_)))));

    let eval = run(&options(Command::Eval, ""), "1 / 0");
    assert_eq!(
        eval.map_err(|e| e.to_string()),
        Err("evaluation failed: division by zero".to_owned())
    );
}

#[test]
fn tracing_modes_do_not_change_results() {
    for trace in [TraceMode::Print, TraceMode::Log] {
        let opts = Options {
            trace,
            memoize: false,
            ..options(Command::Eval, "")
        };
        assert_eq!(run(&opts, "10 - 4 - 3").ok().as_deref(), Some("3"));
    }
}
