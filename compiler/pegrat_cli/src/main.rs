//! pegrat calculator CLI

use pegrat_cli::{init_tracing, parse_args, read_source, run, CliError, USAGE};

fn main() {
    init_tracing();

    let result = parse_args(std::env::args().skip(1)).and_then(|options| {
        let text = read_source(&options.source)?;
        run(&options, &text)
    });

    match result {
        Ok(output) => println!("{output}"),
        Err(CliError::Usage(message)) => {
            eprintln!("error: {message}");
            if message != USAGE {
                eprintln!();
                eprintln!("{USAGE}");
            }
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
