//! IronImpl - command-line entry point.

use std::process::ExitCode;

use ironimpl::cli::{Cli, Outcome, run};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests are errors to clap but exit 0.
            if e.print().is_err() {
                eprintln!("{e}");
            }
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(Outcome::Source(path)) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Archive(report)) => {
            println!("{} (Main-Class: {})", report.archive.display(), report.main_class);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ironimpl: {}", e.report());
            ExitCode::from(e.exit_code())
        }
    }
}
