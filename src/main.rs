use clap::Parser;
use mediatidy::cli::{CliArgs, run_cli};
use mediatidy::output::OutputFormatter;
use mediatidy::prompt::ConsolePrompter;
use std::env;

fn main() {
    let args = CliArgs::parse();

    let directory = match args.directory {
        Some(dir) => dir,
        None => match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                OutputFormatter::error(&format!("Cannot determine current directory: {}", e));
                return;
            }
        },
    };

    // Dropped at the end of main on every path, which releases stdin.
    let mut prompter = ConsolePrompter::stdio();

    if let Err(e) = run_cli(&directory, args.config.as_deref(), &mut prompter) {
        OutputFormatter::error(&e);
    }
}
