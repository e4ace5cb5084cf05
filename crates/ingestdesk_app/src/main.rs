mod console;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = console::Cli::parse();
    match console::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
