use clap::Parser;
use signalbench::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
