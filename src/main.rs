use clap::Parser;
use tradetree::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
