//! CLI entry point for socket-matched tile grid generation

use clap::Parser;
use tilewave::io::cli::{Cli, Generator};

// The text rendering of the grid is the program's primary output
#[allow(clippy::print_stdout)]
fn main() -> tilewave::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let generator = Generator::new(cli);
    let outcome = generator.run()?;

    print!("{}", outcome.snapshot);
    Ok(())
}
