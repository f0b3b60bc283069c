use std::process;

use clap::Parser;

#[macro_use]
extern crate log;

/// Parse command line arguments and run `cismeta_rs::run()`
fn main() {
    // ----------------------------- Run CLI Parser
    let cli = parser::Cli::parse();

    // ----------------------------- Init logger.
    logger::Logger::init(cli.verbose, cli.quiet);

    // ----------------------------- Serialize command line arguments
    if let Err(e) = cli.serialize() {
        warn!("Failed to serialize the command line arguments: {e}");
    }

    // ----------------------------- Run the analysis.
    match cismeta_rs::run(&cli) {
        Ok(()) => (),
        Err(e) => {
            error!("{e:?}");
            process::exit(1);
        }
    };
}
