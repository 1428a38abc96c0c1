//! pgo - CLI for the PostgreSQL Operator API server.

use clap::Parser;

use pgoctl::{error, logging, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug());

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(error::exit_code(&e));
    }
}
