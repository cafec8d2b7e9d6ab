use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use log_indexer::config::{Cli, Settings};
use log_indexer::logging::init_tracing;
use log_indexer::IndexingError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let settings = match Settings::from_cli(cli) {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    match log_indexer::run(&settings).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(e: IndexingError) -> ExitCode {
    error!(error = %e, "Log indexer failed");
    eprintln!("Error: {}", e);
    ExitCode::FAILURE
}
