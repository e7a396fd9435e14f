use std::process::ExitCode;

use clap::Parser;
use core_lib::{app::handle_check, cli::Cli, logging::init_logging};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match handle_check(&cli).await {
        Ok(outcome) => {
            info!("Exit: {outcome}");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
