use anyhow::Result;
use clap::Parser;
use cv_gen::cli::Cli;
use cv_gen::utils::logging;
use cv_gen::{App, Config, Outcome};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::UrlFailures) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    // config file, then environment
    let config = Config::load(cli.config.as_deref())?;

    // -d wins over the configured level; RUST_LOG wins over both
    let level = cli
        .debug
        .map(|level| level.as_filter().to_string())
        .unwrap_or_else(|| config.log_level.clone());
    logging::init(&level);

    // run the subcommand
    let mut app = App::initialize(config, cli.out_dir, &cli.command).await?;
    app.run(&cli.command).await
}
