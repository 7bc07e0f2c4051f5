use std::process::ExitCode;

use clap::Parser;
use scripts::cli::Cli;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli {
        priv_key,
        rpc_url,
        deployments_path,
        artifacts_dir,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match command
        .run(&priv_key, &rpc_url, &deployments_path, &artifacts_dir)
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
