use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use trustloop_cli::cli::{Cli, Commands};
use trustloop_telemetry::{
    LogFormat, init_telemetry_with_format, init_with_otlp, shutdown_telemetry,
};

const SERVICE_NAME: &str = "trustloop";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let format: LogFormat = cli.log_format.parse().map_err(anyhow::Error::msg)?;
    let telemetry = match &cli.otlp_endpoint {
        Some(endpoint) => init_with_otlp(SERVICE_NAME, endpoint),
        None => init_telemetry_with_format(SERVICE_NAME, format),
    };
    telemetry.map_err(|e| anyhow::anyhow!(e))?;

    let status = match cli.command {
        Commands::Run(args) => trustloop_cli::run::run(args).await,
    };

    if cli.otlp_endpoint.is_some() {
        shutdown_telemetry();
    }
    Ok(ExitCode::from(status?))
}
