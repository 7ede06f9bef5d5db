use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cgpa_predictor::cli::{report, Cli, Command};
use cgpa_predictor::config::Config;
use cgpa_predictor::server::start_api;

#[actix_web::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cgpa_predictor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            start_api(config.predictor(), &host, port)
                .await
                .context("HTTP server failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Predict(args) => {
            let request = args.request()?;
            let ok = report(
                &config.predictor(),
                &request,
                &mut io::stdout(),
                &mut io::stderr(),
            )?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
