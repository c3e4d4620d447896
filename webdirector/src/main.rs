mod config;
mod logging;
mod statsd;

use clap::{Args, Parser};
use config::Config;
use std::error::Error;
use std::path::PathBuf;

/// Decides which backend host:port should serve each storage request.
#[derive(Parser)]
#[command(name = "webdirector", version)]
enum CliCommand {
    /// Serve routing decisions
    Run(ConfigArgs),
    /// Validate the configuration and exit
    CheckConfig(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to the YAML configuration file
    #[arg(long, short, default_value = "webdirector.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = CliCommand::parse();

    match cli {
        CliCommand::Run(args) => run(args),
        CliCommand::CheckConfig(args) => {
            let config = Config::from_file(&args.config)?;
            config.validate()?;
            println!("{}: ok", args.config.display());
            Ok(())
        }
    }
}

fn run(args: ConfigArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::from_file(&args.config)?;
    config.validate()?;

    let _sentry_guard = logging::init(config.common.logging.as_ref());
    statsd::init(config.common.metrics.as_ref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        tokio::select! {
            result = director::run(config.director) => result.map_err(Box::<dyn Error>::from),
            signal = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                signal.map_err(Box::<dyn Error>::from)
            }
        }
    })
}
