use clap::Parser;
use tracing_subscriber::EnvFilter;

use tank_drive_runtime::config::Args;
use tank_drive_runtime::drive::LoggingActuator;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();
    let config = match args.runtime_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let mut actuator = LoggingActuator::new();
    if let Err(e) = tank_drive_runtime::runtime::run(config, &mut actuator).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
