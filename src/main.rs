use color_eyre::Result;
use hvacdash::app::AppContext;
use hvacdash::cli::{parse_args, run_cli_command, CliCommand};
use hvacdash::logging;
use hvacdash::startup::DashboardConfig;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let command = parse_args(std::env::args());
    let config = match command {
        // Version and help must work even with a broken environment.
        CliCommand::Version | CliCommand::Help => DashboardConfig::default(),
        _ => DashboardConfig::from_env()?,
    };

    let ctx = AppContext::from_config(config)?;
    run_cli_command(&ctx, command).await
}
