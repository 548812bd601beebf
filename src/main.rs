use clap::Parser;

use farm_demo::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};
use farm_demo::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    execute_command(&cli, settings.clone()).await?;
    if cli.is_dry_run() {
        return Ok(());
    }

    Server::new(settings).run().await
}
