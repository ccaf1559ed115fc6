use clap::Parser;
use tracing::error;

use storefront::cli::{Cli, Commands};
use storefront::config::{get_config, init_config};
use storefront::runtime::modes::{run_cli, run_server};
use storefront::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = get_config();
            let _guard = init_logging(&config.logging)?;
            if let Err(e) = run_server().await {
                error!("Server exited with error: {:#}", e);
                return Err(e);
            }
            Ok(())
        }
        cmd => {
            if let Err(e) = run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
