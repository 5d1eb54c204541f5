//! caas entry point.

use clap::Parser;

use caas::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => caas::cli::commands::serve::execute(args, config).await,
        Commands::Migrate(args) => caas::cli::commands::migrate::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        caas::cli::handle_error(err, cli.json);
    }
}
