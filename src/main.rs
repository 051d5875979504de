use clap::Parser;

use sharecache::adapter::inbound::cli::command::{Cli, Commands};
use sharecache::adapter::inbound::cli::output::{self, OutputConfig};
use sharecache::adapter::inbound::cli::{check, inspect, list, run};
use sharecache::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = dispatch(cli.command).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::execute(&args.config).await,
        Commands::Check(args) => check::execute(&args.config),
        Commands::List(args) => list::execute(&args.config),
        Commands::Inspect(args) => inspect::execute(&args),
    }
}
