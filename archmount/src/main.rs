use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse_from(wild::args_os());

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.load()?;

    match cli.command {
        Commands::Mount(args) => commands::mount(config, args).await?,
        Commands::Unmount(args) => commands::unmount(config, args)?,
        Commands::List(args) => commands::list(config, args)?,
        Commands::Watch(args) => commands::watch(config, args).await?,
        Commands::Formats => commands::formats(config),
    };

    Ok(())
}
