mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(&args),
        Commands::Import {
            channel_id,
            payload,
            title,
            data_dir,
        } => commands::import::run(&channel_id, &payload, title.as_deref(), data_dir.as_deref()),
        Commands::Results {
            channel,
            show,
            data_dir,
        } => commands::results::run(channel.as_deref(), show, data_dir.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
