//! VidTrim CLI
//!
//! Self-hosted video trimming: import a video, cut a clip by start/end
//! time, and prepare a browser-safe preview when the codec needs one.
//! All decode/encode work is delegated to the ffmpeg binaries.
//!
//! # Usage
//!
//! ```bash
//! vidtrim import holiday.mov
//! vidtrim trim --id <id> --start 2.000s --end 7.000s
//! vidtrim status --id <id>
//! vidtrim delete --id <id>
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use vidtrim::cli::{commands, Cli, Commands};
use vidtrim::config::AppConfig;

/// Main entry point for the VidTrim CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let library = commands::build_library(&config).await?;

    // Execute the requested command
    match cli.command {
        Commands::Import(args) => commands::import(&library, args).await?,
        Commands::Trim(args) => commands::trim(&library, args).await?,
        Commands::Duration(args) => commands::duration(&library, args).await?,
        Commands::Preview(args) => commands::preview(&library, args).await?,
        Commands::Status(args) => commands::status(&library, args).await?,
        Commands::Delete(args) => commands::delete(&library, args).await?,
        Commands::List(args) => commands::list(&library, args).await?,
    }

    info!("vidtrim completed successfully");
    Ok(())
}
