//! CLI module for VidTrim
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// VidTrim
///
/// Self-hosted video trimming: import a video, cut a clip by start/end
/// time, and prepare a browser-safe preview when the codec needs one.
#[derive(Parser)]
#[command(name = "vidtrim")]
#[command(about = "VidTrim - Import videos, cut clips, prepare browser-safe previews")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "VIDTRIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Import a video file into the library
    Import(args::ImportArgs),
    /// Cut a clip from an imported video
    Trim(args::TrimArgs),
    /// Report a video's duration, probing the file on first access
    Duration(args::DurationArgs),
    /// Produce the browser-compatible preview if the codec needs one
    Preview(args::PreviewArgs),
    /// Report preview availability and playability
    Status(args::StatusArgs),
    /// Delete a video and every derived artifact
    Delete(args::DeleteArgs),
    /// List known videos, including ones recovered from disk
    List(args::ListArgs),
}
