//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Video file to import
    pub file: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Asset id returned by import
    #[arg(short, long)]
    pub id: String,

    /// Start time in seconds, optional 's' suffix (e.g. 2.000s)
    #[arg(short, long, default_value = "0s")]
    pub start: String,

    /// End time; defaults to the full duration
    #[arg(short, long)]
    pub end: Option<String>,

    /// Custom output base name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the duration command
#[derive(Args, Debug)]
pub struct DurationArgs {
    /// Asset id returned by import
    #[arg(short, long)]
    pub id: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Asset id returned by import
    #[arg(short, long)]
    pub id: String,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Asset id returned by import
    #[arg(short, long)]
    pub id: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Asset id returned by import
    #[arg(short, long)]
    pub id: String,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
