//! VidTrim Library
//!
//! Core of a self-hosted video trim utility: an asset registry indexed
//! by opaque ids, trim and preview jobs delegating to an external
//! ffmpeg engine, and filename-prefix recovery scans that let assets
//! survive a process restart without a database.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod ports;
pub mod registry;

// Re-export commonly used types
pub use app::VideoLibrary;
pub use config::AppConfig;
pub use domain::model::{Asset, AssetId, PreviewState, Timestamp, TrimOutput, TrimRange};
pub use error::{TrimError, TrimResult};
pub use jobs::{PreviewStatus, TrimOutcome, TrimRequest};
pub use ports::{EncodeOptions, MediaEngine};
