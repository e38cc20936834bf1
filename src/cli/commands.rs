//! Command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::FfmpegEngine;
use crate::app::VideoLibrary;
use crate::cli::args::{
    DeleteArgs, DurationArgs, ImportArgs, ListArgs, PreviewArgs, StatusArgs, TrimArgs,
};
use crate::config::AppConfig;
use crate::domain::model::{Asset, AssetId, PreviewState, Timestamp};
use crate::jobs::trim::TrimRequest;

/// Assemble the library over the configured data directory
pub async fn build_library(config: &AppConfig) -> Result<VideoLibrary> {
    let engine = FfmpegEngine::new(&config.engine.ffmpeg_bin, &config.engine.ffprobe_bin);
    if !engine.is_available().await {
        warn!(
            ffprobe = %config.engine.ffprobe_bin.display(),
            "ffprobe did not respond; probing and encoding will fail"
        );
    }
    VideoLibrary::new(config, Arc::new(engine)).context("failed to initialize video library")
}

/// Execute the import command
pub async fn import(library: &VideoLibrary, args: ImportArgs) -> Result<()> {
    let asset = library.import(&args.file).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&asset)?);
    } else {
        println!("Imported {} as {}", asset.original_filename, asset.id);
        if !asset.browser_playable {
            println!("Codec is not browser-playable; run `vidtrim preview --id {}`", asset.id);
        }
    }
    Ok(())
}

/// Execute the trim command
pub async fn trim(library: &VideoLibrary, args: TrimArgs) -> Result<()> {
    let id = AssetId::parse(&args.id)?;
    info!(asset = %id, start = %args.start, end = ?args.end, "trim requested");

    let outcome = library
        .trim(TrimRequest {
            id,
            start: args.start,
            end: args.end,
            output_name: args.name,
        })
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "Wrote {} ({} - {})",
            outcome.output_path.display(),
            Timestamp::from_seconds(outcome.range.start),
            Timestamp::from_seconds(outcome.range.end),
        );
    }
    Ok(())
}

/// Execute the duration command
pub async fn duration(library: &VideoLibrary, args: DurationArgs) -> Result<()> {
    let id = AssetId::parse(&args.id)?;
    let seconds = library.duration(&id).await?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "duration": seconds,
                "duration_str": Timestamp::from_seconds(seconds).format(),
            })
        );
    } else {
        println!("Duration: {}", Timestamp::from_seconds(seconds));
    }
    Ok(())
}

/// Execute the preview command
pub async fn preview(library: &VideoLibrary, args: PreviewArgs) -> Result<()> {
    let id = AssetId::parse(&args.id)?;
    let state = library.ensure_preview(&id).await?;
    let status = library.preview_status(&id)?;

    match state {
        PreviewState::Ready => println!(
            "Preview ready: {}",
            library.registry().layout().preview_path(&id).display()
        ),
        _ if status.playable => println!("Source is browser-playable; no preview needed"),
        other => println!("Preview: {}", other),
    }
    Ok(())
}

/// Execute the status command
pub async fn status(library: &VideoLibrary, args: StatusArgs) -> Result<()> {
    let id = AssetId::parse(&args.id)?;
    let status = library.preview_status(&id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Preview exists: {}", status.exists);
        println!("Browser playable: {}", status.playable);
        println!("Use preview: {}", status.use_preview);
        println!("State: {}", status.state);
    }
    Ok(())
}

/// Execute the delete command
pub async fn delete(library: &VideoLibrary, args: DeleteArgs) -> Result<()> {
    let id = AssetId::parse(&args.id)?;
    library.delete(&id).await?;
    println!("Deleted {}", id);
    Ok(())
}

/// Execute the list command
pub async fn list(library: &VideoLibrary, args: ListArgs) -> Result<()> {
    let assets = library.list();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
        return Ok(());
    }

    if assets.is_empty() {
        println!("No videos imported");
        return Ok(());
    }
    for asset in assets {
        println!("{}  {}  {}", asset.id, asset.original_filename, describe(&asset));
    }
    Ok(())
}

fn describe(asset: &Asset) -> String {
    let duration = if asset.has_duration() {
        Timestamp::from_seconds(asset.duration_seconds).format()
    } else {
        "unprobed".to_string()
    };
    format!("duration: {}, preview: {}", duration, asset.preview_state)
}
