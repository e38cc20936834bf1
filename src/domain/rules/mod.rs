// Domain rules - Playability policy, import filtering, output naming

use std::path::Path;

/// Codec tags common web video players decode without server-side
/// conversion. Anything else gets a derived preview.
const BROWSER_PLAYABLE_CODECS: [&str; 5] = ["h264", "avc1", "vp8", "vp9", "av1"];

/// Extensions accepted at import
const ALLOWED_EXTENSIONS: [&str; 8] = ["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "mts"];

/// Whether a probed codec tag is in the browser allow-list
pub fn is_browser_playable(codec: &str) -> bool {
    BROWSER_PLAYABLE_CODECS.contains(&codec.to_ascii_lowercase().as_str())
}

/// Whether a filename carries an extension accepted at import
pub fn is_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Reduce a user-supplied name to something safe to embed in an artifact
/// filename: last path component only, ASCII alphanumerics plus `.`,
/// `-` and `_`, no leading dots.
pub fn sanitize_filename(raw: &str) -> String {
    let name = Path::new(raw)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Display name for a trim output: a non-empty custom name (trimmed of
/// surrounding whitespace) wins, else `{original_stem}_trimmed`. Trims
/// always re-encode into an MP4 container.
pub fn trim_output_name(original_filename: &str, custom_name: Option<&str>) -> String {
    if let Some(name) = custom_name.map(str::trim).filter(|n| !n.is_empty()) {
        return format!("{}.mp4", sanitize_filename(name));
    }

    let stem = Path::new(original_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "clip".to_string());
    format!("{}_trimmed.mp4", stem)
}

#[cfg(test)]
mod tests;
