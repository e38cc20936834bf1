// Unit tests for domain rules

#[cfg(test)]
mod tests {
    use crate::domain::rules::*;

    #[test]
    fn test_browser_playable_allow_list() {
        assert!(is_browser_playable("h264"));
        assert!(is_browser_playable("avc1"));
        assert!(is_browser_playable("vp8"));
        assert!(is_browser_playable("vp9"));
        assert!(is_browser_playable("av1"));
        assert!(is_browser_playable("H264")); // Case insensitive
    }

    #[test]
    fn test_browser_unplayable_codecs() {
        assert!(!is_browser_playable("hevc"));
        assert!(!is_browser_playable("mpeg2video"));
        assert!(!is_browser_playable("prores"));
        assert!(!is_browser_playable(""));
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_extension("clip.mp4"));
        assert!(is_allowed_extension("clip.MOV")); // Case insensitive
        assert!(is_allowed_extension("a.b.webm"));
        assert!(is_allowed_extension("clip.mts"));
    }

    #[test]
    fn test_disallowed_extensions() {
        assert!(!is_allowed_extension("notes.txt"));
        assert!(!is_allowed_extension("archive.tar.gz"));
        assert!(!is_allowed_extension("noextension"));
        assert!(!is_allowed_extension(""));
    }

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/clip.mov"), "clip.mov");
    }

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my clip (1).mp4"), "my_clip__1_.mp4");
        assert_eq!(sanitize_filename("über.mp4"), "_ber.mp4");
    }

    #[test]
    fn test_sanitize_filename_no_hidden_files() {
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_sanitize_filename_empty_fallback() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[test]
    fn test_trim_output_name_default() {
        assert_eq!(trim_output_name("clip.mov", None), "clip_trimmed.mp4");
        assert_eq!(trim_output_name("holiday.avi", None), "holiday_trimmed.mp4");
    }

    #[test]
    fn test_trim_output_name_custom() {
        assert_eq!(trim_output_name("clip.mov", Some("highlight")), "highlight.mp4");
        // Surrounding whitespace is trimmed before use
        assert_eq!(trim_output_name("clip.mov", Some("  best part  ")), "best_part.mp4");
    }

    #[test]
    fn test_trim_output_name_empty_custom_falls_back() {
        assert_eq!(trim_output_name("clip.mov", Some("")), "clip_trimmed.mp4");
        assert_eq!(trim_output_name("clip.mov", Some("   ")), "clip_trimmed.mp4");
    }
}
