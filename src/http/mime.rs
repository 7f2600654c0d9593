//! Media type lookup module
//!
//! Maps a file extension (without the leading dot) to its MIME type.
//! Unknown extensions yield `None`; callers leave `Content-Type` unset in that case.

/// Look up the media type registered for a file extension
///
/// Matching ignores ASCII case, so `HTML` and `html` resolve the same way.
///
/// # Examples
/// ```
/// use fileserve::http::mime::media_type;
/// assert_eq!(media_type("html"), Some("text/html; charset=utf-8"));
/// assert_eq!(media_type("PNG"), Some("image/png"));
/// assert_eq!(media_type("bin"), None);
/// ```
pub fn media_type(extension: &str) -> Option<&'static str> {
    let extension = extension.to_ascii_lowercase();
    let media_type = match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "text" => "text/plain; charset=utf-8",
        "md" | "markdown" => "text/markdown; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(media_type("html"), Some("text/html; charset=utf-8"));
        assert_eq!(media_type("css"), Some("text/css; charset=utf-8"));
        assert_eq!(media_type("js"), Some("application/javascript"));
        assert_eq!(media_type("json"), Some("application/json"));
        assert_eq!(media_type("png"), Some("image/png"));
        assert_eq!(media_type("mp4"), Some("video/mp4"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(media_type("HTML"), media_type("html"));
        assert_eq!(media_type("JpEg"), Some("image/jpeg"));
    }

    #[test]
    fn test_unregistered_extension() {
        assert_eq!(media_type("bin"), None);
        assert_eq!(media_type("xyz"), None);
        assert_eq!(media_type(""), None);
    }
}
