//! URL slicing helpers
//!
//! These functions avoid allocations and work directly on string slices. They
//! only need to pull the path out of a page `href`, so there is no full URL
//! parser here.

// =============================================================================
// Scheme
// =============================================================================

/// Get the position after "://".
#[inline]
pub fn get_scheme_end(url: &str) -> Option<usize> {
    let bytes = url.as_bytes();

    let colon_pos = bytes.iter().position(|&b| b == b':')?;
    let is_scheme_char = |b: &u8| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.');
    if colon_pos == 0 || !bytes[..colon_pos].iter().all(is_scheme_char) {
        return None;
    }

    if bytes.len() > colon_pos + 2
        && bytes[colon_pos + 1] == b'/'
        && bytes[colon_pos + 2] == b'/'
    {
        return Some(colon_pos + 3);
    }

    None
}

// =============================================================================
// Path
// =============================================================================

/// Extract the path portion of a URL, without query or fragment.
///
/// Relative references (starting with `/`) are accepted as-is so hosts can
/// pass `location.pathname`-style values too.
#[inline]
pub fn extract_path(url: &str) -> &str {
    let path_start = match get_scheme_end(url) {
        Some(scheme_end) => match url[scheme_end..].find(|c: char| matches!(c, '/' | '?' | '#')) {
            Some(i) if url.as_bytes()[scheme_end + i] == b'/' => scheme_end + i,
            _ => return "/",
        },
        None if url.starts_with('/') => 0,
        None => return "/",
    };

    let path_end = url[path_start..]
        .find(|c: char| matches!(c, '?' | '#'))
        .map(|i| path_start + i)
        .unwrap_or(url.len());

    &url[path_start..path_end]
}

/// The path segment that directly follows `marker` in `path`.
///
/// `marker` is a full `/name/` segment. Returns an empty slice when the marker
/// is absent or nothing follows it.
#[inline]
pub fn segment_after<'a>(path: &'a str, marker: &str) -> &'a str {
    let start = match path.find(marker) {
        Some(pos) => pos + marker.len(),
        None => return "",
    };

    let rest = &path[start..];
    let end = rest.find('/').unwrap_or(rest.len());
    &rest[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_scheme_end() {
        assert_eq!(get_scheme_end("https://example.com"), Some(8));
        assert_eq!(get_scheme_end("http://example.com"), Some(7));
        assert_eq!(get_scheme_end("/reel/abc"), None);
        assert_eq!(get_scheme_end("invalid"), None);
        assert_eq!(get_scheme_end("://nohost"), None);
    }

    #[test]
    fn test_extract_path() {
        assert_eq!(extract_path("https://example.com/reel/ABC?x=1#top"), "/reel/ABC");
        assert_eq!(extract_path("https://example.com/"), "/");
        assert_eq!(extract_path("https://example.com"), "/");
        assert_eq!(extract_path("https://example.com?next=/reel/1"), "/");
        assert_eq!(extract_path("https://example.com#/reel/1"), "/");
        assert_eq!(extract_path("/reel/ABC?x"), "/reel/ABC");
        assert_eq!(extract_path("garbage"), "/");
    }

    #[test]
    fn test_segment_after() {
        assert_eq!(segment_after("/reel/ABC123", "/reel/"), "ABC123");
        assert_eq!(segment_after("/reel/ABC123/comments", "/reel/"), "ABC123");
        assert_eq!(segment_after("/reel/", "/reel/"), "");
        assert_eq!(segment_after("/watch/ABC", "/reel/"), "");
        assert_eq!(segment_after("/user/reel/XYZ", "/reel/"), "XYZ");
    }
}
