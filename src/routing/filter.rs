//! Path pre-filter.
//!
//! Framework internals, API routes and static files never reach host
//! routing; they are passed to the upstream untouched. A path counts as a
//! static file when its last segment looks like `name.ext`, at any depth
//! (`/favicon.ico`, `/blog/cover.png`).

use crate::config::FilterConfig;

/// Decides whether a path is subject to host routing.
#[derive(Debug, Clone)]
pub struct PathFilter {
    excluded_prefixes: Vec<String>,
    skip_static_files: bool,
}

impl PathFilter {
    pub fn new(excluded_prefixes: Vec<String>, skip_static_files: bool) -> Self {
        Self {
            excluded_prefixes,
            skip_static_files,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.excluded_prefixes.clone(), config.skip_static_files)
    }

    /// Returns true if the request should go through the host router.
    pub fn should_route(&self, path: &str) -> bool {
        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return false;
        }
        !(self.skip_static_files && is_static_asset(path))
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

/// True when the last path segment looks like a file name (`name.ext`).
///
/// The segment must start with `[\w-]+\.\w+`, where `\w` is ASCII
/// alphanumeric or `_`.
pub fn is_static_asset(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or_default();
    let bytes = segment.as_bytes();

    let stem = bytes
        .iter()
        .take_while(|&&b| is_word(b) || b == b'-')
        .count();
    if stem == 0 || bytes.get(stem) != Some(&b'.') {
        return false;
    }
    bytes.get(stem + 1).is_some_and(|&b| is_word(b))
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_prefixes() {
        let filter = PathFilter::default();
        assert!(!filter.should_route("/api/users"));
        assert!(!filter.should_route("/_next/static/chunk.js"));
        assert!(!filter.should_route("/_static/logo"));
        assert!(!filter.should_route("/_vercel/insights/script"));
        assert!(!filter.should_route("/_vercel"));
    }

    #[test]
    fn test_api_without_trailing_slash_is_routed() {
        let filter = PathFilter::default();
        assert!(filter.should_route("/api"));
        assert!(filter.should_route("/apis"));
    }

    #[test]
    fn test_static_files_pass_through() {
        let filter = PathFilter::default();
        assert!(!filter.should_route("/favicon.ico"));
        assert!(!filter.should_route("/robots.txt"));
        assert!(!filter.should_route("/og-image_2.png"));
        assert!(!filter.should_route("/assets/jquery.min.js"));
    }

    #[test]
    fn test_nested_files_pass_through() {
        let filter = PathFilter::default();
        assert!(!filter.should_route("/blog/cover.png"));
        assert!(!filter.should_route("/docs/v2/guide.pdf"));
        assert!(filter.should_route("/blog/cover"));
    }

    #[test]
    fn test_pages_are_routed() {
        let filter = PathFilter::default();
        for path in ["/", "/about", "/blog/first-post", "/login", "/.well-known", "/v1."] {
            assert!(filter.should_route(path), "{} should be routed", path);
        }
    }

    #[test]
    fn test_static_check_can_be_disabled() {
        let filter = PathFilter::new(Vec::new(), false);
        assert!(filter.should_route("/favicon.ico"));
        assert!(filter.should_route("/api/users"));
    }

    #[test]
    fn test_is_static_asset() {
        assert!(is_static_asset("/sitemap.xml"));
        assert!(!is_static_asset("/docs/"));
        assert!(!is_static_asset(""));
        assert!(!is_static_asset("/a.-b"));
    }
}
