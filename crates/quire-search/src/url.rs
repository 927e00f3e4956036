//! Absolute URL construction.

use quire_config::SiteConfig;

/// Join a relative path onto a base URL with exactly one slash between them.
///
/// # Examples
///
/// ```
/// use quire_search::join_url;
///
/// assert_eq!(join_url("https://docs.example.com/v2", "guides/intro"), "https://docs.example.com/v2/guides/intro");
/// assert_eq!(join_url("https://docs.example.com/v2/", "/guides/intro"), "https://docs.example.com/v2/guides/intro");
/// ```
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Resolves site-relative paths to absolute URLs.
pub trait Linker: Send + Sync {
    /// Absolute URL of a path relative to the current site.
    fn to_absolute(&self, path: &str) -> String;
}

/// Linker rooted at the site's published URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteLinker {
    base_url: String,
}

impl SiteLinker {
    /// Create a linker for a site published at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Create a linker from site configuration.
    #[must_use]
    pub fn from_config(site: &SiteConfig) -> Self {
        Self::new(site.base_url.clone())
    }
}

impl Linker for SiteLinker {
    fn to_absolute(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_adds_missing_slash() {
        assert_eq!(join_url("https://a.com/docs", "intro"), "https://a.com/docs/intro");
    }

    #[test]
    fn test_join_url_strips_duplicate_slash() {
        assert_eq!(join_url("https://a.com/docs/", "/intro"), "https://a.com/docs/intro");
    }

    #[test]
    fn test_join_url_keeps_single_slash() {
        assert_eq!(join_url("https://a.com/docs/", "intro"), "https://a.com/docs/intro");
        assert_eq!(join_url("https://a.com/docs", "/intro"), "https://a.com/docs/intro");
    }

    #[test]
    fn test_join_url_empty_path_is_root() {
        assert_eq!(join_url("https://a.com/docs", ""), "https://a.com/docs/");
    }

    #[test]
    fn test_join_url_keeps_anchor() {
        assert_eq!(
            join_url("https://a.com", "guides/intro#setup"),
            "https://a.com/guides/intro#setup"
        );
    }

    #[test]
    fn test_site_linker() {
        let linker = SiteLinker::new("https://docs.example.com");

        assert_eq!(
            linker.to_absolute("reference/api"),
            "https://docs.example.com/reference/api"
        );
    }
}
