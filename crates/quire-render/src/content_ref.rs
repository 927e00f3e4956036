//! Content references embedded in documents.
//!
//! A link or image destination such as `page:abc#install` points at content
//! managed by the site rather than at a URL.

/// Reference to site-managed content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentRef<'a> {
    /// Page, optionally at an anchor.
    Page {
        /// Page identifier.
        page_id: &'a str,
        /// Anchor within the page.
        anchor: Option<&'a str>,
    },
    /// Root of a space.
    Space {
        /// Space identifier.
        space_id: &'a str,
    },
    /// Uploaded file.
    File {
        /// File identifier.
        file_id: &'a str,
    },
}

impl<'a> ContentRef<'a> {
    /// Parse a link destination.
    ///
    /// Returns `None` for ordinary URLs and for references with an empty
    /// identifier.
    #[must_use]
    pub fn parse(destination: &'a str) -> Option<Self> {
        let (scheme, rest) = destination.split_once(':')?;
        let reference = match scheme {
            "page" => {
                let (page_id, anchor) = match rest.split_once('#') {
                    Some((page_id, anchor)) => (page_id, Some(anchor).filter(|a| !a.is_empty())),
                    None => (rest, None),
                };
                Self::Page { page_id, anchor }
            }
            "space" => Self::Space { space_id: rest },
            "file" => Self::File { file_id: rest },
            _ => return None,
        };
        if reference.id().is_empty() {
            return None;
        }
        Some(reference)
    }

    /// Identifier of the referenced content.
    #[must_use]
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Page { page_id, .. } => page_id,
            Self::Space { space_id } => space_id,
            Self::File { file_id } => file_id,
        }
    }
}

/// Target a content reference resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Absolute URL of the target.
    pub href: String,
    /// Title of the target, used when a link has no text of its own.
    pub text: Option<String>,
}

/// Resolves content references to URLs.
pub trait ContentRefResolver: Send + Sync {
    /// Resolve a reference, `None` if the target is unknown.
    fn resolve(&self, reference: &ContentRef<'_>) -> Option<ResolvedRef>;
}

/// Resolver that never resolves anything.
///
/// Used for content that must not link into the site, such as generated
/// answers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullContentRefs;

impl ContentRefResolver for NullContentRefs {
    fn resolve(&self, _reference: &ContentRef<'_>) -> Option<ResolvedRef> {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_page_with_anchor() {
        assert_eq!(
            ContentRef::parse("page:p1#install"),
            Some(ContentRef::Page {
                page_id: "p1",
                anchor: Some("install"),
            })
        );
    }

    #[test]
    fn test_parse_page_with_empty_anchor() {
        assert_eq!(
            ContentRef::parse("page:p1#"),
            Some(ContentRef::Page {
                page_id: "p1",
                anchor: None,
            })
        );
    }

    #[test]
    fn test_parse_space_and_file() {
        assert_eq!(
            ContentRef::parse("space:s1"),
            Some(ContentRef::Space { space_id: "s1" })
        );
        assert_eq!(
            ContentRef::parse("file:f1"),
            Some(ContentRef::File { file_id: "f1" })
        );
    }

    #[test]
    fn test_parse_ignores_urls() {
        assert!(ContentRef::parse("https://example.com").is_none());
        assert!(ContentRef::parse("mailto:team@example.com").is_none());
        assert!(ContentRef::parse("relative/path").is_none());
    }

    #[test]
    fn test_parse_rejects_empty_id() {
        assert!(ContentRef::parse("page:").is_none());
        assert!(ContentRef::parse("page:#anchor").is_none());
    }

    #[test]
    fn test_null_resolver() {
        let reference = ContentRef::Space { space_id: "s1" };

        assert!(NullContentRefs.resolve(&reference).is_none());
    }
}
