//! Document rendering for Quire.
//!
//! Renders markdown documents to HTML, resolving links and images that point
//! at site content through a [`ContentRefResolver`].
//!
//! # Example
//!
//! ```
//! use quire_render::{DocumentRenderer, MarkdownRenderer, NullContentRefs, RenderContext};
//!
//! let html = MarkdownRenderer::new().render(
//!     "**Bold** text",
//!     &RenderContext::plain(&NullContentRefs),
//!     "space-y-5",
//! );
//! assert_eq!(html, r#"<div class="space-y-5"><p><strong>Bold</strong> text</p></div>"#);
//! ```

mod content_ref;
mod html;

pub use content_ref::{ContentRef, ContentRefResolver, NullContentRefs, ResolvedRef};
pub use html::{MarkdownRenderer, escape_html};

/// Settings for one render call.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Resolver for content references in links and images.
    pub content_refs: &'a dyn ContentRefResolver,
    /// Whether images may load lazily (content rendered offscreen).
    pub lazy: bool,
}

impl<'a> RenderContext<'a> {
    /// Context with eager images.
    #[must_use]
    pub fn plain(content_refs: &'a dyn ContentRefResolver) -> Self {
        Self {
            content_refs,
            lazy: false,
        }
    }
}

/// Renders a document to presentational output.
pub trait DocumentRenderer: Send + Sync {
    /// Render `document`, wrapping the output in an element styled with `style`.
    fn render(&self, document: &str, context: &RenderContext<'_>, style: &str) -> String;
}
