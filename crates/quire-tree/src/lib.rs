//! Page tree model and resolution for Quire.
//!
//! This crate provides:
//! - [`PageNode`]: tagged tree node (document, group, link)
//! - [`PageTree`]: immutable ordered forest of nodes with lookups
//! - Path and id resolution returning the document with its ancestor chain
//! - Previous/next navigation over the reading-order document sequence
//!
//! # Quick Start
//!
//! ```
//! use quire_tree::{PageNode, PageTree};
//!
//! let tree = PageTree::new(vec![PageNode::group(
//!     "guides",
//!     "Guides",
//!     vec![
//!         PageNode::document("a", "Intro", "intro", Vec::new()),
//!         PageNode::document("b", "Setup", "setup", Vec::new()),
//!     ],
//! )]);
//!
//! let resolved = tree.resolve_by_path("setup").unwrap();
//! assert_eq!(resolved.document.id, "b");
//!
//! let neighbors = tree.neighbors(resolved.document);
//! assert_eq!(neighbors.previous.map(|p| p.id.as_str()), Some("a"));
//! ```

mod node;
mod resolve;
mod sequence;

use serde::{Deserialize, Serialize};

pub use node::{DocumentPage, GroupPage, LinkPage, PageNode};
pub use resolve::{Ancestor, BreadcrumbItem, ResolvedPage};
pub use sequence::Neighbors;

/// Ordered forest of page nodes for one space.
///
/// The tree is a read-only snapshot. Every lookup borrows it and builds its
/// result fresh; nothing is cached between calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTree {
    pages: Vec<PageNode>,
}

impl PageTree {
    /// Create a tree from root-level nodes.
    #[must_use]
    pub fn new(pages: Vec<PageNode>) -> Self {
        Self { pages }
    }

    /// Root-level nodes.
    #[must_use]
    pub fn pages(&self) -> &[PageNode] {
        &self.pages
    }

    /// Resolve a document by path.
    ///
    /// # Arguments
    ///
    /// * `path` - Page path without leading slash, empty for the first document
    ///
    /// # Returns
    ///
    /// The document and its ancestors, `None` if nothing resolvable matches.
    #[must_use]
    pub fn resolve_by_path(&self, path: &str) -> Option<ResolvedPage<'_>> {
        resolve::resolve_by_path(&self.pages, path)
    }

    /// Resolve a document by identifier.
    ///
    /// A matching group resolves to its first nested document.
    #[must_use]
    pub fn resolve_by_id(&self, id: &str) -> Option<ResolvedPage<'_>> {
        resolve::resolve_by_id(&self.pages, id)
    }

    /// First document in reading order.
    #[must_use]
    pub fn first_document(&self) -> Option<ResolvedPage<'_>> {
        resolve::resolve_first_document(&self.pages, &mut Vec::new())
    }

    /// All documents in reading order.
    #[must_use]
    pub fn documents(&self) -> Vec<&DocumentPage> {
        let mut out = Vec::new();
        sequence::flatten_documents(&self.pages, &|_: &DocumentPage| true, &mut out);
        out
    }

    /// Previous and next documents in reading order.
    #[must_use]
    pub fn neighbors(&self, document: &DocumentPage) -> Neighbors<'_> {
        sequence::neighbors(&self.pages, document, &|_: &DocumentPage| true)
    }

    /// Previous and next documents among those accepted by `filter`.
    ///
    /// A rejected document is skipped together with its descendants.
    #[must_use]
    pub fn neighbors_matching(
        &self,
        document: &DocumentPage,
        filter: impl Fn(&DocumentPage) -> bool,
    ) -> Neighbors<'_> {
        sequence::neighbors(&self.pages, document, &filter)
    }

    /// Public path of a document.
    ///
    /// The first document is served at the space root, so its path is empty.
    #[must_use]
    pub fn page_path<'a>(&self, document: &'a DocumentPage) -> &'a str {
        match self.first_document() {
            Some(first) if first.document.id == document.id => "",
            _ => &document.path,
        }
    }
}

impl From<Vec<PageNode>> for PageTree {
    fn from(pages: Vec<PageNode>) -> Self {
        Self::new(pages)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(PageTree: Send, Sync);
    assert_impl_all!(ResolvedPage<'static>: Send, Sync);

    fn site_tree() -> PageTree {
        PageTree::new(vec![
            PageNode::group(
                "guides",
                "Guides",
                vec![
                    PageNode::document("a", "Intro", "intro", Vec::new()),
                    PageNode::group(
                        "sub",
                        "Sub",
                        vec![PageNode::document("b", "Deep", "intro/deep", Vec::new())],
                    ),
                ],
            ),
            PageNode::link("blog", "Blog", "https://example.com/blog"),
            PageNode::document(
                "ref",
                "Reference",
                "reference",
                vec![
                    DocumentPage {
                        id: "internal".to_owned(),
                        title: "Internal".to_owned(),
                        path: "reference/internal".to_owned(),
                        description: None,
                        hidden: false,
                        pages: Vec::new(),
                    }
                    .hidden()
                    .into(),
                    PageNode::document("api", "API", "reference/api", Vec::new()),
                ],
            ),
        ])
    }

    #[test]
    fn test_empty_path_equals_first_of_sequence() {
        let tree = site_tree();

        let resolved = tree.resolve_by_path("").unwrap();

        assert_eq!(resolved.document.id, tree.documents()[0].id);
    }

    #[test]
    fn test_empty_tree_first_document_is_none() {
        let tree = PageTree::default();

        assert!(tree.resolve_by_path("").is_none());
        assert!(tree.documents().is_empty());
    }

    #[test]
    fn test_every_document_resolves_by_its_path_and_id() {
        let tree = site_tree();

        for document in tree.documents() {
            let by_path = tree.resolve_by_path(&document.path).unwrap();
            let by_id = tree.resolve_by_id(&document.id).unwrap();

            assert_eq!(by_path.document.id, document.id);
            assert_eq!(by_path, by_id);
        }
    }

    #[test]
    fn test_documents_never_contain_links() {
        let tree = site_tree();

        let ids: Vec<&str> = tree.documents().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "ref", "internal", "api"]);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let tree = site_tree();

        assert_eq!(
            tree.resolve_by_path("reference/api"),
            tree.resolve_by_path("reference/api")
        );
        assert_eq!(tree.resolve_by_id("sub"), tree.resolve_by_id("sub"));
    }

    #[test]
    fn test_neighbors_cross_link_nodes() {
        let tree = site_tree();
        let deep = tree.resolve_by_id("b").unwrap().document;

        let neighbors = tree.neighbors(deep);

        assert_eq!(neighbors.previous.map(|p| p.id.as_str()), Some("a"));
        assert_eq!(neighbors.next.map(|p| p.id.as_str()), Some("ref"));
    }

    #[test]
    fn test_neighbors_matching_skips_hidden() {
        let tree = site_tree();
        let reference = tree.resolve_by_id("ref").unwrap().document;

        let neighbors = tree.neighbors_matching(reference, |page| !page.hidden);

        assert_eq!(neighbors.next.map(|p| p.id.as_str()), Some("api"));
    }

    #[test]
    fn test_page_path_of_first_document_is_empty() {
        let tree = site_tree();
        let first = tree.resolve_by_id("a").unwrap().document;
        let other = tree.resolve_by_id("api").unwrap().document;

        assert_eq!(tree.page_path(first), "");
        assert_eq!(tree.page_path(other), "reference/api");
    }

    #[test]
    fn test_deserialize_tree_from_array() {
        let json = r#"[{"type": "document", "id": "p", "title": "Page", "path": "page"}]"#;

        let tree: PageTree = serde_json::from_str(json).unwrap();

        assert_eq!(tree.resolve_by_path("page").unwrap().document.title, "Page");
    }
}
