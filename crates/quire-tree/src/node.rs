//! Page tree nodes.
//!
//! A page tree is an ordered forest of [`PageNode`] values. Child order is
//! navigation order. Three node kinds exist:
//!
//! - [`DocumentPage`]: content page, the only kind a lookup can return
//! - [`GroupPage`]: organizational node without content of its own
//! - [`LinkPage`]: redirect to another location, skipped by every resolver
//!
//! # Wire Format
//!
//! Nodes are internally tagged by `"type"` and nest their children under
//! `"pages"`:
//!
//! ```json
//! { "type": "group", "id": "g1", "title": "Guides", "pages": [
//!     { "type": "document", "id": "p1", "title": "Intro", "path": "intro" },
//!     { "type": "link", "id": "l1", "title": "Blog", "target": "https://example.com" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

/// Node of a page tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageNode {
    /// Content page.
    Document(DocumentPage),
    /// Organizational node without content.
    Group(GroupPage),
    /// Redirect node.
    Link(LinkPage),
}

impl PageNode {
    /// Create a document node.
    #[must_use]
    pub fn document(
        id: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<String>,
        pages: Vec<PageNode>,
    ) -> Self {
        Self::Document(DocumentPage {
            id: id.into(),
            title: title.into(),
            path: path.into(),
            description: None,
            hidden: false,
            pages,
        })
    }

    /// Create a group node.
    #[must_use]
    pub fn group(id: impl Into<String>, title: impl Into<String>, pages: Vec<PageNode>) -> Self {
        Self::Group(GroupPage {
            id: id.into(),
            title: title.into(),
            path: String::new(),
            pages,
        })
    }

    /// Create a link node.
    #[must_use]
    pub fn link(
        id: impl Into<String>,
        title: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::Link(LinkPage {
            id: id.into(),
            title: title.into(),
            target: target.into(),
        })
    }

    /// Node identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Document(page) => &page.id,
            Self::Group(group) => &group.id,
            Self::Link(link) => &link.id,
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Document(page) => &page.title,
            Self::Group(group) => &group.title,
            Self::Link(link) => &link.title,
        }
    }

    /// Child nodes. Links never have children.
    #[must_use]
    pub fn pages(&self) -> &[PageNode] {
        match self {
            Self::Document(page) => &page.pages,
            Self::Group(group) => &group.pages,
            Self::Link(_) => &[],
        }
    }
}

/// Content page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    /// Identifier, unique across the tree.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Slash-separated path without leading slash (e.g., "guides/setup").
    pub path: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hidden pages are reachable by path/id but can be left out of navigation.
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    /// Nested pages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageNode>,
}

impl DocumentPage {
    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the page as hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

impl From<DocumentPage> for PageNode {
    fn from(page: DocumentPage) -> Self {
        Self::Document(page)
    }
}

/// Organizational node.
///
/// A group answers path and id matches with its first nested document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPage {
    /// Identifier, unique across the tree.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Optional path segment. Empty when the group is not addressable.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Nested pages.
    #[serde(default)]
    pub pages: Vec<PageNode>,
}

impl GroupPage {
    /// Set the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl From<GroupPage> for PageNode {
    fn from(group: GroupPage) -> Self {
        Self::Group(group)
    }
}

/// Redirect node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPage {
    /// Identifier, unique across the tree.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Link target (absolute URL or site-relative path).
    pub target: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
