//! Path and id resolution.
//!
//! Both lookups walk the tree depth-first in pre-order, skip link nodes, and
//! stop at the first node that matches. A matched document is returned as-is;
//! a matched group answers with its first nested document. A group without
//! any nested document is a dead end and the lookup yields nothing.

use std::ops::ControlFlow;

use crate::node::{DocumentPage, GroupPage, PageNode};

/// Enclosing node of a resolved document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ancestor<'a> {
    /// Enclosing document.
    Document(&'a DocumentPage),
    /// Enclosing group.
    Group(&'a GroupPage),
}

impl<'a> Ancestor<'a> {
    /// Wrap a node, `None` for links.
    fn of(node: &'a PageNode) -> Option<Self> {
        match node {
            PageNode::Document(page) => Some(Self::Document(page)),
            PageNode::Group(group) => Some(Self::Group(group)),
            PageNode::Link(_) => None,
        }
    }

    /// Node identifier.
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Document(page) => &page.id,
            Self::Group(group) => &group.id,
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &'a str {
        match self {
            Self::Document(page) => &page.title,
            Self::Group(group) => &group.title,
        }
    }
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Link target path. `None` for groups, which have no page of their own.
    pub path: Option<String>,
}

/// Document found by a lookup, with its ancestor chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPage<'a> {
    /// Resolved document.
    pub document: &'a DocumentPage,
    /// Enclosing nodes from the root down to (excluding) the document.
    pub ancestors: Vec<Ancestor<'a>>,
}

impl ResolvedPage<'_> {
    /// Build breadcrumbs from the ancestor chain.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbItem> {
        self.ancestors
            .iter()
            .map(|ancestor| BreadcrumbItem {
                title: ancestor.title().to_owned(),
                path: match ancestor {
                    Ancestor::Document(page) => Some(page.path.clone()),
                    Ancestor::Group(_) => None,
                },
            })
            .collect()
    }
}

/// Resolve a path. An empty path resolves to the first document.
pub(crate) fn resolve_by_path<'a>(pages: &'a [PageNode], path: &str) -> Option<ResolvedPage<'a>> {
    if path.is_empty() {
        return resolve_first_document(pages, &mut Vec::new());
    }

    find_match(pages, &mut Vec::new(), &|node: &PageNode| match node {
        PageNode::Document(page) => page.path == path,
        PageNode::Group(group) => group.path == path,
        PageNode::Link(_) => false,
    })
}

/// Resolve an identifier.
pub(crate) fn resolve_by_id<'a>(pages: &'a [PageNode], id: &str) -> Option<ResolvedPage<'a>> {
    find_match(pages, &mut Vec::new(), &|node: &PageNode| node.id() == id)
}

/// First document in reading order, descending into groups only.
pub(crate) fn resolve_first_document<'a>(
    pages: &'a [PageNode],
    ancestors: &mut Vec<Ancestor<'a>>,
) -> Option<ResolvedPage<'a>> {
    for page in pages {
        match page {
            PageNode::Link(_) => {}
            PageNode::Document(document) => {
                return Some(ResolvedPage {
                    document,
                    ancestors: ancestors.clone(),
                });
            }
            PageNode::Group(group) => {
                ancestors.push(Ancestor::Group(group));
                let found = resolve_first_document(&group.pages, ancestors);
                ancestors.pop();
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

fn find_match<'a>(
    pages: &'a [PageNode],
    ancestors: &mut Vec<Ancestor<'a>>,
    is_match: &dyn Fn(&PageNode) -> bool,
) -> Option<ResolvedPage<'a>> {
    match walk(pages, ancestors, is_match) {
        ControlFlow::Break(resolved) => resolved,
        ControlFlow::Continue(()) => None,
    }
}

/// Pre-order walk. Breaks on the first match, whether or not it resolves.
fn walk<'a>(
    pages: &'a [PageNode],
    ancestors: &mut Vec<Ancestor<'a>>,
    is_match: &dyn Fn(&PageNode) -> bool,
) -> ControlFlow<Option<ResolvedPage<'a>>> {
    for page in pages {
        let Some(ancestor) = Ancestor::of(page) else {
            continue;
        };

        if is_match(page) {
            return ControlFlow::Break(resolve_document(page, ancestors));
        }

        ancestors.push(ancestor);
        let flow = walk(page.pages(), ancestors, is_match);
        ancestors.pop();
        if flow.is_break() {
            return flow;
        }
    }
    ControlFlow::Continue(())
}

/// Turn a matched node into a document result.
fn resolve_document<'a>(
    node: &'a PageNode,
    ancestors: &mut Vec<Ancestor<'a>>,
) -> Option<ResolvedPage<'a>> {
    match node {
        PageNode::Document(document) => Some(ResolvedPage {
            document,
            ancestors: ancestors.clone(),
        }),
        PageNode::Group(group) => {
            ancestors.push(Ancestor::Group(group));
            let found = resolve_first_document(&group.pages, ancestors);
            ancestors.pop();
            if found.is_none() {
                tracing::debug!(group_id = %group.id, "Matched group has no document");
            }
            found
        }
        PageNode::Link(_) => None,
    }
}
