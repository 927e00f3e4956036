//! Reading-order sequence and previous/next navigation.

use crate::node::{DocumentPage, PageNode};

/// Adjacent documents in reading order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors<'a> {
    /// Document before the current one.
    pub previous: Option<&'a DocumentPage>,
    /// Document after the current one.
    pub next: Option<&'a DocumentPage>,
}

/// Flatten documents in pre-order.
///
/// Links are skipped, groups contribute their children only. A document
/// rejected by `keep` is left out together with its descendants.
pub(crate) fn flatten_documents<'a>(
    pages: &'a [PageNode],
    keep: &dyn Fn(&DocumentPage) -> bool,
    out: &mut Vec<&'a DocumentPage>,
) {
    for page in pages {
        match page {
            PageNode::Link(_) => {}
            PageNode::Group(group) => flatten_documents(&group.pages, keep, out),
            PageNode::Document(document) => {
                if !keep(document) {
                    continue;
                }
                out.push(document);
                flatten_documents(&document.pages, keep, out);
            }
        }
    }
}

/// Find the documents around `document`, matched by id.
///
/// A document that is not part of the sequence has no neighbors.
pub(crate) fn neighbors<'a>(
    pages: &'a [PageNode],
    document: &DocumentPage,
    keep: &dyn Fn(&DocumentPage) -> bool,
) -> Neighbors<'a> {
    let mut sequence = Vec::new();
    flatten_documents(pages, keep, &mut sequence);

    let Some(index) = sequence.iter().position(|page| page.id == document.id) else {
        return Neighbors::default();
    };

    Neighbors {
        previous: index.checked_sub(1).map(|i| sequence[i]),
        next: sequence.get(index + 1).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keep_all(_: &DocumentPage) -> bool {
        true
    }

    fn ids<'a>(pages: &[&'a DocumentPage]) -> Vec<&'a str> {
        pages.iter().map(|page| page.id.as_str()).collect()
    }

    fn sample_tree() -> Vec<PageNode> {
        vec![
            PageNode::document(
                "a",
                "A",
                "a",
                vec![PageNode::document("a1", "A1", "a/a1", Vec::new())],
            ),
            PageNode::link("l", "Link", "https://example.com"),
            PageNode::group(
                "g",
                "Group",
                vec![
                    PageNode::document("b", "B", "b", Vec::new()),
                    PageNode::group(
                        "g2",
                        "Nested",
                        vec![PageNode::document("c", "C", "c", Vec::new())],
                    ),
                ],
            ),
        ]
    }

    fn document<'a>(pages: &'a [PageNode], id: &str) -> &'a DocumentPage {
        let mut all = Vec::new();
        flatten_documents(pages, &keep_all, &mut all);
        all.into_iter().find(|page| page.id == id).unwrap()
    }

    #[test]
    fn test_flatten_skips_links_and_groups() {
        let tree = sample_tree();
        let mut sequence = Vec::new();

        flatten_documents(&tree, &keep_all, &mut sequence);

        assert_eq!(ids(&sequence), vec!["a", "a1", "b", "c"]);
    }

    #[test]
    fn test_flatten_filter_drops_subtree() {
        let tree = sample_tree();
        let mut sequence = Vec::new();

        flatten_documents(&tree, &|page: &DocumentPage| page.id != "a", &mut sequence);

        assert_eq!(ids(&sequence), vec!["b", "c"]);
    }

    #[test]
    fn test_neighbors_in_middle() {
        let tree = sample_tree();

        let result = neighbors(&tree, document(&tree, "b"), &keep_all);

        assert_eq!(result.previous.map(|p| p.id.as_str()), Some("a1"));
        assert_eq!(result.next.map(|p| p.id.as_str()), Some("c"));
    }

    #[test]
    fn test_neighbors_at_boundaries() {
        let tree = sample_tree();

        let first = neighbors(&tree, document(&tree, "a"), &keep_all);
        let last = neighbors(&tree, document(&tree, "c"), &keep_all);

        assert!(first.previous.is_none());
        assert_eq!(first.next.map(|p| p.id.as_str()), Some("a1"));
        assert_eq!(last.previous.map(|p| p.id.as_str()), Some("b"));
        assert!(last.next.is_none());
    }

    #[test]
    fn test_neighbors_unknown_document_is_empty() {
        let tree = sample_tree();
        let stranger = DocumentPage {
            id: "x".to_owned(),
            title: "X".to_owned(),
            path: "x".to_owned(),
            description: None,
            hidden: false,
            pages: Vec::new(),
        };

        let result = neighbors(&tree, &stranger, &keep_all);

        assert_eq!(result, Neighbors::default());
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let tree = sample_tree();
        let mut sequence = Vec::new();
        flatten_documents(&tree, &keep_all, &mut sequence);

        for page in &sequence {
            if let Some(next) = neighbors(&tree, page, &keep_all).next {
                let back = neighbors(&tree, next, &keep_all).previous;
                assert_eq!(back.map(|p| p.id.as_str()), Some(page.id.as_str()));
            }
        }
    }
}
