//! Search hit transformation and the site-space directory.

use quire_api::{PageSearchResult, SiteSpace, SiteStructure};
use serde::Serialize;

use crate::url::{Linker, join_url};

/// Search result ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResultRecord {
    /// Matching page.
    Page(PageResult),
    /// Matching section of the preceding page.
    Section(SectionResult),
}

/// Page hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Page identifier.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Absolute URL of the page.
    pub href: String,
    /// Title of the space the page belongs to, set in multi-space sites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_title: Option<String>,
}

/// Section hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    /// `<pageId>/<sectionId>`.
    pub id: String,
    /// Section heading.
    pub title: String,
    /// Absolute URL of the section.
    pub href: String,
    /// Snippet text.
    pub body: String,
}

/// Space a search hit is displayed under.
#[derive(Clone, Copy, Debug)]
pub struct SearchSpace<'a> {
    /// Published URL hits are resolved against, `None` to use site links.
    pub base_url: Option<&'a str>,
    /// Display title of the space.
    pub title: &'a str,
}

/// Convert a page hit into a page record followed by its section records.
///
/// With a `space`, the page record carries its title and paths are joined
/// onto its published URL. Paths of unpublished spaces, and of hits without
/// a space, go through `linker`.
#[must_use]
pub fn transform(
    item: &PageSearchResult,
    space: Option<SearchSpace<'_>>,
    linker: &dyn Linker,
) -> Vec<SearchResultRecord> {
    let base_url = space.and_then(|space| space.base_url);
    let href = |path: &str| match base_url {
        Some(base_url) => join_url(base_url, path),
        None => linker.to_absolute(path),
    };

    let mut records = Vec::with_capacity(item.sections.len() + 1);
    records.push(SearchResultRecord::Page(PageResult {
        id: item.id.clone(),
        title: item.title.clone(),
        href: href(&item.path),
        space_title: space.map(|space| space.title.to_owned()),
    }));
    records.extend(item.sections.iter().map(|section| {
        SearchResultRecord::Section(SectionResult {
            id: format!("{}/{}", item.id, section.id),
            title: section.title.clone(),
            href: href(&section.path),
            body: section.body.clone(),
        })
    }));
    records
}

/// Site-space as listed in the directory, with its display title settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Site-space identifier.
    pub site_space_id: String,
    /// Underlying space identifier.
    pub space_id: String,
    /// Display title.
    pub title: String,
    /// Published URL, if public.
    pub published_url: Option<String>,
}

impl DirectoryEntry {
    fn new(site_space: &SiteSpace, section_title: Option<&str>) -> Self {
        let own_title = site_space.title.as_deref().filter(|title| !title.is_empty());
        let title = own_title
            .or(section_title)
            .unwrap_or(&site_space.space.title);

        Self {
            site_space_id: site_space.id.clone(),
            space_id: site_space.space.id.clone(),
            title: title.to_owned(),
            published_url: site_space.urls.published.clone(),
        }
    }
}

/// Flat directory of a site's spaces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpaceDirectory {
    entries: Vec<DirectoryEntry>,
}

impl SpaceDirectory {
    /// Flatten a site structure.
    ///
    /// Site-spaces in a section take the section's title unless they have
    /// a title of their own.
    #[must_use]
    pub fn from_structure(structure: &SiteStructure) -> Self {
        let entries = match structure {
            SiteStructure::SiteSpaces(site_spaces) => site_spaces
                .iter()
                .map(|site_space| DirectoryEntry::new(site_space, None))
                .collect(),
            SiteStructure::SiteSections(sections) => sections
                .iter()
                .flat_map(|section| {
                    section
                        .site_spaces
                        .iter()
                        .map(|site_space| {
                            DirectoryEntry::new(site_space, Some(section.title.as_str()))
                        })
                })
                .collect(),
        };
        Self { entries }
    }

    /// All entries in directory order.
    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Whether the site is made of more than one space.
    #[must_use]
    pub fn is_multi_space(&self) -> bool {
        self.entries.len() > 1
    }

    /// Entry for a space, matched on the underlying space id.
    #[must_use]
    pub fn find_by_space(&self, space_id: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.space_id == space_id)
    }

    /// Display target for hits of a space, if it is listed.
    #[must_use]
    pub fn search_space(&self, space_id: &str) -> Option<SearchSpace<'_>> {
        let entry = self.find_by_space(space_id)?;
        Some(SearchSpace {
            base_url: entry.published_url.as_deref(),
            title: &entry.title,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quire_api::{SectionSearchResult, SiteSection, SiteSpaceUrls, Space};

    use super::*;
    use crate::url::SiteLinker;

    fn hit() -> PageSearchResult {
        PageSearchResult {
            id: "p1".to_owned(),
            title: "Install".to_owned(),
            path: "guides/install".to_owned(),
            sections: vec![
                SectionSearchResult {
                    id: "s1".to_owned(),
                    title: "Linux".to_owned(),
                    path: "guides/install#linux".to_owned(),
                    body: "apt install quire".to_owned(),
                },
                SectionSearchResult {
                    id: "s2".to_owned(),
                    title: "macOS".to_owned(),
                    path: "guides/install#macos".to_owned(),
                    body: "brew install quire".to_owned(),
                },
            ],
        }
    }

    fn site_space(id: &str, title: Option<&str>, space_id: &str, url: Option<&str>) -> SiteSpace {
        SiteSpace {
            id: id.to_owned(),
            title: title.map(ToOwned::to_owned),
            space: Space {
                id: space_id.to_owned(),
                title: format!("Space {space_id}"),
            },
            urls: SiteSpaceUrls {
                published: url.map(ToOwned::to_owned),
            },
        }
    }

    #[test]
    fn test_transform_single_space() {
        let linker = SiteLinker::new("https://docs.example.com");

        let records = transform(&hit(), None, &linker);

        assert_eq!(
            records,
            vec![
                SearchResultRecord::Page(PageResult {
                    id: "p1".to_owned(),
                    title: "Install".to_owned(),
                    href: "https://docs.example.com/guides/install".to_owned(),
                    space_title: None,
                }),
                SearchResultRecord::Section(SectionResult {
                    id: "p1/s1".to_owned(),
                    title: "Linux".to_owned(),
                    href: "https://docs.example.com/guides/install#linux".to_owned(),
                    body: "apt install quire".to_owned(),
                }),
                SearchResultRecord::Section(SectionResult {
                    id: "p1/s2".to_owned(),
                    title: "macOS".to_owned(),
                    href: "https://docs.example.com/guides/install#macos".to_owned(),
                    body: "brew install quire".to_owned(),
                }),
            ]
        );
    }

    #[test]
    fn test_transform_with_space_uses_its_url() {
        let linker = SiteLinker::new("https://docs.example.com");
        let space = SearchSpace {
            base_url: Some("https://docs.example.com/cli/"),
            title: "CLI",
        };

        let records = transform(&hit(), Some(space), &linker);

        let SearchResultRecord::Page(page) = &records[0] else {
            panic!("expected page record first");
        };
        assert_eq!(page.href, "https://docs.example.com/cli/guides/install");
        assert_eq!(page.space_title.as_deref(), Some("CLI"));
        let SearchResultRecord::Section(section) = &records[2] else {
            panic!("expected section record");
        };
        assert_eq!(section.href, "https://docs.example.com/cli/guides/install#macos");
    }

    #[test]
    fn test_record_wire_format() {
        let linker = SiteLinker::new("https://docs.example.com");
        let mut item = hit();
        item.sections.truncate(1);

        let records = transform(&item, None, &linker);

        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            serde_json::json!([
                {"type": "page", "id": "p1", "title": "Install", "href": "https://docs.example.com/guides/install"},
                {"type": "section", "id": "p1/s1", "title": "Linux", "href": "https://docs.example.com/guides/install#linux", "body": "apt install quire"}
            ])
        );
    }

    #[test]
    fn test_directory_flat_titles() {
        let structure = SiteStructure::SiteSpaces(vec![
            site_space("ss1", Some("Guides"), "s1", None),
            site_space("ss2", None, "s2", None),
        ]);

        let directory = SpaceDirectory::from_structure(&structure);

        let titles: Vec<&str> = directory.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Guides", "Space s2"]);
        assert!(directory.is_multi_space());
    }

    #[test]
    fn test_directory_sections_inherit_title() {
        let structure = SiteStructure::SiteSections(vec![SiteSection {
            id: "sec1".to_owned(),
            title: "Products".to_owned(),
            site_spaces: vec![
                site_space("ss1", None, "s1", None),
                site_space("ss2", Some(""), "s2", None),
                site_space("ss3", Some("Changelog"), "s3", None),
            ],
        }]);

        let directory = SpaceDirectory::from_structure(&structure);

        let titles: Vec<&str> = directory.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Products", "Products", "Changelog"]);
    }

    #[test]
    fn test_directory_single_space() {
        let structure = SiteStructure::SiteSpaces(vec![site_space("ss1", None, "s1", None)]);

        let directory = SpaceDirectory::from_structure(&structure);

        assert!(!directory.is_multi_space());
    }

    #[test]
    fn test_transform_unpublished_space_keeps_title() {
        let linker = SiteLinker::new("https://docs.example.com");
        let space = SearchSpace {
            base_url: None,
            title: "Internal",
        };

        let records = transform(&hit(), Some(space), &linker);

        let SearchResultRecord::Page(page) = &records[0] else {
            panic!("expected page record first");
        };
        assert_eq!(page.href, "https://docs.example.com/guides/install");
        assert_eq!(page.space_title.as_deref(), Some("Internal"));
        let SearchResultRecord::Section(section) = &records[1] else {
            panic!("expected section record");
        };
        assert_eq!(section.href, "https://docs.example.com/guides/install#linux");
    }

    #[test]
    fn test_search_space_for_listed_spaces() {
        let structure = SiteStructure::SiteSpaces(vec![
            site_space("ss1", None, "s1", Some("https://docs.example.com/one")),
            site_space("ss2", None, "s2", None),
        ]);
        let directory = SpaceDirectory::from_structure(&structure);

        let published = directory.search_space("s1").unwrap();

        assert_eq!(published.base_url, Some("https://docs.example.com/one"));
        assert_eq!(published.title, "Space s1");
        let unpublished = directory.search_space("s2").unwrap();
        assert!(unpublished.base_url.is_none());
        assert_eq!(unpublished.title, "Space s2");
        assert!(directory.search_space("unknown").is_none());
    }
}
