//! Wire types exchanged with the content API.

use quire_config::SiteConfig;
use quire_tree::PageTree;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::ApiError;

/// Receiving end of a streamed answer.
///
/// `Ok(None)` items are heartbeats; the stream ends when the sender closes.
pub type AnswerChunkStream = mpsc::Receiver<Result<Option<RawAnswer>, ApiError>>;

/// Identifies the site requests are made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitePointer {
    /// Organization identifier.
    pub org_id: String,
    /// Site identifier.
    pub site_id: String,
    /// Site-space the visitor is browsing, if any.
    pub site_space_id: Option<String>,
}

impl SitePointer {
    /// Build a pointer from site configuration.
    #[must_use]
    pub fn from_config(site: &SiteConfig) -> Self {
        Self {
            org_id: site.org_id.clone(),
            site_id: site.site_id.clone(),
            site_space_id: site.site_space_id.clone(),
        }
    }
}

/// Which spaces a search or question covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum SearchScope {
    /// Every space of the site.
    All,
    /// The current site-space and its section siblings.
    Current {
        /// Site-space the visitor is browsing.
        site_space_id: String,
    },
    /// An explicit set of site-spaces.
    Specific {
        /// Site-spaces to search.
        site_space_ids: Vec<String>,
    },
}

/// Site search request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Spaces to search.
    pub scope: SearchScope,
    /// Opaque value forcing the backend to bypass its cache.
    pub cache_bust: Option<String>,
}

/// Search hits for one space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSearchResult {
    /// Space identifier.
    pub id: String,
    /// Space title.
    pub title: String,
    /// Matching pages in relevance order.
    #[serde(default)]
    pub pages: Vec<PageSearchResult>,
}

/// Search hit for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSearchResult {
    /// Page identifier.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Page path relative to its space.
    pub path: String,
    /// Matching sections in relevance order.
    #[serde(default)]
    pub sections: Vec<SectionSearchResult>,
}

/// Search hit for one section of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSearchResult {
    /// Section identifier, unique within its page.
    pub id: String,
    /// Section heading.
    pub title: String,
    /// Section path relative to its space (usually with an anchor).
    pub path: String,
    /// Snippet text.
    pub body: String,
}

/// Search response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub(crate) items: Vec<SpaceSearchResult>,
}

/// Spaces of a site, flat or grouped into sections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "structure", rename_all = "camelCase")]
pub enum SiteStructure {
    /// Flat list of site-spaces.
    SiteSpaces(Vec<SiteSpace>),
    /// Titled sections, each with its site-spaces.
    SiteSections(Vec<SiteSection>),
}

/// Space as it participates in a site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSpace {
    /// Site-space identifier.
    pub id: String,
    /// Display title override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Underlying space.
    pub space: Space,
    /// Public URLs.
    #[serde(default)]
    pub urls: SiteSpaceUrls,
}

/// Content space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Space identifier.
    pub id: String,
    /// Space title.
    pub title: String,
}

/// Public URLs of a site-space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSpaceUrls {
    /// Absolute URL the site-space is published under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// Titled group of site-spaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSection {
    /// Section identifier.
    pub id: String,
    /// Section title.
    pub title: String,
    /// Site-spaces in the section.
    #[serde(default)]
    pub site_spaces: Vec<SiteSpace>,
}

/// Page tree of one space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceContent {
    /// Space identifier.
    pub space_id: String,
    /// Page tree.
    pub pages: PageTree,
    /// Absolute URL the space is published under, if public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,
}

/// Question sent to the answer endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Question text.
    pub question: String,
    /// Site-space the question is asked from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_space_id: Option<String>,
    /// Spaces the answer may draw from.
    pub scope: SearchScope,
}

/// Snapshot of a progressively generated answer.
///
/// Each snapshot carries the whole answer so far, not a delta.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    /// Answer body, absent until the backend produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerBody>,
    /// Suggested follow-up questions.
    #[serde(default)]
    pub followup_questions: Vec<String>,
    /// Sources the answer cites.
    #[serde(default)]
    pub sources: Vec<AnswerSourceRef>,
}

/// Answer body as produced by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerBody {
    /// Structured document (markdown).
    Document {
        /// Markdown source.
        document: String,
    },
    /// Plain text that has not been turned into a document yet.
    Text {
        /// Raw text.
        text: String,
    },
}

/// Source cited by an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerSourceRef {
    /// Page of a space.
    Page {
        /// Page identifier.
        page: String,
        /// Space identifier.
        space: String,
    },
    /// Any other source kind.
    #[serde(other)]
    Other,
}
