//! Streamed answers with resolved sources.
//!
//! The backend streams full-state snapshots of an answer as it is generated.
//! [`AnswerAggregator`] turns each snapshot into an [`AnswerResult`] whose
//! sources point at real pages, fetching the page tree of every cited space
//! once per session. [`stream_answer`] runs an aggregator on a task and hands
//! results over a channel.

use std::collections::HashMap;
use std::sync::Arc;

use quire_api::{
    AnswerBody, AnswerChunkStream, AnswerRequest, AnswerSourceRef, AnswerStreamSource, RawAnswer,
    SearchScope, SitePointer, SpaceContent, SpaceContentSource,
};
use quire_config::Config;
use quire_render::{DocumentRenderer, MarkdownRenderer, NullContentRefs, RenderContext};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::url::{Linker, SiteLinker, join_url};

/// Default CSS class of the answer body wrapper.
const DEFAULT_ANSWER_STYLE: &str = "space-y-5";

/// Answer ready for display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// Rendered answer body, absent until the backend produced a document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Suggested follow-up questions.
    pub followup_questions: Vec<String>,
    /// Cited pages that could be resolved.
    pub sources: Vec<AnswerSource>,
}

/// Page cited by an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerSource {
    /// Page identifier.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Absolute URL of the page.
    pub href: String,
}

/// Page trees of the spaces cited during one answer session.
///
/// A space whose fetch failed is remembered as unavailable and never
/// fetched again.
#[derive(Debug, Default)]
pub struct SpaceContentCache {
    spaces: HashMap<String, Option<SpaceContent>>,
}

impl SpaceContentCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached content of a space, `None` if unknown or unavailable.
    #[must_use]
    pub fn get(&self, space_id: &str) -> Option<&SpaceContent> {
        self.spaces.get(space_id)?.as_ref()
    }

    /// Whether a fetch was already attempted for the space.
    #[must_use]
    pub fn contains(&self, space_id: &str) -> bool {
        self.spaces.contains_key(space_id)
    }

    /// Fetch every space not yet in the cache, one at a time.
    pub async fn load<S: SpaceContentSource>(&mut self, source: &S, space_ids: &[&str]) {
        for &space_id in space_ids {
            if self.contains(space_id) {
                debug!(space_id, "space content cache hit");
                continue;
            }
            debug!(space_id, "space content cache miss");

            let content = match source.space_content(space_id).await {
                Ok(Some(content)) => Some(content),
                Ok(None) => {
                    warn!(space_id, "space not found, dropping its answer sources");
                    None
                }
                Err(err) => {
                    warn!(
                        space_id,
                        error = %err,
                        "failed to fetch space, dropping its answer sources"
                    );
                    None
                }
            };
            self.spaces.insert(space_id.to_owned(), content);
        }
    }
}

/// Unique space ids of the page sources, in citation order.
fn cited_spaces(sources: &[AnswerSourceRef]) -> Vec<&str> {
    let mut spaces: Vec<&str> = Vec::new();
    for source in sources {
        if let AnswerSourceRef::Page { space, .. } = source
            && !spaces.contains(&space.as_str())
        {
            spaces.push(space);
        }
    }
    spaces
}

/// Resolves answer snapshots pulled from a chunk stream.
pub struct AnswerAggregator<S> {
    source: Arc<S>,
    chunks: AnswerChunkStream,
    cache: SpaceContentCache,
    renderer: Arc<dyn DocumentRenderer>,
    linker: Arc<dyn Linker>,
    style: String,
}

impl<S: SpaceContentSource> AnswerAggregator<S> {
    /// Create an aggregator over `chunks`, fetching spaces from `source`.
    pub fn new(source: Arc<S>, chunks: AnswerChunkStream, linker: Arc<dyn Linker>) -> Self {
        Self {
            source,
            chunks,
            cache: SpaceContentCache::new(),
            renderer: Arc::new(MarkdownRenderer::new()),
            linker,
            style: DEFAULT_ANSWER_STYLE.to_owned(),
        }
    }

    /// Use a different renderer for answer bodies.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set the CSS class of the answer body wrapper.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Space contents fetched so far.
    #[must_use]
    pub fn cache(&self) -> &SpaceContentCache {
        &self.cache
    }

    /// Pull the next snapshot and resolve it.
    ///
    /// Heartbeats are skipped. Returns `None` once the stream ends.
    ///
    /// # Errors
    ///
    /// Yields [`SearchError::Api`] if the stream reports a failure.
    pub async fn next(&mut self) -> Option<Result<AnswerResult, SearchError>> {
        loop {
            match self.chunks.recv().await? {
                Ok(Some(raw)) => return Some(Ok(self.resolve(raw).await)),
                Ok(None) => debug!("skipping answer heartbeat"),
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn resolve(&mut self, raw: RawAnswer) -> AnswerResult {
        let spaces = cited_spaces(&raw.sources);
        self.cache.load(self.source.as_ref(), &spaces).await;

        let sources = raw
            .sources
            .iter()
            .filter_map(|source| match source {
                AnswerSourceRef::Page { page, space } => self.resolve_source(page, space),
                AnswerSourceRef::Other => None,
            })
            .collect();

        let body = match raw.answer {
            Some(AnswerBody::Document { document }) => Some(self.renderer.render(
                &document,
                &RenderContext::plain(&NullContentRefs),
                &self.style,
            )),
            Some(AnswerBody::Text { .. }) | None => None,
        };

        AnswerResult {
            body,
            followup_questions: raw.followup_questions,
            sources,
        }
    }

    fn resolve_source(&self, page_id: &str, space_id: &str) -> Option<AnswerSource> {
        let content = self.cache.get(space_id)?;
        let Some(resolved) = content.pages.resolve_by_id(page_id) else {
            warn!(page_id, space_id, "answer source page not found, dropping it");
            return None;
        };

        let path = content.pages.page_path(resolved.document);
        let href = match &content.published_url {
            Some(url) => join_url(url, path),
            None => self.linker.to_absolute(path),
        };

        Some(AnswerSource {
            id: resolved.document.id.clone(),
            title: resolved.document.title.clone(),
            href,
        })
    }
}

/// Consumable stream of resolved answers.
pub struct AnswerStream {
    rx: mpsc::Receiver<Result<AnswerResult, SearchError>>,
}

impl AnswerStream {
    /// Wait for the next answer snapshot.
    ///
    /// Returns `None` once the answer is complete. Dropping the stream stops
    /// production.
    pub async fn next(&mut self) -> Option<Result<AnswerResult, SearchError>> {
        self.rx.recv().await
    }
}

/// Run an aggregator on a background task.
///
/// The task waits for room in the channel before pulling each snapshot, so
/// nothing is processed ahead of the consumer. It stops after the first
/// error or once the stream is dropped, releasing the upstream chunks.
pub fn stream_answer<S>(mut aggregator: AnswerAggregator<S>) -> AnswerStream
where
    S: SpaceContentSource + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        loop {
            let Ok(permit) = tx.reserve().await else {
                debug!("answer consumer dropped, stopping");
                return;
            };
            let Some(item) = aggregator.next().await else {
                return;
            };
            let failed = item.is_err();
            permit.send(item);
            if failed {
                return;
            }
        }
    });

    AnswerStream { rx }
}

/// Asks questions about a site and streams resolved answers.
pub struct SiteAsk<A> {
    api: Arc<A>,
    site: SitePointer,
    linker: Arc<dyn Linker>,
    renderer: Arc<dyn DocumentRenderer>,
    style: String,
}

impl<A> SiteAsk<A>
where
    A: AnswerStreamSource + SpaceContentSource + 'static,
{
    /// Create an answer session factory for `site`.
    pub fn new(api: Arc<A>, site: SitePointer, linker: Arc<dyn Linker>) -> Self {
        Self {
            api,
            site,
            linker,
            renderer: Arc::new(MarkdownRenderer::new()),
            style: DEFAULT_ANSWER_STYLE.to_owned(),
        }
    }

    /// Create a factory for the configured site.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the `[site]` section is missing or invalid.
    pub fn from_config(api: Arc<A>, config: &Config) -> Result<Self, SearchError> {
        let site = config.require_site()?;
        Ok(Self::new(
            api,
            SitePointer::from_config(site),
            Arc::new(SiteLinker::from_config(site)),
        )
        .with_style(config.render.answer_style.clone()))
    }

    /// Use a different renderer for answer bodies.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set the CSS class of the answer body wrapper.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Ask a question.
    ///
    /// Every call starts a fresh session with its own space cache.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Api`] if the question cannot be submitted.
    pub async fn ask(
        &self,
        question: &str,
        scope: SearchScope,
    ) -> Result<AnswerStream, SearchError> {
        let request = AnswerRequest {
            question: question.to_owned(),
            site_space_id: self.site.site_space_id.clone(),
            scope,
        };
        info!(site_id = %self.site.site_id, "asking question");

        let chunks = self.api.ask(&self.site, &request).await?;
        let aggregator =
            AnswerAggregator::new(Arc::clone(&self.api), chunks, Arc::clone(&self.linker))
                .with_renderer(Arc::clone(&self.renderer))
                .with_style(self.style.clone());

        Ok(stream_answer(aggregator))
    }
}
