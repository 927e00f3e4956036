//! Mock API implementation for testing.
//!
//! Provides [`MockApi`], an in-memory stand-in for every collaborator trait
//! that records how it was called.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::ApiError;
use crate::source::{AnswerStreamSource, SearchBackend, SiteStructureSource, SpaceContentSource};
use crate::types::{
    AnswerChunkStream, AnswerRequest, RawAnswer, SearchRequest, SitePointer, SiteStructure,
    SpaceContent, SpaceSearchResult,
};

fn backend_failure() -> ApiError {
    ApiError::HttpResponse {
        status: 500,
        body: "mock failure".to_owned(),
    }
}

/// Mock content API for testing.
///
/// Use the builder methods to configure responses, then inspect the call
/// counters after exercising the code under test.
///
/// # Example
///
/// ```ignore
/// use quire_api::MockApi;
///
/// let api = MockApi::new()
///     .with_space(content)
///     .with_failing_space("broken");
///
/// // ... run an aggregation ...
/// assert_eq!(api.space_fetches("broken"), 1);
/// ```
#[derive(Debug)]
pub struct MockApi {
    search_results: Vec<SpaceSearchResult>,
    fail_search: bool,
    structure: SiteStructure,
    spaces: HashMap<String, SpaceContent>,
    failing_spaces: HashSet<String>,
    answer_chunks: Vec<Option<RawAnswer>>,
    fail_answer: bool,

    search_calls: AtomicUsize,
    last_search: Mutex<Option<SearchRequest>>,
    space_fetches: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    chunks_sent: Arc<AtomicUsize>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            search_results: Vec::new(),
            fail_search: false,
            structure: SiteStructure::SiteSpaces(Vec::new()),
            spaces: HashMap::new(),
            failing_spaces: HashSet::new(),
            answer_chunks: Vec::new(),
            fail_answer: false,
            search_calls: AtomicUsize::new(0),
            last_search: Mutex::new(None),
            space_fetches: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            chunks_sent: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockApi {
    /// Create a mock with no data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-space hits returned by every search.
    #[must_use]
    pub fn with_search_results(mut self, results: Vec<SpaceSearchResult>) -> Self {
        self.search_results = results;
        self
    }

    /// Make every search fail.
    #[must_use]
    pub fn with_search_failure(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Set the site structure.
    #[must_use]
    pub fn with_structure(mut self, structure: SiteStructure) -> Self {
        self.structure = structure;
        self
    }

    /// Register the content of a space.
    #[must_use]
    pub fn with_space(mut self, content: SpaceContent) -> Self {
        self.spaces.insert(content.space_id.clone(), content);
        self
    }

    /// Make fetching a space fail with a backend error.
    #[must_use]
    pub fn with_failing_space(mut self, space_id: impl Into<String>) -> Self {
        self.failing_spaces.insert(space_id.into());
        self
    }

    /// Set the snapshots streamed by [`AnswerStreamSource::ask`].
    ///
    /// `None` entries are sent as heartbeats.
    #[must_use]
    pub fn with_answer_chunks(mut self, chunks: Vec<Option<RawAnswer>>) -> Self {
        self.answer_chunks = chunks;
        self
    }

    /// End the answer stream with an error after the configured chunks.
    #[must_use]
    pub fn with_answer_failure(mut self) -> Self {
        self.fail_answer = true;
        self
    }

    /// Number of search calls made.
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Most recent search request.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn last_search(&self) -> Option<SearchRequest> {
        self.last_search.lock().unwrap().clone()
    }

    /// Number of times a space was fetched.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn space_fetches(&self, space_id: &str) -> usize {
        self.space_fetches
            .lock()
            .unwrap()
            .get(space_id)
            .copied()
            .unwrap_or(0)
    }

    /// Highest number of space fetches observed running at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of answer stream items handed to the channel.
    #[must_use]
    pub fn chunks_sent(&self) -> usize {
        self.chunks_sent.load(Ordering::SeqCst)
    }
}

impl SearchBackend for MockApi {
    async fn search(
        &self,
        _site: &SitePointer,
        request: &SearchRequest,
    ) -> Result<Vec<SpaceSearchResult>, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock().unwrap() = Some(request.clone());
        if self.fail_search {
            return Err(backend_failure());
        }
        Ok(self.search_results.clone())
    }
}

impl SiteStructureSource for MockApi {
    async fn site_structure(&self, _site: &SitePointer) -> Result<SiteStructure, ApiError> {
        Ok(self.structure.clone())
    }
}

impl SpaceContentSource for MockApi {
    async fn space_content(&self, space_id: &str) -> Result<Option<SpaceContent>, ApiError> {
        *self
            .space_fetches
            .lock()
            .unwrap()
            .entry(space_id.to_owned())
            .or_default() += 1;

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        // Give overlapping fetches a chance to show up in the counter.
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_spaces.contains(space_id) {
            return Err(backend_failure());
        }
        Ok(self.spaces.get(space_id).cloned())
    }
}

impl AnswerStreamSource for MockApi {
    async fn ask(
        &self,
        _site: &SitePointer,
        _request: &AnswerRequest,
    ) -> Result<AnswerChunkStream, ApiError> {
        let chunks = self.answer_chunks.clone();
        let fail = self.fail_answer;
        let sent = Arc::clone(&self.chunks_sent);
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            for chunk in chunks {
                if tx.send(Ok(chunk)).await.is_err() {
                    return;
                }
                sent.fetch_add(1, Ordering::SeqCst);
            }
            if fail && tx.send(Err(backend_failure())).await.is_ok() {
                sent.fetch_add(1, Ordering::SeqCst);
            }
        });

        Ok(rx)
    }
}
