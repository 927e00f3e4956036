//! Collaborator traits the site core depends on.
//!
//! [`ApiClient`](crate::ApiClient) implements all of them over HTTP; tests
//! use [`MockApi`](crate::MockApi) behind the `mock` feature.

use std::future::Future;

use crate::error::ApiError;
use crate::types::{
    AnswerChunkStream, AnswerRequest, SearchRequest, SitePointer, SiteStructure, SpaceContent,
    SpaceSearchResult,
};

/// Full-text search over the spaces of a site.
pub trait SearchBackend: Send + Sync {
    /// Search the site and return hits grouped per space.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or rejects the query.
    fn search(
        &self,
        site: &SitePointer,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<SpaceSearchResult>, ApiError>> + Send;
}

/// Directory of the spaces a site is made of.
pub trait SiteStructureSource: Send + Sync {
    /// Fetch the site-space directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure cannot be fetched.
    fn site_structure(
        &self,
        site: &SitePointer,
    ) -> impl Future<Output = Result<SiteStructure, ApiError>> + Send;
}

/// Page trees of individual spaces.
pub trait SpaceContentSource: Send + Sync {
    /// Fetch the page tree of a space.
    ///
    /// Returns `Ok(None)` if the space does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn space_content(
        &self,
        space_id: &str,
    ) -> impl Future<Output = Result<Option<SpaceContent>, ApiError>> + Send;
}

/// Producer of streamed answer snapshots.
pub trait AnswerStreamSource: Send + Sync {
    /// Ask a question and receive answer snapshots as they are generated.
    ///
    /// `Ok(None)` items on the returned stream are heartbeats.
    ///
    /// # Errors
    ///
    /// Returns an error if the question could not be submitted.
    fn ask(
        &self,
        site: &SitePointer,
        request: &AnswerRequest,
    ) -> impl Future<Output = Result<AnswerChunkStream, ApiError>> + Send;
}
