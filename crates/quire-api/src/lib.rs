//! Content API access for Quire.
//!
//! This crate provides:
//! - Wire types for search hits, site structure, space content and answers
//! - Collaborator traits ([`SearchBackend`], [`SiteStructureSource`],
//!   [`SpaceContentSource`], [`AnswerStreamSource`])
//! - [`ApiClient`]: HTTP implementation of every collaborator
//! - [`MockApi`] for testing (behind `mock` feature flag)

mod client;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod source;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
#[cfg(feature = "mock")]
pub use mock::MockApi;
pub use source::{AnswerStreamSource, SearchBackend, SiteStructureSource, SpaceContentSource};
pub use types::{
    AnswerBody, AnswerChunkStream, AnswerRequest, AnswerSourceRef, PageSearchResult, RawAnswer,
    SearchRequest, SearchScope, SectionSearchResult, SitePointer, SiteSection, SiteSpace,
    SiteSpaceUrls, SiteStructure, Space, SpaceContent, SpaceSearchResult,
};
