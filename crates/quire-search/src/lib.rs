//! Site search and streamed answers for Quire.
//!
//! This crate provides:
//! - [`SiteSearch`]: query the search backend and build display records
//! - [`transform`] and [`SpaceDirectory`]: per-space hit transformation
//! - [`SiteAsk`] and [`AnswerAggregator`]: streamed answers with sources
//!   resolved against the page trees of the cited spaces
//! - [`join_url`], [`Linker`] and [`SiteLinker`] for absolute URLs
//!
//! Backends are abstracted by the collaborator traits of `quire-api`.

mod answer;
mod error;
mod results;
mod search;
mod url;

pub use answer::{
    AnswerAggregator, AnswerResult, AnswerSource, AnswerStream, SiteAsk, SpaceContentCache,
    stream_answer,
};
pub use error::SearchError;
pub use results::{
    DirectoryEntry, PageResult, SearchResultRecord, SearchSpace, SectionResult, SpaceDirectory,
    transform,
};
pub use search::SiteSearch;
pub use url::{Linker, SiteLinker, join_url};
