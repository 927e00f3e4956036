//! Site-wide search.

use std::sync::Arc;

use quire_api::{SearchBackend, SearchRequest, SearchScope, SitePointer, SiteStructureSource};
use quire_config::Config;
use tracing::{debug, info};

use crate::error::SearchError;
use crate::results::{SearchResultRecord, SpaceDirectory, transform};
use crate::url::{Linker, SiteLinker};

/// Searches a site and turns the hits into display records.
pub struct SiteSearch<A> {
    api: Arc<A>,
    site: SitePointer,
    linker: Arc<dyn Linker>,
}

impl<A> SiteSearch<A>
where
    A: SearchBackend + SiteStructureSource,
{
    /// Create a search for `site`.
    pub fn new(api: Arc<A>, site: SitePointer, linker: Arc<dyn Linker>) -> Self {
        Self { api, site, linker }
    }

    /// Create a search for the configured site.
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
        ))
    }

    /// Search the site.
    ///
    /// Queries of at most one character return nothing without touching the
    /// backend. Records are grouped per space in backend order, each page
    /// followed by its sections.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Api`] if the search or the site structure
    /// cannot be fetched.
    pub async fn search(
        &self,
        query: &str,
        scope: SearchScope,
        cache_bust: Option<String>,
    ) -> Result<Vec<SearchResultRecord>, SearchError> {
        if query.chars().count() <= 1 {
            debug!(query, "query too short, skipping search");
            return Ok(Vec::new());
        }

        let request = SearchRequest {
            query: query.to_owned(),
            scope,
            cache_bust,
        };
        info!(query, site_id = %self.site.site_id, "searching site");

        let (results, structure) = tokio::try_join!(
            self.api.search(&self.site, &request),
            self.api.site_structure(&self.site),
        )?;

        let directory = SpaceDirectory::from_structure(&structure);
        let multi_space = directory.is_multi_space();

        let mut records = Vec::new();
        for space_result in &results {
            let space = if multi_space {
                let space = directory.search_space(&space_result.id);
                if space.is_none() {
                    debug!(
                        space_id = %space_result.id,
                        "space not listed in directory, using site links"
                    );
                }
                space
            } else {
                None
            };
            for page in &space_result.pages {
                records.extend(transform(page, space, self.linker.as_ref()));
            }
        }

        debug!(records = records.len(), "search complete");
        Ok(records)
    }
}
