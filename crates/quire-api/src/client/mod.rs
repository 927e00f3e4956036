//! Content API HTTP client.
//!
//! Blocking `ureq` calls run on the tokio blocking pool so the client can
//! back the async collaborator traits.

mod stream;

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use quire_config::Config;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use ureq::Agent;
use ureq::http::Response;

use crate::error::ApiError;
use crate::source::{SearchBackend, SiteStructureSource, SpaceContentSource};
use crate::types::{
    SearchRequest, SearchResponse, SearchScope, SitePointer, SiteStructure, SpaceContent,
    SpaceSearchResult,
};

/// Characters left unescaped in a path segment (RFC 3986 unreserved).
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a single URL path segment.
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

/// Content API client.
#[derive(Clone)]
pub struct ApiClient {
    agent: Agent,
    stream_agent: Agent,
    endpoint: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `endpoint` - API base URL
    /// * `token` - Bearer token, if the site is not public
    /// * `timeout` - Timeout for regular requests; streamed answers only
    ///   bound connecting and waiting for the response head
    #[must_use]
    pub fn new(endpoint: &str, token: Option<&str>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        let stream_agent = Agent::config_builder()
            .timeout_connect(Some(timeout))
            .timeout_recv_response(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            stream_agent,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            token: token.map(ToOwned::to_owned),
        }
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the configuration does not validate.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self::new(
            &config.api.endpoint,
            config.api.token.as_deref(),
            Duration::from_secs(config.api.timeout_secs),
        ))
    }

    /// Build an absolute URL from raw path segments.
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.endpoint.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&encode_segment(segment));
        }
        url
    }

    /// Site-scoped URL: `/orgs/{org}/sites/{site}/{action}`.
    fn site_url(&self, site: &SitePointer, action: &str) -> String {
        self.url(&["orgs", &site.org_id, "sites", &site.site_id, action])
    }

    fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Perform a GET request and decode the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        info!(url, "GET");

        let mut request = self
            .agent
            .get(url)
            .header("Accept", "application/json");
        if let Some(auth) = self.authorization() {
            request = request.header("Authorization", &auth);
        }
        for (name, value) in query {
            request = request.query(*name, value);
        }

        let response = request.call()?;
        read_json(response)
    }

    fn search_blocking(
        &self,
        site: &SitePointer,
        request: &SearchRequest,
    ) -> Result<Vec<SpaceSearchResult>, ApiError> {
        let url = self.site_url(site, "search");
        let response: SearchResponse = self.get_json(&url, &search_query(request))?;
        debug!(spaces = response.items.len(), "search returned");
        Ok(response.items)
    }

    fn site_structure_blocking(&self, site: &SitePointer) -> Result<SiteStructure, ApiError> {
        let url = self.site_url(site, "structure");
        self.get_json(&url, &[])
    }

    fn space_content_blocking(&self, space_id: &str) -> Result<Option<SpaceContent>, ApiError> {
        let url = self.url(&["spaces", space_id, "content"]);
        match self.get_json(&url, &[]) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.is_not_found() => {
                debug!(space_id, "space not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Check the response status and decode the JSON body.
fn read_json<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        return Err(error_response(status, &mut body));
    }

    Ok(body.read_json()?)
}

fn error_response(status: u16, body: &mut ureq::Body) -> ApiError {
    let body = body
        .read_to_string()
        .unwrap_or_else(|_| "(unable to read error body)".to_owned());
    ApiError::HttpResponse { status, body }
}

/// Query parameters of a search request.
fn search_query(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![("query", request.query.clone())];
    match &request.scope {
        SearchScope::All => query.push(("mode", "all".to_owned())),
        SearchScope::Current { site_space_id } => {
            query.push(("mode", "current".to_owned()));
            query.push(("siteSpaceId", site_space_id.clone()));
        }
        SearchScope::Specific { site_space_ids } => {
            query.push(("mode", "specific".to_owned()));
            query.extend(site_space_ids.iter().map(|id| ("siteSpaceIds", id.clone())));
        }
    }
    if let Some(cache_bust) = &request.cache_bust {
        query.push(("cacheBust", cache_bust.clone()));
    }
    query
}

impl SearchBackend for ApiClient {
    async fn search(
        &self,
        site: &SitePointer,
        request: &SearchRequest,
    ) -> Result<Vec<SpaceSearchResult>, ApiError> {
        let client = self.clone();
        let site = site.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || client.search_blocking(&site, &request)).await?
    }
}

impl SiteStructureSource for ApiClient {
    async fn site_structure(&self, site: &SitePointer) -> Result<SiteStructure, ApiError> {
        let client = self.clone();
        let site = site.clone();
        tokio::task::spawn_blocking(move || client.site_structure_blocking(&site)).await?
    }
}

impl SpaceContentSource for ApiClient {
    async fn space_content(&self, space_id: &str) -> Result<Option<SpaceContent>, ApiError> {
        let client = self.clone();
        let space_id = space_id.to_owned();
        tokio::task::spawn_blocking(move || client.space_content_blocking(&space_id)).await?
    }
}
