//! Streamed answers over newline-delimited JSON.

use std::io::{BufRead, BufReader};

use tokio::sync::mpsc;
use tracing::{debug, info};
use ureq::BodyReader;

use super::{ApiClient, error_response};
use crate::error::ApiError;
use crate::source::AnswerStreamSource;
use crate::types::{AnswerChunkStream, AnswerRequest, RawAnswer, SitePointer};

type ChunkSender = mpsc::Sender<Result<Option<RawAnswer>, ApiError>>;

impl ApiClient {
    /// Submit a question and return a reader over the response lines.
    fn open_answer_stream(
        &self,
        site: &SitePointer,
        request: &AnswerRequest,
    ) -> Result<BufReader<BodyReader<'static>>, ApiError> {
        let url = self.site_url(site, "ask");
        info!(url, "POST");

        let mut builder = self
            .stream_agent
            .post(&url)
            .header("Accept", "application/x-ndjson");
        if let Some(auth) = self.authorization() {
            builder = builder.header("Authorization", &auth);
        }

        let response = builder.send_json(request)?;
        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            return Err(error_response(status, &mut body));
        }

        Ok(BufReader::new(body.into_reader()))
    }
}

/// Parse one line of the stream.
///
/// Blank lines and `null` are heartbeats.
fn parse_line(line: &str) -> Result<Option<RawAnswer>, ApiError> {
    let line = line.trim();
    if line.is_empty() || line == "null" {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Forward parsed lines to `tx` until the input ends, fails, or the
/// receiver is dropped.
///
/// Must run on a blocking thread.
fn forward_chunks(reader: impl BufRead, tx: &ChunkSender) {
    for line in reader.lines() {
        let chunk = line.map_err(ApiError::from).and_then(|line| parse_line(&line));
        let failed = chunk.is_err();

        if tx.blocking_send(chunk).is_err() {
            debug!("answer receiver dropped, closing stream");
            return;
        }
        if failed {
            return;
        }
    }
}

impl AnswerStreamSource for ApiClient {
    async fn ask(
        &self,
        site: &SitePointer,
        request: &AnswerRequest,
    ) -> Result<AnswerChunkStream, ApiError> {
        let client = self.clone();
        let site = site.clone();
        let request = request.clone();
        let reader =
            tokio::task::spawn_blocking(move || client.open_answer_stream(&site, &request))
                .await??;

        let (tx, rx) = mpsc::channel(1);
        tokio::task::spawn_blocking(move || forward_chunks(reader, &tx));
        Ok(rx)
    }
}
