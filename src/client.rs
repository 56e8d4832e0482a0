//! Blocking HTTP transport for index uploads.

use crate::config::Config;
use crate::error::CtxsyncError;
use crate::types::FileEntry;
use crate::upload::{BatchSink, SubmitOutcome};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;

#[derive(Serialize)]
struct IndexRequest<'a> {
    files: &'a [FileEntry],
}

/// Longest response body kept in an [`CtxsyncError::Http`] message.
const MAX_ERROR_BODY_CHARS: usize = 200;

fn net_err(e: reqwest::Error) -> CtxsyncError {
    CtxsyncError::Network(e.to_string())
}

/// Squeezes a response body onto one line and caps its length.
fn error_body(raw: &str) -> String {
    let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match line.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line,
    }
}

/// Posts batches to `{api_url}/projects/{project_id}/index`.
#[derive(Debug)]
pub struct IndexClient {
    http: Client,
    url: String,
    token: Option<String>,
}

impl IndexClient {
    pub fn new(config: &Config) -> Result<Self, CtxsyncError> {
        let project_id = config.validate_for_upload()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("ctxsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(net_err)?;
        Ok(Self {
            http,
            url: format!(
                "{}/projects/{}/index",
                config.api_url.trim().trim_end_matches('/'),
                project_id
            ),
            token: config.token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl BatchSink for IndexClient {
    fn submit(&mut self, files: &[FileEntry]) -> Result<SubmitOutcome, CtxsyncError> {
        let mut req = self.http.post(&self.url).json(&IndexRequest { files });
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().map_err(net_err)?;
        let status = resp.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Ok(SubmitOutcome::TooLarge);
        }
        if status.is_success() {
            return Ok(SubmitOutcome::Accepted);
        }
        let body = match resp.text() {
            Ok(text) => error_body(&text),
            Err(e) => format!("<unreadable body: {}>", e),
        };
        Err(CtxsyncError::Http {
            status: status.as_u16(),
            body,
        })
    }
}
