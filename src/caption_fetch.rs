/*!
 * Caption file sources.
 *
 * This module contains the collaborators that turn a caption URL into text:
 * - `HttpCaptionSource`: http(s) URLs via reqwest
 * - `FileCaptionSource`: local paths and `file://` URLs
 * - `CaptionFetcher`: picks one of the above by URL scheme
 *
 * It also provides the request tickets that keep a slow fetch for an old
 * track selection from overwriting the captions of a newer one.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::app_config::FetchConfig;
use crate::errors::FetchError;

/// Common trait for everything that can deliver caption text
#[async_trait]
pub trait CaptionSource: Send + Sync + Debug {
    /// Fetch the caption file behind `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches caption files over HTTP
#[derive(Debug, Clone)]
pub struct HttpCaptionSource {
    client: Client,
}

impl HttpCaptionSource {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CaptionSource for HttpCaptionSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching captions from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))
    }
}

/// Reads caption files from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileCaptionSource;

impl FileCaptionSource {
    fn resolve(url: &str) -> Result<PathBuf, FetchError> {
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "file" => parsed
                .to_file_path()
                .map_err(|_| FetchError::UnsupportedUrl(url.to_string())),
            // Drive letters parse as a one-letter scheme
            Ok(parsed) if parsed.scheme().len() > 1 => Err(FetchError::UnsupportedUrl(url.to_string())),
            _ => Ok(PathBuf::from(url)),
        }
    }
}

#[async_trait]
impl CaptionSource for FileCaptionSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let path = Self::resolve(url)?;
        debug!("Reading captions from {}", path.display());

        tokio::fs::read_to_string(&path).await.map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Dispatches to the HTTP or file source depending on the URL scheme
#[derive(Debug, Clone)]
pub struct CaptionFetcher {
    http: HttpCaptionSource,
    file: FileCaptionSource,
}

impl CaptionFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpCaptionSource::new(config)?,
            file: FileCaptionSource,
        })
    }
}

#[async_trait]
impl CaptionSource for CaptionFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => self.http.fetch(url).await,
            _ => self.file.fetch(url).await,
        }
    }
}

/// Identifies one track selection; results carrying an older ticket are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

/// Issues tickets and remembers which one is current
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    current: Option<FetchTicket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection, invalidating every earlier ticket
    pub fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        self.current = Some(ticket);
        ticket
    }

    /// Invalidate all tickets without starting a new request
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.current == Some(ticket)
    }

    /// Accept a result for `ticket` at most once
    pub fn complete(&mut self, ticket: FetchTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
