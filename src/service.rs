use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::magnet::{InfoHash, MagnetError, parse_display_name, parse_info_hash};

pub const MAGNET_HEADER: &str = "magnetURI";
pub const DEFAULT_TORRENT_NAME: &str = "download";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Server error: {0}")]
    Server(u16),
    #[error("No magnet URI returned from server")]
    MissingResult,
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Magnet(#[from] MagnetError),
    /// The conversion task died before producing an outcome.
    #[error("conversion task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    MagnetUri,
    TorrentLink,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TorrentMetadata {
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub comment: Option<String>,
    pub info_hash: Option<String>,
    pub file_count: Option<usize>,
    pub tracker_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub kind: ResultKind,
    pub value: String,
    pub metadata: Option<TorrentMetadata>,
}

#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn torrent_to_magnet(&self, torrent_url: &str) -> Result<ConversionResult, ConvertError>;

    async fn magnet_to_torrent(&self, magnet: &str) -> Result<ConversionResult, ConvertError>;
}

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub service_url: Url,
    pub timeout: Option<Duration>,
    pub torrent_link_template: String,
    pub placeholder_delay: Duration,
}

/// Talks to the conversion server for torrent → magnet.
///
/// Magnet → torrent never reaches a server: the link is filled into
/// `torrent_link_template` after `placeholder_delay`. The resulting URL is
/// only as good as the third-party host behind the template.
pub struct HttpConversionService {
    client: reqwest::Client,
    options: ServiceOptions,
}

impl HttpConversionService {
    pub fn new(options: ServiceOptions) -> Result<Self, ConvertError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            options,
        })
    }
}

#[async_trait]
impl ConversionService for HttpConversionService {
    async fn torrent_to_magnet(&self, torrent_url: &str) -> Result<ConversionResult, ConvertError> {
        let request_url = request_url(&self.options.service_url, torrent_url);
        debug!(%request_url, "requesting magnet URI");
        let response = self.client.get(&request_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "conversion service rejected request");
            return Err(ConvertError::Server(status.as_u16()));
        }
        let magnet = magnet_header(response.headers())?;

        let metadata = if is_json(response.headers()) {
            match response.bytes().await {
                Ok(body) => parse_metadata(&body),
                Err(err) => {
                    debug!(error = %err, "failed to read response body");
                    None
                }
            }
        } else {
            None
        };
        info!(has_metadata = metadata.is_some(), "torrent converted to magnet");
        Ok(ConversionResult {
            kind: ResultKind::MagnetUri,
            value: magnet,
            metadata,
        })
    }

    async fn magnet_to_torrent(&self, magnet: &str) -> Result<ConversionResult, ConvertError> {
        let info_hash = parse_info_hash(magnet)?;
        let name = parse_display_name(magnet).unwrap_or_else(|| DEFAULT_TORRENT_NAME.to_string());
        sleep(self.options.placeholder_delay).await;
        let link = torrent_link(&self.options.torrent_link_template, &info_hash, &name);
        warn!(%link, "torrent link synthesized locally, no backend was contacted");
        Ok(ConversionResult {
            kind: ResultKind::TorrentLink,
            value: link,
            metadata: None,
        })
    }
}

/// Builds `<service>/<source>` with the source URL encoded as a single path
/// segment.
pub fn request_url(service_url: &Url, source: &str) -> String {
    format!(
        "{}/{}",
        service_url.as_str().trim_end_matches('/'),
        encode_component(source)
    )
}

/// Fills `{info_hash}` (upper-cased) and `{name}` (query-encoded).
pub fn torrent_link(template: &str, info_hash: &InfoHash, name: &str) -> String {
    let name: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    template
        .replace("{info_hash}", &info_hash.as_str().to_ascii_uppercase())
        .replace("{name}", &name)
}

fn encode_component(value: &str) -> String {
    // form encoding writes spaces as '+'; a literal '+' is already %2B
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn magnet_header(headers: &HeaderMap) -> Result<String, ConvertError> {
    headers
        .get(MAGNET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ConvertError::MissingResult)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

#[derive(Debug, Deserialize)]
struct ConversionBody {
    #[serde(rename = "torrentData")]
    torrent_data: Option<Map<String, Value>>,
}

/// Reads `torrentData` field by field; a field of the wrong type is left
/// empty without affecting the others.
fn parse_metadata(body: &[u8]) -> Option<TorrentMetadata> {
    let parsed: ConversionBody = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(error = %err, "response body is not conversion JSON");
            return None;
        }
    };
    let data = parsed.torrent_data?;
    let text = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);
    let count = |key: &str| data.get(key).and_then(Value::as_array).map(Vec::len);
    Some(TorrentMetadata {
        name: text("name"),
        created_at: text("created"),
        comment: text("comment"),
        info_hash: text("infoHash"),
        file_count: count("files"),
        tracker_count: count("announce"),
    })
}
