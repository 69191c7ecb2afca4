use thiserror::Error;
use url::Url;

use super::ConversionMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a torrent URL")]
    EmptyTorrentUrl,
    #[error("Please enter a valid URL")]
    InvalidUrl,
    #[error("URL must point to a .torrent file")]
    NotTorrentFile,
    #[error("Please enter a magnet link")]
    EmptyMagnet,
    #[error("Please enter a valid magnet link")]
    NotMagnet,
    #[error("Magnet link must contain an info hash (xt=urn:btih:)")]
    MissingInfoHash,
}

/// Checks the raw input field against the rules of `mode`. Leading and
/// trailing whitespace is ignored.
pub fn validate_input(raw: &str, mode: ConversionMode) -> Result<(), ValidationError> {
    let input = raw.trim();
    match mode {
        ConversionMode::TorrentToMagnet => {
            if input.is_empty() {
                return Err(ValidationError::EmptyTorrentUrl);
            }
            let url = Url::parse(input).map_err(|_| ValidationError::InvalidUrl)?;
            if !url.path().to_ascii_lowercase().contains(".torrent") {
                return Err(ValidationError::NotTorrentFile);
            }
        }
        ConversionMode::MagnetToTorrent => {
            if input.is_empty() {
                return Err(ValidationError::EmptyMagnet);
            }
            let lower = input.to_ascii_lowercase();
            if !lower.starts_with("magnet:") {
                return Err(ValidationError::NotMagnet);
            }
            if !lower.contains("xt=urn:btih:") {
                return Err(ValidationError::MissingInfoHash);
            }
        }
    }
    Ok(())
}
