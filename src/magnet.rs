//! Extraction of the info hash and display name from magnet links.
//!
//! Both functions only look at the query part of the link. Parameters are
//! decoded with `application/x-www-form-urlencoded` rules, so `+` reads as a
//! space and `%XX` escapes are resolved.

use std::fmt;

use thiserror::Error;

const BTIH_PREFIX: &str = "urn:btih:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagnetError {
    #[error("Magnet link has no xt=urn:btih: parameter")]
    MissingInfoHash,
    #[error("Info hash must be 40 hex or 32 base32 characters, got {0:?}")]
    MalformedInfoHash(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashEncoding {
    Hex,
    Base32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoHash {
    value: String,
    encoding: HashEncoding,
}

impl InfoHash {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn encoding(&self) -> HashEncoding {
        self.encoding
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Returns the first `xt=urn:btih:` hash of the link.
///
/// The hash is returned as written; no case folding or base32 → hex
/// conversion is done.
pub fn parse_info_hash(magnet: &str) -> Result<InfoHash, MagnetError> {
    let raw = query_pairs(magnet)
        .filter(|(key, _)| key.eq_ignore_ascii_case("xt"))
        .find_map(|(_, value)| strip_prefix_ignore_case(&value, BTIH_PREFIX).map(str::to_string))
        .ok_or(MagnetError::MissingInfoHash)?;

    let encoding = if raw.len() == 40 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        HashEncoding::Hex
    } else if raw.len() == 32 && raw.bytes().all(is_base32) {
        HashEncoding::Base32
    } else {
        return Err(MagnetError::MalformedInfoHash(raw));
    };
    Ok(InfoHash {
        value: raw,
        encoding,
    })
}

/// Returns the decoded `dn=` value, or `None` when the link has no usable
/// display name.
pub fn parse_display_name(magnet: &str) -> Option<String> {
    query_pairs(magnet)
        .find(|(key, _)| key.eq_ignore_ascii_case("dn"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn query_pairs(magnet: &str) -> impl Iterator<Item = (String, String)> + '_ {
    let query = magnet.split_once('?').map(|(_, q)| q).unwrap_or("");
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

fn is_base32(b: u8) -> bool {
    b.is_ascii_alphabetic() || (b'2'..=b'7').contains(&b)
}
