use std::{path::PathBuf, time::Duration};

use anyhow::{Result, bail};
use clap::Parser;
use directories::ProjectDirs;
use url::Url;

use crate::service::ServiceOptions;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:3000/";
pub const DEFAULT_TORRENT_LINK_TEMPLATE: &str =
    "https://itorrents.org/torrent/{info_hash}.torrent?title={name}";

#[derive(Debug, Parser)]
#[command(name = "magnetbit", version, about = "Convert torrent URLs to magnet links and back")]
pub struct Args {
    /// Base URL of the conversion server
    #[arg(long, env = "MAGNETBIT_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    pub service_url: Url,

    /// Template for magnet → torrent links; `{info_hash}` and `{name}` are filled in
    #[arg(
        long,
        env = "MAGNETBIT_TORRENT_LINK_TEMPLATE",
        default_value = DEFAULT_TORRENT_LINK_TEMPLATE
    )]
    pub torrent_link_template: String,

    /// Delay before a synthesized torrent link is shown
    #[arg(long, default_value_t = 1000)]
    pub placeholder_delay_ms: u64,

    /// Give up on the conversion server after this many seconds
    #[arg(long, env = "MAGNETBIT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// File holding the theme preference
    #[arg(long)]
    pub theme_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceOptions,
    pub log_level: String,
    pub log_file: PathBuf,
    pub theme_file: PathBuf,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        if !args.torrent_link_template.contains("{info_hash}") {
            bail!("--torrent-link-template must contain {{info_hash}}");
        }
        if !matches!(args.service_url.scheme(), "http" | "https") {
            bail!("--service-url must be an http(s) URL");
        }
        let dirs = ProjectDirs::from("", "", "magnetbit");
        let theme_file = args.theme_file.unwrap_or_else(|| {
            dirs.as_ref()
                .map(|d| d.config_dir().join("theme"))
                .unwrap_or_else(|| PathBuf::from(".magnetbit-theme"))
        });
        let log_file = args.log_file.unwrap_or_else(|| {
            dirs.as_ref()
                .map(|d| d.data_local_dir().join("magnetbit.log"))
                .unwrap_or_else(|| PathBuf::from("magnetbit.log"))
        });
        Ok(Self {
            service: ServiceOptions {
                service_url: args.service_url,
                timeout: args.timeout_secs.map(Duration::from_secs),
                torrent_link_template: args.torrent_link_template,
                placeholder_delay: Duration::from_millis(args.placeholder_delay_ms),
            },
            log_level: args.log_level,
            log_file,
            theme_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(extra: &[&str]) -> Result<Config> {
        let mut argv = vec!["magnetbit", "--service-url", DEFAULT_SERVICE_URL];
        argv.extend_from_slice(extra);
        Config::from_args(Args::try_parse_from(argv)?)
    }

    #[test]
    fn explicit_paths_and_timeout() {
        let config = parse(&[
            "--timeout-secs",
            "30",
            "--theme-file",
            "/tmp/t",
            "--log-file",
            "/tmp/l.log",
            "--placeholder-delay-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(config.service.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.service.placeholder_delay, Duration::ZERO);
        assert_eq!(config.theme_file, PathBuf::from("/tmp/t"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/l.log"));
        assert_eq!(config.service.service_url.as_str(), DEFAULT_SERVICE_URL);
    }

    #[test]
    fn defaults_fill_in_paths() {
        let config = parse(&[]).unwrap();
        assert!(config.theme_file.ends_with("theme"));
        assert!(config.log_file.ends_with("magnetbit.log"));
    }

    #[test]
    fn template_needs_info_hash() {
        let err = parse(&["--torrent-link-template", "https://x/{name}"]).unwrap_err();
        assert!(err.to_string().contains("{info_hash}"));
    }

    #[test]
    fn service_url_must_be_http() {
        let args =
            Args::try_parse_from(["magnetbit", "--service-url", "ftp://example.com/"]).unwrap();
        assert!(Config::from_args(args).is_err());
        assert!(Args::try_parse_from(["magnetbit", "--service-url", "not a url"]).is_err());
    }
}
