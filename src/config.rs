use aggregation::RankingMode;
use serde::Deserialize;
use source_providers::{default_descriptors, SourceDescriptor, DEFAULT_LIVE_MATCHES_URL};
use std::time::Duration;

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30u64
}

fn default_request_timeout_ms() -> u64 {
    8000u64
}

fn default_grace_delay_ms() -> u64 {
    3000u64
}

fn default_live_refresh_secs() -> u64 {
    60u64
}

fn default_view_idle_secs() -> u64 {
    1800u64
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SourcesConfigError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error("Source {0} has no {{id}} placeholder in its url template")]
    MissingPlaceholder(String),
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    #[serde(default = "default_bind_address")]
    pub(crate) bind_address: String,
    #[serde(default = "default_shutdown_timeout")]
    pub(crate) shutdown_timeout: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub(crate) request_timeout_ms: u64,
    #[serde(default = "default_grace_delay_ms")]
    pub(crate) grace_delay_ms: u64,
    #[serde(default)]
    pub(crate) ranking: RankingMode,
    pub(crate) state_storage_directory: Option<String>,
    pub(crate) sources_config: Option<String>,
    pub(crate) live_matches_url: Option<String>,
    #[serde(default = "default_live_refresh_secs")]
    pub(crate) live_refresh_secs: u64,
    #[serde(default = "default_view_idle_secs")]
    pub(crate) view_idle_secs: u64,
    pub(crate) user_agent: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        match envy::from_env::<Self>() {
            Ok(config) => config,
            Err(error) => panic!("Missing environment variable: {:#?}", error),
        }
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub(crate) fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }

    pub(crate) fn live_matches_url(&self) -> &str {
        self.live_matches_url
            .as_deref()
            .unwrap_or(DEFAULT_LIVE_MATCHES_URL)
    }

    /// Zero disables the live matches refresh.
    pub(crate) fn live_refresh_period(&self) -> Option<Duration> {
        match self.live_refresh_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Zero keeps views open until they are closed.
    pub(crate) fn view_idle_timeout(&self) -> Option<Duration> {
        match self.view_idle_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub(crate) fn load_descriptors(&self) -> Result<Vec<SourceDescriptor>, SourcesConfigError> {
        match &self.sources_config {
            Some(path) => parse_descriptors(&std::fs::read_to_string(path)?),
            None => Ok(default_descriptors()),
        }
    }
}

pub(crate) fn parse_descriptors(raw: &str) -> Result<Vec<SourceDescriptor>, SourcesConfigError> {
    let descriptors: Vec<SourceDescriptor> = serde_json::from_str(raw)?;

    if let Some(descriptor) = descriptors.iter().find(|d| !d.has_placeholder()) {
        return Err(SourcesConfigError::MissingPlaceholder(descriptor.id.clone()));
    }

    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_providers::{Catalog, SourceFormat};

    #[test]
    fn test_descriptor_file_parsing() {
        let descriptors = parse_descriptors(
            r#"[
                {"id":"indexer","catalog":"torrents","format":"torrent_html","url_template":"https://indexer.example/search?q={id}"},
                {"id":"vidsrc","catalog":"embeds","format":"embed_template","url_template":"https://vidsrc.xyz/embed/movie/{id}"}
            ]"#,
        )
        .unwrap();

        assert_eq!(2, descriptors.len());
        assert_eq!(Catalog::Torrents, descriptors[0].catalog);
        assert_eq!(SourceFormat::TorrentHtml, descriptors[0].format);
    }

    #[test]
    fn test_view_idle_timeout_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(Some(Duration::from_secs(1800)), config.view_idle_timeout());

        let config: Config = serde_json::from_str(r#"{"view_idle_secs":0}"#).unwrap();
        assert_eq!(None, config.view_idle_timeout());
    }

    #[test]
    fn test_descriptor_without_placeholder_is_rejected() {
        let result = parse_descriptors(
            r#"[{"id":"static","catalog":"embeds","format":"embed_template","url_template":"https://static.example/"}]"#,
        );

        assert!(matches!(result, Err(SourcesConfigError::MissingPlaceholder(id)) if id == "static"));
    }
}
