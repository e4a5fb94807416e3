use crate::{
    episodes, sports, torrents, EmbedServer, Entry, LiveMatch, ParseError, SourceDescriptor,
    SourceFormat,
};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("media-hub/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("Unexpected response status: {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Request(error) if error.is_timeout())
    }
}

pub fn parse_entries(format: SourceFormat, raw: &str) -> Result<Vec<Entry>, ParseError> {
    let entries = match format {
        SourceFormat::TorrentJson => torrents::parse_streams(raw)?
            .into_iter()
            .map(Entry::Torrent)
            .collect(),
        SourceFormat::TorrentHtml => torrents::parse_results_page(raw)?
            .into_iter()
            .map(Entry::Torrent)
            .collect(),
        SourceFormat::SportsStreams => sports::parse_streams(raw)?
            .into_iter()
            .map(Entry::Stream)
            .collect(),
        SourceFormat::EpisodeSources => episodes::parse_sources(raw)?
            .into_iter()
            .map(Entry::Rendition)
            .collect(),
        SourceFormat::EmbedTemplate => vec![],
    };

    Ok(entries)
}

#[derive(Clone)]
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    pub fn create(timeout: Duration, user_agent: Option<&str>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        Ok(response.text().await?)
    }

    pub async fn fetch_entries(
        &self,
        descriptor: &SourceDescriptor,
        resource_id: &str,
    ) -> Result<Vec<Entry>, ProviderError> {
        let url = descriptor.expand(resource_id);

        if descriptor.format == SourceFormat::EmbedTemplate {
            return Ok(vec![Entry::Embed(EmbedServer {
                server: descriptor.id.clone(),
                url,
            })]);
        }

        debug!(source_id = %descriptor.id, %url, "Requesting source");

        let raw = self.get_text(&url).await?;

        Ok(parse_entries(descriptor.format, &raw)?)
    }

    pub async fn fetch_live_matches(&self, url: &str) -> Result<Vec<LiveMatch>, ProviderError> {
        let raw = self.get_text(url).await?;

        Ok(sports::parse_matches(&raw)?)
    }
}
