mod client;
mod defaults;
mod episodes;
mod sports;
mod torrents;

use serde::{Deserialize, Serialize};

pub use client::*;
pub use defaults::*;
pub use torrents::TorrentStreamFormat;

const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid selector: {0}")]
    SelectorError(String),
    #[error("Response does not match any known format")]
    UnrecognizedFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Torrents,
    Streams,
    Episodes,
    Embeds,
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Catalog::Torrents => "torrents",
            Catalog::Streams => "streams",
            Catalog::Episodes => "episodes",
            Catalog::Embeds => "embeds",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    TorrentJson,
    TorrentHtml,
    SportsStreams,
    EpisodeSources,
    EmbedTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: String,
    pub catalog: Catalog,
    pub format: SourceFormat,
    pub url_template: String,
}

impl SourceDescriptor {
    pub fn new(id: &str, catalog: Catalog, format: SourceFormat, url_template: &str) -> Self {
        Self {
            id: id.to_string(),
            catalog,
            format,
            url_template: url_template.to_string(),
        }
    }

    pub fn expand(&self, resource_id: &str) -> String {
        self.url_template.replace(ID_PLACEHOLDER, resource_id)
    }

    pub fn has_placeholder(&self) -> bool {
        self.url_template.contains(ID_PLACEHOLDER)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TorrentEntry {
    pub info_hash: String,
    pub name: String,
    pub quality: Option<String>,
    pub size: Option<String>,
    pub seeders: Option<u64>,
    pub origin: Option<String>,
    pub trackers: Vec<String>,
}

impl TorrentEntry {
    pub fn magnet_uri(&self) -> String {
        let mut uri = format!(
            "magnet:?xt=urn:btih:{}&dn={}",
            self.info_hash,
            urlencoding::encode(&self.name)
        );

        for tracker in &self.trackers {
            uri.push_str("&tr=");
            uri.push_str(&urlencoding::encode(tracker));
        }

        uri
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub source: String,
    pub id: String,
    pub stream_no: u32,
    pub language: Option<String>,
    pub hd: bool,
    pub embed_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    pub url: String,
    pub quality: String,
    pub hls: bool,
    pub referer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedServer {
    pub server: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Torrent(TorrentEntry),
    Stream(StreamEntry),
    Rendition(Rendition),
    Embed(EmbedServer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSource {
    pub source: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub date: Option<i64>,
    pub popular: bool,
    pub sources: Vec<MatchSource>,
}
