use crate::{ParseError, Rendition};
use serde::Deserialize;

const HLS_EXTENSION: &str = ".m3u8";
const DEFAULT_QUALITY: &str = "default";

#[derive(Deserialize)]
struct RawHeaders {
    #[serde(rename = "Referer")]
    referer: Option<String>,
}

#[derive(Deserialize)]
struct RawRendition {
    url: String,
    quality: Option<String>,
    #[serde(rename = "isM3U8")]
    is_m3u8: Option<bool>,
}

#[derive(Deserialize)]
struct RawEpisodeSources {
    headers: Option<RawHeaders>,
    #[serde(default)]
    sources: Vec<RawRendition>,
}

pub(crate) fn parse_sources(raw_json: &str) -> Result<Vec<Rendition>, ParseError> {
    let body: RawEpisodeSources = serde_json::from_str(raw_json)?;
    let referer = body.headers.and_then(|headers| headers.referer);

    Ok(body
        .sources
        .into_iter()
        .map(|source| Rendition {
            hls: source
                .is_m3u8
                .unwrap_or_else(|| source.url.ends_with(HLS_EXTENSION)),
            quality: source.quality.unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
            url: source.url,
            referer: referer.clone(),
        })
        .collect())
}
