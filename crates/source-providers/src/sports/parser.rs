use crate::{LiveMatch, MatchSource, ParseError, StreamEntry};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStream {
    id: String,
    stream_no: u32,
    language: Option<String>,
    #[serde(default)]
    hd: bool,
    embed_url: Option<String>,
    source: String,
}

#[derive(Deserialize)]
struct RawMatch {
    id: String,
    title: String,
    category: Option<String>,
    date: Option<i64>,
    #[serde(default)]
    popular: bool,
    #[serde(default)]
    sources: Vec<MatchSource>,
}

pub(crate) fn parse_streams(raw_json: &str) -> Result<Vec<StreamEntry>, ParseError> {
    let streams: Vec<RawStream> = serde_json::from_str(raw_json)?;

    Ok(streams
        .into_iter()
        .filter_map(|stream| {
            let embed_url = stream.embed_url.filter(|url| !url.is_empty())?;

            Some(StreamEntry {
                source: stream.source,
                id: stream.id,
                stream_no: stream.stream_no,
                language: stream.language.filter(|language| !language.is_empty()),
                hd: stream.hd,
                embed_url,
            })
        })
        .collect())
}

pub(crate) fn parse_matches(raw_json: &str) -> Result<Vec<LiveMatch>, ParseError> {
    let matches: Vec<RawMatch> = serde_json::from_str(raw_json)?;

    Ok(matches
        .into_iter()
        .map(|raw| LiveMatch {
            id: raw.id,
            title: raw.title,
            category: raw.category,
            date: raw.date,
            popular: raw.popular,
            sources: raw.sources,
        })
        .collect())
}
