use crate::{ParseError, TorrentEntry};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const SEEDERS_MARKER: &str = "👤";
const SIZE_MARKER: &str = "💾";
const ORIGIN_MARKERS: [&str; 2] = ["⚙", "🔗"];
const TRACKER_PREFIX: &str = "tracker:";

const QUALITY_TOKENS: [(&str, &str); 5] = [
    ("2160p", "2160p"),
    ("4k", "2160p"),
    ("1080p", "1080p"),
    ("720p", "720p"),
    ("480p", "480p"),
];

/// Shapes of stream listings returned by torrent indexers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorrentStreamFormat {
    /// Release name and stats carried in a multi-line `title`.
    Titled,
    /// Release name and stats carried in a multi-line `description`.
    Described,
}

impl TorrentStreamFormat {
    pub fn detect(body: &Value) -> Option<Self> {
        let streams = body.get("streams")?.as_array()?;

        streams.iter().find_map(|stream| {
            if stream.get("title").map_or(false, Value::is_string) {
                Some(TorrentStreamFormat::Titled)
            } else if stream.get("description").map_or(false, Value::is_string) {
                Some(TorrentStreamFormat::Described)
            } else {
                None
            }
        })
    }

    fn parse(&self, stream: Value) -> Option<TorrentEntry> {
        match self {
            TorrentStreamFormat::Titled => parse_titled(stream),
            TorrentStreamFormat::Described => parse_described(stream),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BehaviorHints {
    filename: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStream {
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    info_hash: Option<String>,
    #[serde(default)]
    sources: Vec<String>,
    behavior_hints: Option<BehaviorHints>,
}

#[derive(Default, Debug, PartialEq)]
struct Stats {
    seeders: Option<u64>,
    size: Option<String>,
    origin: Option<String>,
}

pub(crate) fn detect_quality(text: &str) -> Option<String> {
    let text = text.to_lowercase();

    QUALITY_TOKENS
        .iter()
        .find(|(token, _)| text.contains(token))
        .map(|(_, quality)| quality.to_string())
}

fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let start = line.find(marker)? + marker.len();
    let rest = line[start..].trim_start_matches('\u{fe0f}');
    let end = [SEEDERS_MARKER, SIZE_MARKER]
        .iter()
        .chain(ORIGIN_MARKERS.iter())
        .filter_map(|other| rest.find(other))
        .min()
        .unwrap_or(rest.len());
    let value = rest[..end].trim();

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_stats<'a>(lines: impl Iterator<Item = &'a str>) -> Stats {
    let mut stats = Stats::default();

    for line in lines {
        if let Some(seeders) = marker_value(line, SEEDERS_MARKER) {
            stats.seeders = seeders
                .split_whitespace()
                .next()
                .and_then(|count| count.parse().ok());
        }

        if let Some(size) = marker_value(line, SIZE_MARKER) {
            stats.size.replace(size.to_string());
        }

        if let Some(origin) = ORIGIN_MARKERS
            .iter()
            .find_map(|marker| marker_value(line, marker))
        {
            stats.origin.replace(origin.to_string());
        }
    }

    stats
}

fn get_trackers(sources: &[String]) -> Vec<String> {
    sources
        .iter()
        .filter_map(|source| source.strip_prefix(TRACKER_PREFIX))
        .map(str::to_string)
        .collect()
}

fn to_entry(raw: &RawStream, name: String, stats: Stats) -> Option<TorrentEntry> {
    let info_hash = raw.info_hash.as_ref()?.to_lowercase();
    let quality = raw
        .name
        .as_deref()
        .and_then(detect_quality)
        .or_else(|| detect_quality(&name));

    Some(TorrentEntry {
        info_hash,
        name,
        quality,
        size: stats.size,
        seeders: stats.seeders,
        origin: stats.origin,
        trackers: get_trackers(&raw.sources),
    })
}

fn parse_titled(stream: Value) -> Option<TorrentEntry> {
    let raw: RawStream = serde_json::from_value(stream).ok()?;
    let title = raw.title.as_deref()?;
    let name = title.lines().next()?.trim().to_string();
    let stats = parse_stats(title.lines().skip(1));

    to_entry(&raw, name, stats)
}

fn parse_described(stream: Value) -> Option<TorrentEntry> {
    let raw: RawStream = serde_json::from_value(stream).ok()?;
    let description = raw.description.as_deref()?;
    let name = match raw.behavior_hints.as_ref().and_then(|h| h.filename.clone()) {
        Some(filename) => filename,
        None => description
            .lines()
            .next()?
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .trim()
            .to_string(),
    };
    let stats = parse_stats(description.lines());

    to_entry(&raw, name, stats)
}

pub(crate) fn parse_streams(raw_json: &str) -> Result<Vec<TorrentEntry>, ParseError> {
    let body: Value = serde_json::from_str(raw_json)?;

    let streams = match body.get("streams").and_then(Value::as_array) {
        Some(streams) if streams.is_empty() => return Ok(vec![]),
        Some(streams) => streams.clone(),
        None => return Err(ParseError::UnrecognizedFormat),
    };

    let format = TorrentStreamFormat::detect(&body).ok_or(ParseError::UnrecognizedFormat)?;
    let total = streams.len();

    let entries: Vec<_> = streams
        .into_iter()
        .filter_map(|stream| format.parse(stream))
        .collect();

    if entries.len() < total {
        debug!(
            ?format,
            skipped = total - entries.len(),
            "Skipped streams without an info hash"
        );
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_are_read_between_markers() {
        let stats = parse_stats(["👤 1523 💾 2.33 GB ⚙️ ThePirateBay"].into_iter());

        assert_eq!(
            Stats {
                seeders: Some(1523),
                size: Some("2.33 GB".into()),
                origin: Some("ThePirateBay".into()),
            },
            stats
        );
    }

    #[test]
    fn test_quality_detection() {
        assert_eq!(Some("2160p".into()), detect_quality("Torrentio\n4k HDR"));
        assert_eq!(Some("720p".into()), detect_quality("Movie.2019.720p.BluRay"));
        assert_eq!(None, detect_quality("Movie.2019.CAM"));
    }
}
