use crate::{ParseError, TorrentEntry};
use scraper::{Html, Selector};

use super::parser::detect_quality;

const INFO_HASH_PARAM: &str = "xt=urn:btih:";
const TRACKER_PARAM: &str = "tr=";

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|error| ParseError::SelectorError(error.to_string()))
}

fn get_info_hash(magnet: &str) -> Option<String> {
    let start = magnet.find(INFO_HASH_PARAM)? + INFO_HASH_PARAM.len();
    let hash = magnet[start..].split('&').next()?;

    if hash.is_empty() {
        None
    } else {
        Some(hash.to_lowercase())
    }
}

fn get_trackers(magnet: &str) -> Vec<String> {
    magnet
        .split(|c| c == '?' || c == '&')
        .filter_map(|param| param.strip_prefix(TRACKER_PARAM))
        .filter_map(|tracker| urlencoding::decode(tracker).ok())
        .map(|tracker| tracker.into_owned())
        .collect()
}

pub(crate) fn parse_results_page(raw_html: &str) -> Result<Vec<TorrentEntry>, ParseError> {
    let html = Html::parse_document(raw_html);

    let row_selector = selector(r#"table.results tr"#)?;
    let magnet_selector = selector(r#"td.name a[href^="magnet:"]"#)?;
    let size_selector = selector(r#"td.size"#)?;
    let seeds_selector = selector(r#"td.seeds"#)?;

    let results = html
        .select(&row_selector)
        .filter_map(|row| {
            let link = row.select(&magnet_selector).next()?;
            let magnet = link.value().attr("href")?;
            let info_hash = get_info_hash(magnet)?;
            let name = link.text().collect::<String>().trim().to_string();
            let size = row
                .select(&size_selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|size| !size.is_empty());
            let seeders = row
                .select(&seeds_selector)
                .next()
                .and_then(|el| el.text().collect::<String>().trim().parse::<u64>().ok());

            Some(TorrentEntry {
                info_hash,
                quality: detect_quality(&name),
                name,
                size,
                seeders,
                origin: None,
                trackers: get_trackers(magnet),
            })
        })
        .collect();

    Ok(results)
}
