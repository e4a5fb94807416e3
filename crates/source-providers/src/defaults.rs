use crate::{Catalog, SourceDescriptor, SourceFormat};

pub const DEFAULT_LIVE_MATCHES_URL: &str = "https://streamed.su/api/matches/live";

const TORRENT_INDEXERS: [(&str, &str); 4] = [
    ("torrentio", "https://torrentio.strem.fun/stream/movie/{id}.json"),
    ("knightcrawler", "https://knightcrawler.elfhosted.com/stream/movie/{id}.json"),
    ("comet", "https://comet.elfhosted.com/stream/movie/{id}.json"),
    ("mediafusion", "https://mediafusion.elfhosted.com/stream/movie/{id}.json"),
];

const SPORTS_SOURCES: [&str; 5] = ["alpha", "bravo", "charlie", "delta", "echo"];

const EPISODE_RESOLVERS: [(&str, &str); 2] = [
    ("gogoanime", "https://api.consumet.org/anime/gogoanime/watch/{id}"),
    ("zoro", "https://api.consumet.org/anime/zoro/watch?episodeId={id}"),
];

const EMBED_SERVERS: [(&str, &str); 4] = [
    ("vidsrc", "https://vidsrc.xyz/embed/movie/{id}"),
    ("2embed", "https://www.2embed.cc/embed/{id}"),
    ("superembed", "https://multiembed.mov/?video_id={id}"),
    ("embedsu", "https://embed.su/embed/movie/{id}"),
];

/// Built-in source set used when no descriptor file is configured.
pub fn default_descriptors() -> Vec<SourceDescriptor> {
    let torrents = TORRENT_INDEXERS.iter().map(|(id, url)| {
        SourceDescriptor::new(id, Catalog::Torrents, SourceFormat::TorrentJson, url)
    });
    let streams = SPORTS_SOURCES.iter().map(|source| {
        SourceDescriptor::new(
            source,
            Catalog::Streams,
            SourceFormat::SportsStreams,
            &format!("https://streamed.su/api/stream/{}/{{id}}", source),
        )
    });
    let episodes = EPISODE_RESOLVERS.iter().map(|(id, url)| {
        SourceDescriptor::new(id, Catalog::Episodes, SourceFormat::EpisodeSources, url)
    });
    let embeds = EMBED_SERVERS.iter().map(|(id, url)| {
        SourceDescriptor::new(id, Catalog::Embeds, SourceFormat::EmbedTemplate, url)
    });

    torrents.chain(streams).chain(episodes).chain(embeds).collect()
}
