use aggregation::{
    Candidate, CandidateKey, CandidateSource, Payload, ResourceId, SourceError, SourceId,
};
use async_trait::async_trait;
use source_providers::{Entry, ProviderError, SourceClient, SourceDescriptor};
use std::sync::Arc;
use std::time::Duration;

/// Dedupe key of an entry. Entries with equal keys are the same media to the user.
pub(crate) fn candidate_key(entry: &Entry) -> CandidateKey {
    match entry {
        Entry::Torrent(torrent) => torrent.info_hash.to_lowercase().into(),
        Entry::Stream(stream) => {
            format!("{}:{}:{}", stream.source, stream.id, stream.stream_no).into()
        }
        Entry::Rendition(rendition) => rendition.quality.clone().into(),
        Entry::Embed(embed) => embed.server.clone().into(),
    }
}

pub(crate) fn to_candidate(source_id: &SourceId, entry: Entry) -> Candidate {
    let key = candidate_key(&entry);

    match entry {
        Entry::Torrent(torrent) => {
            let mut candidate = Candidate::new(
                source_id.clone(),
                key,
                Payload::Magnet {
                    uri: torrent.magnet_uri(),
                    name: torrent.name.clone(),
                },
            )
            .with_metadata("title", torrent.name);

            if let Some(quality) = torrent.quality {
                candidate = candidate.with_metadata("quality", quality);
            }
            if let Some(seeders) = torrent.seeders {
                candidate = candidate.with_metadata("seeders", seeders);
            }
            if let Some(size) = torrent.size {
                candidate = candidate.with_metadata("size", size);
            }
            if let Some(origin) = torrent.origin {
                candidate = candidate.with_metadata("origin", origin);
            }

            candidate
        }
        Entry::Stream(stream) => {
            let mut candidate = Candidate::new(
                source_id.clone(),
                key,
                Payload::Embed {
                    url: stream.embed_url,
                },
            )
            .with_metadata("hd", stream.hd)
            .with_metadata("stream_no", u64::from(stream.stream_no));

            if let Some(language) = stream.language {
                candidate = candidate.with_metadata("language", language);
            }

            candidate
        }
        Entry::Rendition(rendition) => Candidate::new(
            source_id.clone(),
            key,
            Payload::Media {
                url: rendition.url,
                hls: rendition.hls,
                referer: rendition.referer,
            },
        )
        .with_metadata("quality", rendition.quality),
        Entry::Embed(embed) => Candidate::new(
            source_id.clone(),
            key,
            Payload::Embed { url: embed.url },
        )
        .with_metadata("name", embed.server),
    }
}

/// Adapts one configured upstream to the aggregation fan-out.
pub(crate) struct ProviderSource {
    descriptor: SourceDescriptor,
    client: Arc<SourceClient>,
    timeout: Duration,
}

impl ProviderSource {
    pub(crate) fn new(
        descriptor: SourceDescriptor,
        client: Arc<SourceClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            descriptor,
            client,
            timeout,
        }
    }

    fn to_source_error(&self, error: ProviderError) -> SourceError {
        match error {
            error if error.is_timeout() => SourceError::Timeout(self.timeout),
            ProviderError::Request(error) => SourceError::Http(error.to_string()),
            ProviderError::Status(status) => SourceError::Http(status.to_string()),
            ProviderError::Parse(error) => SourceError::Parse(error.to_string()),
        }
    }
}

#[async_trait]
impl CandidateSource for ProviderSource {
    fn id(&self) -> SourceId {
        SourceId::from(self.descriptor.id.as_str())
    }

    async fn fetch(&self, resource_id: &ResourceId) -> Result<Vec<Candidate>, SourceError> {
        let source_id = self.id();

        let entries = self
            .client
            .fetch_entries(&self.descriptor, resource_id)
            .await
            .map_err(|error| self.to_source_error(error))?;

        Ok(entries
            .into_iter()
            .map(|entry| to_candidate(&source_id, entry))
            .collect())
    }
}
