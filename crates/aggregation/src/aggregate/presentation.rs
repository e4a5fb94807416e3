use crate::aggregate::types::{Candidate, Payload};
use crate::{CandidateKey, SourceId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Presentation {
    Iframe {
        src: String,
    },
    MediaElement {
        src: String,
        hls: bool,
        referer: Option<String>,
    },
    DownloadLink {
        href: String,
        label: String,
    },
}

pub fn render(candidate: &Candidate) -> Presentation {
    match &candidate.payload {
        Payload::Embed { url } => Presentation::Iframe { src: url.clone() },
        Payload::Media { url, hls, referer } => Presentation::MediaElement {
            src: url.clone(),
            hls: *hls,
            referer: referer.clone(),
        },
        Payload::Magnet { uri, name } => Presentation::DownloadLink {
            href: uri.clone(),
            label: name.clone(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlOption {
    pub key: CandidateKey,
    pub source_id: SourceId,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ControlSurface {
    pub options: Vec<ControlOption>,
}

const LABEL_FIELDS: [&str; 4] = ["quality", "language", "title", "name"];

fn get_label(candidate: &Candidate) -> String {
    let parts: Vec<_> = LABEL_FIELDS
        .iter()
        .filter_map(|field| candidate.metadata_text(field))
        .filter(|text| !text.is_empty())
        .take(2)
        .collect();

    if parts.is_empty() {
        return candidate.source_id.to_string();
    }

    format!("{} · {}", candidate.source_id, parts.join(" "))
}

pub fn control_surface(ranked: &[&Candidate], chosen: Option<&CandidateKey>) -> ControlSurface {
    let options = ranked
        .iter()
        .map(|candidate| ControlOption {
            key: candidate.key.clone(),
            source_id: candidate.source_id.clone(),
            label: get_label(candidate),
            active: Some(&candidate.key) == chosen,
        })
        .collect();

    ControlSurface { options }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_each_payload_kind() {
        let embed = Candidate::new(
            "server1".into(),
            "server1".into(),
            Payload::Embed {
                url: "https://embed.example/movie/603".into(),
            },
        );
        let media = Candidate::new(
            "gogo".into(),
            "1080p".into(),
            Payload::Media {
                url: "https://cdn.example/ep1.m3u8".into(),
                hls: true,
                referer: Some("https://gogo.example/".into()),
            },
        );
        let magnet = Candidate::new(
            "torrentio".into(),
            "abc".into(),
            Payload::Magnet {
                uri: "magnet:?xt=urn:btih:abc".into(),
                name: "Movie.2160p".into(),
            },
        );

        assert_eq!(
            Presentation::Iframe {
                src: "https://embed.example/movie/603".into()
            },
            render(&embed)
        );
        assert_eq!(
            Presentation::MediaElement {
                src: "https://cdn.example/ep1.m3u8".into(),
                hls: true,
                referer: Some("https://gogo.example/".into()),
            },
            render(&media)
        );
        assert_eq!(
            Presentation::DownloadLink {
                href: "magnet:?xt=urn:btih:abc".into(),
                label: "Movie.2160p".into(),
            },
            render(&magnet)
        );
    }

    #[test]
    fn test_control_surface_marks_only_chosen_option() {
        let a = Candidate::new(
            "alpha".into(),
            "alpha:m1:1".into(),
            Payload::Embed {
                url: "https://e/1".into(),
            },
        )
        .with_metadata("language", "English");
        let b = Candidate::new(
            "bravo".into(),
            "bravo:m1:1".into(),
            Payload::Embed {
                url: "https://e/2".into(),
            },
        );

        let surface = control_surface(&[&a, &b], Some(&"bravo:m1:1".into()));

        assert_eq!(2, surface.options.len());
        assert!(!surface.options[0].active);
        assert!(surface.options[1].active);
        assert_eq!("alpha · English", surface.options[0].label);
        assert_eq!("bravo", surface.options[1].label);
    }
}
