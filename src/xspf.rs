//! XSPF playlist serialization.
//!
//! Renders a track list plus playlist-level metadata into an XSPF document
//! (<https://xspf.org/spec>). Child fields are emitted only when present:
//! `location` always comes first, `title`/`creator` always exist (they carry
//! sentinel defaults), and `album`/`trackNum`/`duration` are omitted when
//! unknown rather than written as empty placeholders.

use crate::normalize::escape_xml;
use crate::types::{PlaylistMetadata, TrackRecord};

/// MIME type of the serialized document.
pub const XSPF_MIME: &str = "application/xspf+xml";

const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";

/// Serialize playlist metadata and records into XSPF text.
///
/// All text content is escaped exactly once here; records and metadata are
/// stored unescaped everywhere else in the crate.
pub fn serialize(metadata: &PlaylistMetadata, tracks: &[TrackRecord]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<playlist version=\"1\" xmlns=\"{XSPF_NAMESPACE}\">\n"
    ));

    push_element(&mut out, 1, "title", &metadata.title);
    if let Some(image) = &metadata.image_url {
        push_element(&mut out, 1, "image", image);
    }
    if let Some(source) = &metadata.source_page_url {
        push_element(&mut out, 1, "location", source);
    }

    out.push_str("  <trackList>\n");
    for track in tracks {
        out.push_str("    <track>\n");
        push_element(&mut out, 3, "location", &track.location);
        push_element(&mut out, 3, "title", &track.title);
        push_element(&mut out, 3, "creator", &track.creator);
        if let Some(album) = &track.album {
            push_element(&mut out, 3, "album", album);
        }
        if let Some(number) = track.track_number {
            push_element(&mut out, 3, "trackNum", &number.to_string());
        }
        if let Some(duration) = track.duration_ms {
            push_element(&mut out, 3, "duration", &duration.to_string());
        }
        out.push_str("    </track>\n");
    }
    out.push_str("  </trackList>\n");
    out.push_str("</playlist>\n");
    out
}

fn push_element(out: &mut String, indent: usize, name: &str, text: &str) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str(&format!("<{name}>{}</{name}>\n", escape_xml(text)));
}
