//! The composition wire format submitted to the render service.
//!
//! This is the contract boundary between the editor and the service:
//! a versioned, self-describing JSON document. Pixel coordinates and
//! z-order are integers; visibility bounds are seconds as floats.
//! Decoders must ignore unknown fields so both sides can evolve
//! independently.

use serde::{Deserialize, Serialize};

use crate::overlay::{Overlay, OverlayKind};
use crate::store::OverlayStore;

/// Current composition format version.
pub const COMPOSITION_FORMAT_VERSION: u32 = 1;

/// Transport-ready description of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDescription {
    /// Format version tag.
    pub version: u32,

    /// Video duration in seconds, when known at serialization time.
    #[serde(default)]
    pub duration: Option<f64>,

    /// Overlay records in paint order.
    #[serde(default)]
    pub overlays: Vec<OverlayRecord>,
}

/// Flat wire record for one overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRecord {
    /// Overlay id, stringified for transport.
    pub id: String,

    /// `text` or `image`.
    pub kind: RecordKind,

    /// Text payload, present for text overlays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Image source locator, present for image overlays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Placement in display-local pixels.
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,

    /// Visibility window, seconds from video start.
    pub start: f64,
    pub end: f64,

    /// Paint order.
    pub z: i64,
}

/// Overlay kind on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Text,
    Image,
}

impl CompositionDescription {
    /// Serialize the store into a transport-ready description.
    ///
    /// Deterministic: overlays appear in paint order, and all fields use
    /// the fixed encodings above.
    pub fn from_store(store: &OverlayStore) -> Self {
        Self {
            version: COMPOSITION_FORMAT_VERSION,
            duration: store.video_duration(),
            overlays: store.all().into_iter().map(OverlayRecord::from).collect(),
        }
    }

    /// Encode as a JSON string for the `overlays` form field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from JSON. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Overlay> for OverlayRecord {
    fn from(overlay: &Overlay) -> Self {
        let (kind, text, source) = match &overlay.kind {
            OverlayKind::Text { text } => (RecordKind::Text, Some(text.clone()), None),
            OverlayKind::Image { source } => (RecordKind::Image, None, Some(source.clone())),
        };

        Self {
            id: overlay.id.to_string(),
            kind,
            text,
            source,
            x: overlay.x as i64,
            y: overlay.y as i64,
            w: overlay.width as i64,
            h: overlay.height as i64,
            start: overlay.visible_from,
            end: overlay.visible_until,
            z: overlay.z_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> OverlayStore {
        let mut store = OverlayStore::new();
        store.set_video_duration(12.0);
        let a = store.add_text();
        store.set_text(a, "title card").unwrap();
        store.update_timing(a, 0.5, 4.25).unwrap();
        let b = store.add_image("file:///tmp/logo.png");
        store.update_timing(b, 2.0, 8.0).unwrap();
        store
    }

    #[test]
    fn test_serialize_is_paint_ordered_and_versioned() {
        let store = sample_store();
        let composition = CompositionDescription::from_store(&store);

        assert_eq!(composition.version, COMPOSITION_FORMAT_VERSION);
        assert_eq!(composition.duration, Some(12.0));
        assert_eq!(composition.overlays.len(), 2);
        assert!(composition
            .overlays
            .windows(2)
            .all(|w| w[0].z <= w[1].z));
    }

    #[test]
    fn test_round_trip_reproduces_placement_and_timing() {
        let store = sample_store();
        let composition = CompositionDescription::from_store(&store);

        let json = composition.to_json().unwrap();
        let decoded = CompositionDescription::from_json(&json).unwrap();

        assert_eq!(decoded, composition);
        let title = &decoded.overlays[0];
        assert_eq!(title.kind, RecordKind::Text);
        assert_eq!(title.text.as_deref(), Some("title card"));
        assert_eq!((title.x, title.y, title.w, title.h), (50, 50, 120, 40));
        assert_eq!((title.start, title.end), (0.5, 4.25));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let json = r#"{
            "version": 1,
            "duration": 9.0,
            "renderer_hint": "gpu",
            "overlays": [{
                "id": "7",
                "kind": "text",
                "text": "hi",
                "x": 1, "y": 2, "w": 3, "h": 4,
                "start": 0.0, "end": 1.0, "z": 0,
                "future_field": true
            }]
        }"#;

        let decoded = CompositionDescription::from_json(json).unwrap();
        assert_eq!(decoded.overlays.len(), 1);
        assert_eq!(decoded.overlays[0].id, "7");
    }

    #[test]
    fn test_image_record_has_source_not_text() {
        let mut store = OverlayStore::new();
        store.add_image("clip.png");
        let composition = CompositionDescription::from_store(&store);

        let record = &composition.overlays[0];
        assert_eq!(record.kind, RecordKind::Image);
        assert_eq!(record.source.as_deref(), Some("clip.png"));
        assert!(record.text.is_none());

        let json = composition.to_json().unwrap();
        assert!(!json.contains("\"text\""));
    }
}
