//! The overlay store: single-owner container for overlays and selection.
//!
//! All mutation goes through `&mut self`, so access is serialized by
//! ownership. The store performs no I/O; it only maintains the overlay
//! set, the (at most one) selected overlay, and the invariants on
//! visibility windows.

use crate::overlay::{Overlay, OverlayId, OverlayKind};

/// Geometry and payload applied to newly created overlays.
#[derive(Debug, Clone)]
pub struct OverlayDefaults {
    /// Payload for a fresh text overlay.
    pub text_payload: String,

    /// Origin for a fresh text overlay, display-local pixels.
    pub text_origin: (i32, i32),

    /// Size for a fresh text overlay.
    pub text_size: (u32, u32),

    /// Origin for a fresh image overlay.
    pub image_origin: (i32, i32),

    /// Size for a fresh image overlay.
    pub image_size: (u32, u32),

    /// Length of the default visibility window, seconds. The window is
    /// `[0, min(window_secs, duration)]` when the duration is known.
    pub window_secs: f64,
}

impl Default for OverlayDefaults {
    fn default() -> Self {
        Self {
            text_payload: "New Text".to_string(),
            text_origin: (50, 50),
            text_size: (120, 40),
            image_origin: (80, 80),
            image_size: (100, 100),
            window_secs: 5.0,
        }
    }
}

/// Errors raised by store operations.
///
/// Referencing an id that is not in the store is a caller contract
/// violation and is reported, never silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Unknown overlay id: {id}")]
    UnknownOverlay { id: OverlayId },

    #[error("Overlay {id} is not a text overlay")]
    KindMismatch { id: OverlayId },
}

/// The set of overlays in a composition plus selection state.
#[derive(Debug, Clone)]
pub struct OverlayStore {
    /// Overlays in insertion order. Paint order is resolved in `all()`.
    overlays: Vec<Overlay>,
    next_id: u64,
    selected: Option<OverlayId>,
    video_duration: Option<f64>,
    version: u64,
    defaults: OverlayDefaults,
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayStore {
    /// Create an empty store with built-in defaults.
    pub fn new() -> Self {
        Self::with_defaults(OverlayDefaults::default())
    }

    /// Create an empty store with the given new-overlay defaults.
    pub fn with_defaults(defaults: OverlayDefaults) -> Self {
        Self {
            overlays: Vec::new(),
            next_id: 1,
            selected: None,
            video_duration: None,
            version: 0,
            defaults,
        }
    }

    /// Number of overlays in the store.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Mutation counter, bumped on every change. Usable as a
    /// memoization key together with a playback position.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Currently selected overlay, if any.
    pub fn selected(&self) -> Option<OverlayId> {
        self.selected
    }

    /// Video duration in seconds, once known.
    pub fn video_duration(&self) -> Option<f64> {
        self.video_duration
    }

    /// Look up an overlay by id.
    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Add a text overlay with default payload, placement, and window,
    /// and select it. Always succeeds.
    pub fn add_text(&mut self) -> OverlayId {
        let kind = OverlayKind::Text {
            text: self.defaults.text_payload.clone(),
        };
        let origin = self.defaults.text_origin;
        let size = self.defaults.text_size;
        self.insert(kind, origin, size)
    }

    /// Add an image overlay for an already-resolved source locator,
    /// and select it. Always succeeds.
    pub fn add_image(&mut self, source: impl Into<String>) -> OverlayId {
        let kind = OverlayKind::Image {
            source: source.into(),
        };
        let origin = self.defaults.image_origin;
        let size = self.defaults.image_size;
        self.insert(kind, origin, size)
    }

    fn insert(&mut self, kind: OverlayKind, origin: (i32, i32), size: (u32, u32)) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;

        let window_secs = match self.video_duration {
            Some(duration) => self.defaults.window_secs.min(duration),
            None => self.defaults.window_secs,
        };

        self.overlays.push(Overlay {
            id,
            kind,
            x: origin.0,
            y: origin.1,
            width: size.0.max(1),
            height: size.1.max(1),
            visible_from: 0.0,
            visible_until: window_secs,
            z_order: self.overlays.len() as i64,
        });
        self.selected = Some(id);
        self.touch();
        id
    }

    /// Set or clear the selection. Selecting an unknown id is an error;
    /// callers must only select ids known to exist.
    pub fn select(&mut self, id: Option<OverlayId>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(StoreError::UnknownOverlay { id });
            }
        }
        self.selected = id;
        self.touch();
        Ok(())
    }

    /// Replace the payload of a text overlay.
    pub fn set_text(&mut self, id: OverlayId, text: impl Into<String>) -> Result<(), StoreError> {
        let overlay = self.find_mut(id)?;
        match overlay.kind {
            OverlayKind::Text { text: ref mut t } => {
                *t = text.into();
                self.touch();
                Ok(())
            }
            OverlayKind::Image { .. } => Err(StoreError::KindMismatch { id }),
        }
    }

    /// Update an overlay's visibility window.
    ///
    /// Both bounds are clamped into `[0, duration]` when the duration is
    /// known. An inverted window is resolved by clamping the endpoint
    /// that changed to equal the unchanged one, so the handle being
    /// dragged keeps its identity; the bounds are never swapped. If both
    /// endpoints changed and still invert, `visible_from` collapses onto
    /// `visible_until`.
    pub fn update_timing(
        &mut self,
        id: OverlayId,
        visible_from: f64,
        visible_until: f64,
    ) -> Result<(), StoreError> {
        let duration = self.video_duration;
        let overlay = self.find_mut(id)?;

        let clamp = |t: f64| {
            let t = t.max(0.0);
            match duration {
                Some(d) => t.min(d),
                None => t,
            }
        };

        let mut from = clamp(visible_from);
        let mut until = clamp(visible_until);

        if from > until {
            let from_unchanged = from == overlay.visible_from;
            if from_unchanged {
                until = from;
            } else {
                from = until;
            }
        }

        overlay.visible_from = from;
        overlay.visible_until = until;
        self.touch();
        Ok(())
    }

    /// Remove an overlay, clearing the selection if it pointed at it.
    /// Returns the removed overlay.
    pub fn remove(&mut self, id: OverlayId) -> Result<Overlay, StoreError> {
        let index = self
            .overlays
            .iter()
            .position(|o| o.id == id)
            .ok_or(StoreError::UnknownOverlay { id })?;
        let removed = self.overlays.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.touch();
        Ok(removed)
    }

    /// Read-only snapshot of all overlays in paint order: ascending
    /// `z_order`, ties broken by insertion order.
    pub fn all(&self) -> Vec<&Overlay> {
        let mut snapshot: Vec<&Overlay> = self.overlays.iter().collect();
        snapshot.sort_by_key(|o| o.z_order);
        snapshot
    }

    /// Record the video duration once playback metadata arrives.
    ///
    /// Every existing visibility window is clamped into the new
    /// `[0, duration]` range immediately, so the window invariant holds
    /// unconditionally from this point on. Non-finite or negative
    /// durations are ignored.
    pub fn set_video_duration(&mut self, duration_secs: f64) {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return;
        }
        self.video_duration = Some(duration_secs);
        for overlay in &mut self.overlays {
            overlay.visible_until = overlay.visible_until.min(duration_secs);
            overlay.visible_from = overlay.visible_from.min(overlay.visible_until);
        }
        self.touch();
    }

    fn find_mut(&mut self, id: OverlayId) -> Result<&mut Overlay, StoreError> {
        self.overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::UnknownOverlay { id })
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}
