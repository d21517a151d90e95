//! Overlay entities: placed annotations with a visibility window.

use std::fmt;

/// Opaque overlay identifier.
///
/// Assigned from a per-store monotonic counter at creation and never
/// reused within that store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub(crate) u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an overlay draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    /// A text annotation. The payload is mutable after creation.
    Text { text: String },

    /// An image annotation. The source locator (a session-local file
    /// path or URI) is fixed at creation.
    Image { source: String },
}

/// A placed annotation composited onto the video.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Unique identity, immutable.
    pub id: OverlayId,

    /// Text or image payload.
    pub kind: OverlayKind,

    /// Left edge in display-local pixels.
    pub x: i32,

    /// Top edge in display-local pixels.
    pub y: i32,

    /// Width in pixels. Always `> 0`.
    pub width: u32,

    /// Height in pixels. Always `> 0`.
    pub height: u32,

    /// Start of the visibility window, seconds from video start.
    pub visible_from: f64,

    /// End of the visibility window, seconds from video start.
    /// Invariant: `0 <= visible_from <= visible_until`, and both are
    /// `<= video duration` once the duration is known.
    pub visible_until: f64,

    /// Paint order, ascending. Assigned as the overlay count at
    /// creation time; not contiguous after deletions.
    pub z_order: i64,
}

impl Overlay {
    /// Whether the visibility window contains `position_secs`.
    /// Both window bounds are inclusive.
    pub fn visible_at(&self, position_secs: f64) -> bool {
        self.visible_from <= position_secs && position_secs <= self.visible_until
    }

    /// Length of the visibility window in seconds.
    pub fn window_secs(&self) -> f64 {
        self.visible_until - self.visible_from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_overlay(from: f64, until: f64) -> Overlay {
        Overlay {
            id: OverlayId(1),
            kind: OverlayKind::Text {
                text: "hello".to_string(),
            },
            x: 50,
            y: 50,
            width: 120,
            height: 40,
            visible_from: from,
            visible_until: until,
            z_order: 0,
        }
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let overlay = text_overlay(1.0, 5.0);
        assert!(overlay.visible_at(1.0));
        assert!(overlay.visible_at(3.0));
        assert!(overlay.visible_at(5.0));
        assert!(!overlay.visible_at(0.999));
        assert!(!overlay.visible_at(5.001));
    }

    #[test]
    fn test_zero_length_window_is_visible_at_its_instant() {
        let overlay = text_overlay(2.0, 2.0);
        assert!(overlay.visible_at(2.0));
        assert_eq!(overlay.window_secs(), 0.0);
    }

}
