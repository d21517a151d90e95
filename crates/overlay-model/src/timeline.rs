//! Visibility evaluation at a playback position.
//!
//! Pure function of the store and a position; runs on every playback
//! frame, so it stays O(overlay count) with a single Vec allocation for
//! the returned snapshot. Callers that want to memoize can key on
//! `(position, store.version())`.

use crate::overlay::Overlay;
use crate::store::OverlayStore;

/// All overlays whose visibility window contains `position_secs`, in
/// paint order (ascending z, ties by insertion order).
///
/// Filtering `all()` preserves its paint order.
pub fn visible_at(store: &OverlayStore, position_secs: f64) -> Vec<&Overlay> {
    store
        .all()
        .into_iter()
        .filter(|o| o.visible_at(position_secs))
        .collect()
}
