//! Video source selection and playback metadata.

use std::path::PathBuf;

/// Locator for a picked media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    /// Local path or platform URI of the media.
    pub uri: PathBuf,
}

impl MediaHandle {
    pub fn new(uri: impl Into<PathBuf>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Outcome of a media picker interaction.
///
/// Cancellation is a normal outcome, not an error; the session state
/// is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// The user dismissed the picker without choosing anything.
    Cancelled,

    /// The user picked a media file.
    Picked(MediaHandle),
}

/// The loaded source video.
#[derive(Debug, Clone)]
pub struct VideoSource {
    pub handle: MediaHandle,

    /// Duration in seconds, absent until playback metadata arrives.
    pub duration_secs: Option<f64>,
}

impl VideoSource {
    pub fn new(handle: MediaHandle) -> Self {
        Self {
            handle,
            duration_secs: None,
        }
    }
}
