//! Overcut Overlay Model
//!
//! Defines the core data contracts for a video overlay composition:
//! - **Overlays:** Text or image annotations with spatial placement,
//!   a visibility window, and a paint order
//! - **Store:** The single-owner container for overlays and selection
//! - **Timeline:** Visibility evaluation at a playback position
//! - **Composition:** The versioned wire format submitted to the
//!   render service
//!
//! Spatial coordinates are pixels in the video display's local
//! coordinate space. Visibility bounds are seconds from video start.

pub mod composition;
pub mod overlay;
pub mod store;
pub mod timeline;

pub use composition::*;
pub use overlay::*;
pub use store::*;
pub use timeline::*;
