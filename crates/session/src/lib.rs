//! Overcut Session
//!
//! Ties the editing surface together:
//! - **Video:** Source selection and playback metadata
//! - **Session:** The controller owning the overlay store, the loaded
//!   video, and the render job, and pumping job events into the job
//!   state machine
//!
//! The controller is single-owner: all mutation goes through
//! `&mut self`, and background job tracking communicates exclusively
//! through an event channel drained by the owner.

pub mod session;
pub mod video;

pub use session::*;
pub use video::*;
