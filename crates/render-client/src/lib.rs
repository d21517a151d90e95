//! Overcut Render Client
//!
//! Talks to the remote render service:
//! - **Job:** The render job value object and its state machine
//! - **Status:** Wire shapes for acknowledgments and status reports
//! - **Client:** Multipart submission and status polling with bounded
//!   reconnects and stop-flag cancellation
//!
//! A submission packages the video bytes and the serialized composition
//! captured at submit time; the service answers with an opaque job id
//! that is then polled until the job reaches a terminal state.

pub mod client;
pub mod job;
pub mod status;

pub use client::*;
pub use job::*;
pub use status::*;
