//! HTTP client for the remote generation provider.
//!
//! [`RenderClient`] implements the [`Generator`](callsheet_batch::Generator)
//! seam over the provider's
//! REST API. It is an explicitly constructed, caller-owned object: create it
//! once at process start, reuse it across calls, share it by reference.
//! There is no module-level singleton.

pub mod client;

pub use client::{RenderClient, RenderClientError};
