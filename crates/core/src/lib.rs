//! Domain core for the Callsheet generation pipeline.
//!
//! Pure types and functions shared by the batch executor and the coverage
//! orchestrator. This crate has zero internal dependencies so it can be used
//! by any layer (executor, orchestrator, future CLI or worker tooling).

pub mod entity;
pub mod error;
pub mod pack;
pub mod progress;
pub mod types;
