//! Batched, fault-tolerant execution of generation requests.
//!
//! [`run_batch`](executor::run_batch) takes an ordered list of
//! [`GenerationRequest`](request::GenerationRequest)s and a
//! [`Generator`](generator::Generator), partitions the list into fixed-size
//! groups, executes each group with bounded concurrency, retries individual
//! failures with a configurable backoff, and returns one result per request
//! in input order. Per-item failure is data, never an error: `run_batch`
//! always completes.

pub mod backoff;
pub mod executor;
pub mod generator;
pub mod hooks;
pub mod options;
pub mod request;

pub use backoff::BackoffPolicy;
pub use executor::run_batch;
pub use generator::{GenerateError, Generator};
pub use hooks::BatchHooks;
pub use options::BatchOptions;
pub use request::{GenerationRequest, GenerationResult, ResultStatus};
