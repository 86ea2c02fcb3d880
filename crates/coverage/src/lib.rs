//! Coverage pack orchestration.
//!
//! Builds one generation request per shot spec of a pack, delegates the list
//! to the batch executor, and assembles the results into a
//! [`CoverageLibrary`](library::CoverageLibrary) with aggregate statistics.
//! Also exposes selective retry over previously failed angles, and the
//! variant/sequence flows (beat variants, scene coverage shots, parallel
//! beat batches) that reuse the same executor contract.

pub mod flows;
pub mod library;
pub mod orchestrator;

pub use library::{AngleStatus, CoverageAngle, CoverageLibrary, LibraryStatus};
pub use orchestrator::{CoverageError, CoverageOrchestrator, GenerateOptions};
