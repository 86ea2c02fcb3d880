//! Progress and error callback hooks.
//!
//! Hooks are the executor's only output surface besides the returned result
//! list. All hooks are optional and are invoked from the single orchestrating
//! task as completions are folded back in, so implementations need no
//! internal synchronisation beyond being `Send`.

use crate::request::GenerationRequest;

type ProgressFn = Box<dyn FnMut(usize, usize) + Send>;
type GroupFn = Box<dyn FnMut(usize, usize) + Send>;
type ErrorFn = Box<dyn FnMut(&GenerationRequest, &str) + Send>;

/// Callback bundle passed to [`run_batch`](crate::executor::run_batch).
#[derive(Default)]
pub struct BatchHooks {
    on_progress: Option<ProgressFn>,
    on_group_complete: Option<GroupFn>,
    on_error: Option<ErrorFn>,
}

impl BatchHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired exactly once per request, when it reaches a terminal state.
    /// Receives `(completed_count, total_count)`.
    pub fn on_progress(mut self, f: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Fired after a full group drains. Receives `(group_index, total_groups)`.
    pub fn on_group_complete(mut self, f: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_group_complete = Some(Box::new(f));
        self
    }

    /// Fired on each terminal failure, after retries are exhausted.
    pub fn on_error(mut self, f: impl FnMut(&GenerationRequest, &str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn emit_progress(&mut self, completed: usize, total: usize) {
        if let Some(f) = self.on_progress.as_mut() {
            f(completed, total);
        }
    }

    pub(crate) fn emit_group_complete(&mut self, group_index: usize, total_groups: usize) {
        if let Some(f) = self.on_group_complete.as_mut() {
            f(group_index, total_groups);
        }
    }

    pub(crate) fn emit_error(&mut self, request: &GenerationRequest, error: &str) {
        if let Some(f) = self.on_error.as_mut() {
            f(request, error);
        }
    }
}
