//! Stage abstraction: one pipeline stage runs on one named OS thread.
//!
//! Every stage consumes itself in [`Stage::run`], returning a small report
//! that the assembling code collects on join.

use crate::pipeline::error::{PipelineError, PipelineResult};
use std::thread::{self, JoinHandle};

/// A pipeline stage that runs to cooperative, message-driven completion.
pub trait Stage: Send + 'static {
    /// Summary handed back to whoever joins the stage thread.
    type Report: Send + 'static;

    /// Thread name, e.g. `producer-3` or `co-editor-NEWS`.
    fn name(&self) -> String;

    /// Run the stage loop until its end-of-stream protocol completes.
    fn run(self) -> Self::Report;
}

/// Join handle for a spawned stage.
#[derive(Debug)]
pub struct StageHandle<R> {
    name: String,
    handle: JoinHandle<R>,
}

impl<R> StageHandle<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the stage thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the stage to finish and return its report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StagePanicked`] if the stage thread panicked.
    pub fn join(self) -> PipelineResult<R> {
        let name = self.name;
        self.handle.join().map_err(|_| {
            tracing::error!(stage = %name, "stage thread panicked");
            PipelineError::StagePanicked { stage: name }
        })
    }
}

/// Start `stage` on its own named thread.
///
/// # Errors
///
/// Returns [`PipelineError::Spawn`] if the OS refuses to create the thread.
pub fn spawn<S: Stage>(stage: S) -> PipelineResult<StageHandle<S::Report>> {
    let name = stage.name();
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(move || stage.run())
        .map_err(|source| PipelineError::Spawn {
            stage: name.clone(),
            source,
        })?;

    tracing::debug!(stage = %name, "stage thread started");
    Ok(StageHandle { name, handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(u32);

    impl Stage for Echo {
        type Report = (String, u32);

        fn name(&self) -> String {
            format!("echo-{}", self.0)
        }

        fn run(self) -> Self::Report {
            let thread_name = thread::current().name().map(str::to_owned);
            (thread_name.unwrap_or_default(), self.0)
        }
    }

    struct Explodes;

    impl Stage for Explodes {
        type Report = ();

        fn name(&self) -> String {
            "explodes".to_string()
        }

        fn run(self) {
            panic!("boom");
        }
    }

    #[test]
    fn test_spawn_names_thread_and_returns_report() {
        let handle = spawn(Echo(4)).unwrap();
        assert_eq!(handle.name(), "echo-4");
        let (thread_name, value) = handle.join().unwrap();
        assert_eq!(thread_name, "echo-4");
        assert_eq!(value, 4);
    }

    #[test]
    fn test_join_reports_panicked_stage() {
        let handle = spawn(Explodes).unwrap();
        let err = handle.join().unwrap_err();
        assert!(matches!(err, PipelineError::StagePanicked { ref stage } if stage == "explodes"));
    }
}
