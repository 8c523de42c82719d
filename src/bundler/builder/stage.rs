//! Pipeline stage tracking.
//!
//! Both pipelines move through the same stages in one direction:
//!
//! ```text
//! Idle -> Validating -> Staging -> Archiving -> Finalizing -> CleanedUp
//! ```
//!
//! `Failed` is terminal and reachable from any non-terminal stage. Nothing
//! is re-entered.

use crate::bundler::Error;
use std::fmt;

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Not started
    Idle,
    /// Preconditions: metadata file, release tool, version input
    Validating,
    /// Copying manifest files into the build directory
    Staging,
    /// Writing the package archive
    Archiving,
    /// Opening or publishing the package
    Finalizing,
    /// Intermediate artifacts removed; success
    CleanedUp,
    /// Stopped on the first error
    Failed,
}

impl PipelineStage {
    fn is_terminal(self) -> bool {
        matches!(self, Self::CleanedUp | Self::Failed)
    }

    fn successor(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Validating),
            Self::Validating => Some(Self::Staging),
            Self::Staging => Some(Self::Archiving),
            Self::Archiving => Some(Self::Finalizing),
            Self::Finalizing => Some(Self::CleanedUp),
            Self::CleanedUp | Self::Failed => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Staging => "staging",
            Self::Archiving => "archiving",
            Self::Finalizing => "finalizing",
            Self::CleanedUp => "cleanup",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage of one pipeline run.
#[derive(Debug)]
pub struct Pipeline {
    name: &'static str,
    stage: PipelineStage,
    failed_in: Option<PipelineStage>,
}

impl Pipeline {
    /// Starts a pipeline in [`PipelineStage::Idle`].
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stage: PipelineStage::Idle,
            failed_in: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Stage the pipeline was in when it failed.
    pub fn failed_in(&self) -> Option<PipelineStage> {
        self.failed_in
    }

    /// Advances to `next`, which must be the immediate successor.
    pub fn enter(&mut self, next: PipelineStage) -> Result<(), Error> {
        if self.stage.successor() != Some(next) {
            return Err(Error::GenericError(format!(
                "{} pipeline cannot move from {} to {}",
                self.name, self.stage, next
            )));
        }
        log::debug!("{} pipeline: {} -> {}", self.name, self.stage, next);
        self.stage = next;
        Ok(())
    }

    /// Moves to [`PipelineStage::Failed`], recording where it happened, and
    /// passes `error` through.
    pub fn fail<E: fmt::Display>(&mut self, error: E) -> E {
        if !self.stage.is_terminal() {
            log::debug!("{} pipeline failed during {}: {}", self.name, self.stage, error);
            self.failed_in = Some(self.stage);
            self.stage = PipelineStage::Failed;
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_every_stage_in_order() {
        let mut pipeline = Pipeline::new("install");
        for stage in [
            PipelineStage::Validating,
            PipelineStage::Staging,
            PipelineStage::Archiving,
            PipelineStage::Finalizing,
            PipelineStage::CleanedUp,
        ] {
            pipeline.enter(stage).unwrap();
            assert_eq!(pipeline.stage(), stage);
        }
        assert!(pipeline.enter(PipelineStage::Validating).is_err());
    }

    #[test]
    fn stages_cannot_be_skipped_or_reentered() {
        let mut pipeline = Pipeline::new("release");
        assert!(pipeline.enter(PipelineStage::Staging).is_err());
        pipeline.enter(PipelineStage::Validating).unwrap();
        assert!(pipeline.enter(PipelineStage::Validating).is_err());
    }

    #[test]
    fn failure_is_terminal_and_remembers_the_stage() {
        let mut pipeline = Pipeline::new("release");
        pipeline.enter(PipelineStage::Validating).unwrap();
        pipeline.enter(PipelineStage::Staging).unwrap();

        let err = pipeline.fail(Error::GenericError("copy failed".into()));

        assert_eq!(err.to_string(), "copy failed");
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
        assert_eq!(pipeline.failed_in(), Some(PipelineStage::Staging));
        assert!(pipeline.enter(PipelineStage::Archiving).is_err());

        pipeline.fail("second error");
        assert_eq!(pipeline.failed_in(), Some(PipelineStage::Staging));
    }
}
