//! Pipeline configuration.
//!
//! [`PipelineOptions`] is a builder that carries the frame budget, output
//! location, image format, write-failure policy, and observer through the
//! pipeline without widening every function signature.
//!
//! # Example
//!
//! ```no_run
//! use framedump::{PipelineOptions, WriteFailurePolicy};
//!
//! let options = PipelineOptions::new()
//!     .with_frame_budget(16)
//!     .with_output_directory("frames")
//!     .with_image_extension("png")
//!     .with_write_failure_policy(WriteFailurePolicy::Skip);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observer::{NoOpObserver, PipelineObserver};

/// Number of frames emitted when no budget is configured.
pub const DEFAULT_FRAME_BUDGET: u64 = 8;

/// Image extension used when none is configured.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// What to do when a frame cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteFailurePolicy {
    /// Stop the run and return the write error. This is the default.
    #[default]
    Abort,
    /// Log a warning, count the frame in
    /// [`RunSummary::frames_skipped`](crate::RunSummary::frames_skipped), and
    /// carry on. Skipped frames leave a gap in the file numbering and do not
    /// count toward the budget.
    Skip,
}

/// Settings for a [`Pipeline`](crate::Pipeline) run.
///
/// A default-constructed value emits up to [`DEFAULT_FRAME_BUDGET`] JPEG
/// files into the current directory and aborts on the first write failure.
#[derive(Clone)]
pub struct PipelineOptions {
    pub(crate) frame_budget: u64,
    pub(crate) output_directory: PathBuf,
    pub(crate) image_extension: String,
    pub(crate) write_failure_policy: WriteFailurePolicy,
    pub(crate) observer: Arc<dyn PipelineObserver>,
}

impl Debug for PipelineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PipelineOptions")
            .field("frame_budget", &self.frame_budget)
            .field("output_directory", &self.output_directory)
            .field("image_extension", &self.image_extension)
            .field("write_failure_policy", &self.write_failure_policy)
            .finish_non_exhaustive()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            frame_budget: DEFAULT_FRAME_BUDGET,
            output_directory: PathBuf::from("."),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            write_failure_policy: WriteFailurePolicy::Abort,
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Maximum number of frames to emit.
    ///
    /// A budget of 0 is a valid, immediately successful run: the input is
    /// opened and probed, but no packet is read and no file is written.
    #[must_use]
    pub fn with_frame_budget(mut self, budget: u64) -> Self {
        self.frame_budget = budget;
        self
    }

    /// Directory the still images are written into.
    #[must_use]
    pub fn with_output_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.output_directory = directory.as_ref().to_path_buf();
        self
    }

    /// File extension of the still images; selects the encoder.
    #[must_use]
    pub fn with_image_extension(mut self, extension: &str) -> Self {
        self.image_extension = extension.to_string();
        self
    }

    /// Set the write-failure policy.
    #[must_use]
    pub fn with_write_failure_policy(mut self, policy: WriteFailurePolicy) -> Self {
        self.write_failure_policy = policy;
        self
    }

    /// Attach an observer for container, stream, and frame reports.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The configured frame budget.
    pub fn frame_budget(&self) -> u64 {
        self.frame_budget
    }

    /// The configured output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// The configured image extension.
    pub fn image_extension(&self) -> &str {
        &self.image_extension
    }

    /// The configured write-failure policy.
    pub fn write_failure_policy(&self) -> WriteFailurePolicy {
        self.write_failure_policy
    }
}
