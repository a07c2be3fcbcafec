//! Run observation.
//!
//! The pipeline reports what it finds through [`PipelineObserver`]: the
//! container once after probing, every stream while selecting, and every
//! frame after it has been written. The library itself never prints; the
//! `framedump` binary implements this trait to produce its stdout report.
//!
//! # Example
//!
//! ```no_run
//! use std::{path::Path, sync::Arc};
//!
//! use framedump::{FrameDumpError, FrameInfo, Pipeline, PipelineObserver, PipelineOptions};
//!
//! struct PrintFrames;
//!
//! impl PipelineObserver for PrintFrames {
//!     fn on_frame(&self, frame: &FrameInfo, output: &Path) {
//!         println!("frame {} -> {}", frame.sequence, output.display());
//!     }
//! }
//!
//! let options = PipelineOptions::new().with_observer(Arc::new(PrintFrames));
//! Pipeline::new(options).run("input.mp4")?;
//! # Ok::<(), FrameDumpError>(())
//! ```

use std::path::Path;

use crate::metadata::{ContainerInfo, FrameInfo, StreamDescriptor};

/// Receives diagnostics while the pipeline runs.
///
/// Observers are infallible: they see what happens but cannot change the
/// course of the run. All methods default to doing nothing.
pub trait PipelineObserver: Send + Sync {
    /// Called once, after the container has been probed.
    fn on_container(&self, _container: &ContainerInfo, _stream_count: usize) {}

    /// Called for every stream, in index order, during selection.
    ///
    /// `decoder` is `None` when no decoder exists for the stream's codec.
    fn on_stream(&self, _stream: &StreamDescriptor, _decoder: Option<&str>) {}

    /// Called after a frame has been written to `output`.
    fn on_frame(&self, _frame: &FrameInfo, _output: &Path) {}
}

/// An observer that discards every notification.
///
/// This is the default when no observer is configured.
pub(crate) struct NoOpObserver;

impl PipelineObserver for NoOpObserver {}
