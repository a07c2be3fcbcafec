//! # framedump
//!
//! Dump the first frames of a video file as still images, reporting
//! container and codec metadata along the way.
//!
//! `framedump` runs a single, sequential pipeline on top of FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate):
//!
//! 1. [`MediaSource`] opens the container and probes its streams.
//! 2. [`StreamSelector`] picks the first video stream with an available
//!    decoder.
//! 3. [`DecoderSession`] turns that stream's packets into frames.
//! 4. [`FrameConverter`] converts each frame to packed RGB24.
//! 5. [`FrameEmitter`] writes it as `<n>.jpg`.
//!
//! [`Pipeline`] drives these stages until a frame budget (default 8) is
//! reached or the input is exhausted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framedump::{FrameDumpError, Pipeline, PipelineOptions};
//!
//! let options = PipelineOptions::new()
//!     .with_frame_budget(8)
//!     .with_output_directory("frames");
//! let summary = Pipeline::new(options).run("input.mp4")?;
//! for path in &summary.outputs {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), FrameDumpError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod configuration;
pub mod conversion;
pub mod decoder;
pub mod emitter;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod observer;
pub mod pipeline;
pub mod reader;
pub mod selector;
mod utilities;

pub use configuration::{
    DEFAULT_FRAME_BUDGET, DEFAULT_IMAGE_EXTENSION, PipelineOptions, WriteFailurePolicy,
};
pub use conversion::{FrameConverter, ImageBuffer};
pub use decoder::{DecodeStatus, DecodedFrame, DecoderSession, FrameDecoder};
pub use emitter::FrameEmitter;
pub use error::FrameDumpError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use metadata::{ContainerInfo, FrameInfo, PictureType, StreamDescriptor, StreamKind};
pub use observer::PipelineObserver;
pub use pipeline::{Pipeline, RunSummary, StopReason};
pub use reader::{MediaSource, PacketSource};
pub use selector::{DecoderLookup, FfmpegDecoders, SelectedStream, StreamSelector};
