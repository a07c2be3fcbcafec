//! The frame-dump pipeline.
//!
//! [`Pipeline::run`] opens a media file, selects its first decodable video
//! stream, and emits up to the configured budget of frames as still images.
//! Every resource it acquires is owned by a local value, so the decoder, the
//! scaling context, and the input context are released in reverse order of
//! acquisition however the run ends.
//!
//! The packet loop itself lives in [`Pipeline::drive`] and only depends on
//! the [`PacketSource`] and [`FrameDecoder`] traits.
//!
//! # Example
//!
//! ```no_run
//! use framedump::{FrameDumpError, Pipeline, PipelineOptions};
//!
//! let summary = Pipeline::new(PipelineOptions::new().with_frame_budget(3)).run("input.mp4")?;
//! println!("wrote {} frames", summary.frames_emitted);
//! # Ok::<(), FrameDumpError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{
    configuration::{PipelineOptions, WriteFailurePolicy},
    conversion::FrameConverter,
    decoder::{DecodeStatus, DecodedFrame, DecoderSession, FrameDecoder},
    emitter::FrameEmitter,
    error::FrameDumpError,
    reader::{MediaSource, PacketSource},
    selector::StreamSelector,
};

/// Why the packet loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The frame budget was reached; input may remain.
    BudgetReached,
    /// The input ran out and the decoder was drained.
    InputExhausted,
}

/// Counters and outputs of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct RunSummary {
    /// Index of the stream that was decoded.
    pub stream_index: usize,
    /// Frames written to disk.
    pub frames_emitted: u64,
    /// Frames produced by the decoder.
    pub frames_decoded: u64,
    /// Frames dropped under [`WriteFailurePolicy::Skip`].
    pub frames_skipped: u64,
    /// Packets read from the container, all streams.
    pub packets_read: u64,
    /// Packets handed to the decoder.
    pub packets_submitted: u64,
    /// Packets of other streams, released without decoding.
    pub packets_skipped: u64,
    /// Why the loop ended.
    pub stop_reason: StopReason,
    /// Written files, in emission order.
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    fn new(stream_index: usize) -> Self {
        Self {
            stream_index,
            frames_emitted: 0,
            frames_decoded: 0,
            frames_skipped: 0,
            packets_read: 0,
            packets_submitted: 0,
            packets_skipped: 0,
            stop_reason: StopReason::InputExhausted,
            outputs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    /// Pull the next packet and submit it if it belongs to the stream.
    AcceptingInput,
    /// Receive frames until the decoder asks for more input. While
    /// `flushing`, the input is exhausted and end of stream has been sent.
    Draining { flushing: bool },
}

/// Extracts frames from media files according to [`PipelineOptions`].
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline with the given options.
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Open `path`, select its first decodable video stream, and emit frames.
    ///
    /// # Errors
    ///
    /// - [`FrameDumpError::FileOpen`] / [`FrameDumpError::Probe`] if the input
    ///   cannot be read or described.
    /// - [`FrameDumpError::NoVideoStream`] if no video stream is decodable.
    /// - [`FrameDumpError::DecoderOpen`], [`FrameDumpError::Send`],
    ///   [`FrameDumpError::Receive`], [`FrameDumpError::Conversion`] on
    ///   decoding failures. Frames written before the failure stay on disk.
    /// - [`FrameDumpError::FrameWrite`] under [`WriteFailurePolicy::Abort`].
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<RunSummary, FrameDumpError> {
        let path = path.as_ref();
        let observer = self.options.observer.as_ref();

        let mut source = MediaSource::open(path)?;
        let stream_count = source.probe_streams()?.len();
        observer.on_container(&source.container(), stream_count);

        let selected = StreamSelector::new(observer, path).select(source.streams())?;

        let mut session = DecoderSession::open(&source, &selected)?;
        let mut converter = FrameConverter::new();

        let summary = self.drive(&mut source, &mut session, selected.index(), &mut converter)?;

        log::info!(
            "Finished {}: {} frames emitted, {} skipped, {} packets read ({} skipped), {:?}",
            path.display(),
            summary.frames_emitted,
            summary.frames_skipped,
            summary.packets_read,
            summary.packets_skipped,
            summary.stop_reason,
        );

        Ok(summary)
    }

    /// Run the packet loop for `stream_index` over an already opened source
    /// and decoder.
    ///
    /// Packets of other streams are counted and released. Each decoded frame
    /// is converted, written, and reported until the budget is reached or
    /// the decoder is drained after the end of input.
    ///
    /// # Errors
    ///
    /// Propagates the first error from the source, the decoder, the
    /// converter, or (under [`WriteFailurePolicy::Abort`]) the emitter.
    pub fn drive<S, D>(
        &self,
        source: &mut S,
        decoder: &mut D,
        stream_index: usize,
        converter: &mut FrameConverter,
    ) -> Result<RunSummary, FrameDumpError>
    where
        S: PacketSource + ?Sized,
        D: FrameDecoder + ?Sized,
    {
        let budget = self.options.frame_budget;
        let emitter = FrameEmitter::new(
            &self.options.output_directory,
            &self.options.image_extension,
        );
        let mut summary = RunSummary::new(stream_index);
        let mut state = LoopState::AcceptingInput;

        log::debug!("Decoding stream {stream_index} with a budget of {budget} frames");

        summary.stop_reason = loop {
            match state {
                LoopState::AcceptingInput => {
                    if summary.frames_emitted >= budget {
                        break StopReason::BudgetReached;
                    }

                    let Some(packet) = source.next_packet()? else {
                        decoder.finish()?;
                        state = LoopState::Draining { flushing: true };
                        continue;
                    };
                    summary.packets_read += 1;

                    if packet.stream() != stream_index {
                        summary.packets_skipped += 1;
                        continue;
                    }

                    decoder.submit(&packet)?;
                    summary.packets_submitted += 1;
                    state = LoopState::Draining { flushing: false };
                }
                LoopState::Draining { flushing } => match decoder.receive()? {
                    DecodeStatus::Frame(frame) => {
                        summary.frames_decoded += 1;
                        self.emit_frame(&frame, converter, &emitter, &mut summary)?;
                        if summary.frames_emitted >= budget {
                            break StopReason::BudgetReached;
                        }
                    }
                    DecodeStatus::NeedMoreInput if !flushing => {
                        state = LoopState::AcceptingInput;
                    }
                    DecodeStatus::NeedMoreInput | DecodeStatus::EndOfStream => {
                        break StopReason::InputExhausted;
                    }
                },
            }
        };

        Ok(summary)
    }

    fn emit_frame(
        &self,
        frame: &DecodedFrame,
        converter: &mut FrameConverter,
        emitter: &FrameEmitter,
        summary: &mut RunSummary,
    ) -> Result<(), FrameDumpError> {
        let info = frame.info();
        let image = converter.convert(frame.frame())?;

        match emitter.emit(&image, info.sequence) {
            Ok(path) => {
                summary.frames_emitted += 1;
                self.options.observer.on_frame(&info, &path);
                summary.outputs.push(path);
                Ok(())
            }
            Err(error) if self.options.write_failure_policy == WriteFailurePolicy::Skip => {
                log::warn!("Skipping frame {}: {error}", info.sequence);
                summary.frames_skipped += 1;
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}
