//! Video stream selection.
//!
//! [`StreamSelector`] walks the probed streams once and picks the first
//! video stream whose codec has a decoder. Streams without a decoder are
//! skipped, audio streams are only reported.

use std::path::{Path, PathBuf};

use ffmpeg_next::codec::Id as CodecId;

use crate::{
    error::FrameDumpError,
    metadata::{StreamDescriptor, StreamKind},
    observer::PipelineObserver,
};

/// Resolves a codec identifier to the name of an available decoder.
pub trait DecoderLookup {
    /// Return the decoder name for `codec_id`, or `None` if none is
    /// available.
    fn resolve(&self, codec_id: CodecId) -> Option<String>;
}

impl<F> DecoderLookup for F
where
    F: Fn(CodecId) -> Option<String>,
{
    fn resolve(&self, codec_id: CodecId) -> Option<String> {
        self(codec_id)
    }
}

/// Looks decoders up in the FFmpeg codec registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegDecoders;

impl DecoderLookup for FfmpegDecoders {
    fn resolve(&self, codec_id: CodecId) -> Option<String> {
        ffmpeg_next::decoder::find(codec_id).map(|codec| codec.name().to_string())
    }
}

/// The stream chosen for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SelectedStream {
    /// Descriptor of the selected video stream.
    pub descriptor: StreamDescriptor,
    /// Name of the decoder that will be used for it.
    pub decoder_name: String,
}

impl SelectedStream {
    /// Container index of the selected stream.
    pub fn index(&self) -> usize {
        self.descriptor.index
    }
}

/// Chooses the video stream to decode.
pub struct StreamSelector<'a> {
    observer: &'a dyn PipelineObserver,
    path: PathBuf,
}

impl<'a> StreamSelector<'a> {
    /// Create a selector that reports every stream to `observer`.
    ///
    /// `path` is only used to label [`FrameDumpError::NoVideoStream`].
    pub fn new<P: AsRef<Path>>(observer: &'a dyn PipelineObserver, path: P) -> Self {
        Self {
            observer,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Select using the FFmpeg decoder registry.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::NoVideoStream`] if no video stream has an
    /// available decoder.
    pub fn select(&self, streams: &[StreamDescriptor]) -> Result<SelectedStream, FrameDumpError> {
        self.select_with(streams, &FfmpegDecoders)
    }

    /// Select using a custom decoder lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::NoVideoStream`] if no video stream has an
    /// available decoder.
    pub fn select_with<L: DecoderLookup + ?Sized>(
        &self,
        streams: &[StreamDescriptor],
        lookup: &L,
    ) -> Result<SelectedStream, FrameDumpError> {
        let mut selected: Option<SelectedStream> = None;

        for stream in streams {
            let decoder_name = lookup.resolve(stream.codec_id);
            self.observer.on_stream(stream, decoder_name.as_deref());

            let Some(decoder_name) = decoder_name else {
                log::warn!(
                    "No decoder for stream {} (codec={}), skipping",
                    stream.index,
                    stream.codec_name,
                );
                continue;
            };

            match &stream.kind {
                StreamKind::Video { width, height } if selected.is_none() => {
                    log::debug!(
                        "Selected video stream {}: {}x{}, decoder={}",
                        stream.index,
                        width,
                        height,
                        decoder_name,
                    );
                    selected = Some(SelectedStream {
                        descriptor: stream.clone(),
                        decoder_name,
                    });
                }
                StreamKind::Video { .. } => {
                    log::debug!("Ignoring additional video stream {}", stream.index);
                }
                StreamKind::Audio {
                    channels,
                    sample_rate,
                } => {
                    log::debug!(
                        "Audio stream {}: {} ch, {} Hz, codec={}",
                        stream.index,
                        channels,
                        sample_rate,
                        stream.codec_name,
                    );
                }
                StreamKind::Other(kind) => {
                    log::debug!("Ignoring {} stream {}", kind, stream.index);
                }
            }
        }

        selected.ok_or_else(|| FrameDumpError::NoVideoStream {
            path: self.path.clone(),
        })
    }
}
