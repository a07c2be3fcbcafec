//! Container reading: opening, probing, and demuxing.
//!
//! [`MediaSource`] owns the FFmpeg input context for the lifetime of a run.
//! Opening and probing are separate steps so that an unreadable file
//! ([`FrameDumpError::FileOpen`]) can be told apart from a readable file
//! whose header does not describe its streams ([`FrameDumpError::Probe`]).
//!
//! # Example
//!
//! ```no_run
//! use framedump::{FrameDumpError, MediaSource};
//!
//! let mut source = MediaSource::open("input.mp4")?;
//! for stream in source.probe_streams()? {
//!     println!("stream {}: {}", stream.index, stream.codec_name);
//! }
//! while let Some(packet) = source.next_packet()? {
//!     println!("packet for stream {} ({} bytes)", packet.stream(), packet.size());
//! }
//! # Ok::<(), FrameDumpError>(())
//! ```

use std::{
    ffi::CString,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    ptr,
    time::Duration,
};

use ffmpeg_next::{Error as FfmpegError, Packet, format::context::Input, media::Type};
use ffmpeg_sys_next::AVFormatContext;

use crate::{
    error::FrameDumpError,
    metadata::{ContainerInfo, StreamDescriptor, StreamKind},
};

/// A lazy, finite source of demuxed packets in container order.
///
/// `Ok(None)` marks the end of input. Implemented by [`MediaSource`]; the
/// pipeline loop only depends on this trait.
pub trait PacketSource {
    /// Read the next packet, or `None` once the input is exhausted.
    fn next_packet(&mut self) -> Result<Option<Packet>, FrameDumpError>;
}

/// An opened media container.
///
/// Dropping a `MediaSource` closes the FFmpeg input context.
pub struct MediaSource {
    input: Input,
    path: PathBuf,
    streams: Option<Vec<StreamDescriptor>>,
    exhausted: bool,
}

impl Debug for MediaSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaSource")
            .field("path", &self.path)
            .field("streams", &self.streams)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl MediaSource {
    /// Open a media file and read its container header.
    ///
    /// Initializes FFmpeg (idempotent) and opens the input. Streams are not
    /// inspected until [`probe_streams`](MediaSource::probe_streams).
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::FileOpen`] if the path cannot be read, is not
    /// valid UTF-8, or the container format is not recognised.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameDumpError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening media file: {}", path.display());

        ffmpeg_next::init().map_err(|error| FrameDumpError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let path_c = path
            .to_str()
            .and_then(|value| CString::new(value).ok())
            .ok_or_else(|| FrameDumpError::FileOpen {
                path: path.clone(),
                reason: "path is not valid UTF-8 or contains a NUL byte".to_string(),
            })?;

        // SAFETY: on success `avformat_open_input` hands back an owned context
        // that `Input::wrap` closes on drop. On failure FFmpeg frees the
        // context itself and leaves the pointer null.
        let input = unsafe {
            let mut context: *mut AVFormatContext = ptr::null_mut();
            let result = ffmpeg_sys_next::avformat_open_input(
                &mut context,
                path_c.as_ptr(),
                ptr::null(),
                ptr::null_mut(),
            );
            if result < 0 || context.is_null() {
                return Err(FrameDumpError::FileOpen {
                    path,
                    reason: FfmpegError::from(result).to_string(),
                });
            }
            Input::wrap(context)
        };

        Ok(Self {
            input,
            path,
            streams: None,
            exhausted: false,
        })
    }

    /// Read enough of the input to describe every stream.
    ///
    /// The first call logs the container format and duration and caches the
    /// descriptors; later calls return the cache.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::Probe`] if FFmpeg cannot determine the
    /// stream parameters.
    pub fn probe_streams(&mut self) -> Result<&[StreamDescriptor], FrameDumpError> {
        if self.streams.is_none() {
            // SAFETY: the context is owned by `self.input` and stays valid for
            // the duration of the call.
            let result = unsafe {
                ffmpeg_sys_next::avformat_find_stream_info(self.input.as_mut_ptr(), ptr::null_mut())
            };
            if result < 0 {
                return Err(FrameDumpError::Probe {
                    path: self.path.clone(),
                    reason: FfmpegError::from(result).to_string(),
                });
            }

            let container = self.container();
            log::info!(
                "Probed {} (format={}, duration={}, streams={})",
                self.path.display(),
                container.format,
                container
                    .duration
                    .map(|duration| format!("{}us", duration.as_micros()))
                    .unwrap_or_else(|| "unknown".to_string()),
                self.input.nb_streams(),
            );

            self.streams = Some(self.input.streams().map(describe_stream).collect());
        }

        Ok(self.streams.as_deref().unwrap_or_default())
    }

    /// Container format name and duration.
    pub fn container(&self) -> ContainerInfo {
        let duration_microseconds = self.input.duration();
        ContainerInfo {
            format: self.input.format().name().to_string(),
            duration: (duration_microseconds > 0)
                .then(|| Duration::from_micros(duration_microseconds as u64)),
        }
    }

    /// Stream descriptors, in index order. Empty until
    /// [`probe_streams`](MediaSource::probe_streams) has succeeded.
    pub fn streams(&self) -> &[StreamDescriptor] {
        self.streams.as_deref().unwrap_or_default()
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next packet in container order.
    ///
    /// Returns `Ok(None)` at the end of the input, and keeps returning it on
    /// later calls.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::PacketRead`] for any demuxing failure other
    /// than end of input.
    pub fn next_packet(&mut self) -> Result<Option<Packet>, FrameDumpError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut packet = Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(Some(packet)),
            Err(FfmpegError::Eof) => {
                log::debug!("Reached end of input: {}", self.path.display());
                self.exhausted = true;
                Ok(None)
            }
            Err(error) => {
                self.exhausted = true;
                Err(FrameDumpError::PacketRead(error.to_string()))
            }
        }
    }

    pub(crate) fn input(&self) -> &Input {
        &self.input
    }
}

impl PacketSource for MediaSource {
    fn next_packet(&mut self) -> Result<Option<Packet>, FrameDumpError> {
        MediaSource::next_packet(self)
    }
}

impl Drop for MediaSource {
    fn drop(&mut self) {
        log::debug!("Closing media source: {}", self.path.display());
    }
}

fn describe_stream(stream: ffmpeg_next::Stream<'_>) -> StreamDescriptor {
    let parameters = stream.parameters();
    let codec_id = parameters.id();
    let medium = parameters.medium();

    // SAFETY: the parameters belong to a stream of a live input context and
    // are only read here.
    let raw = unsafe { &*parameters.as_ptr() };

    let kind = match medium {
        Type::Video => StreamKind::Video {
            width: raw.width.max(0) as u32,
            height: raw.height.max(0) as u32,
        },
        Type::Audio => StreamKind::Audio {
            channels: raw.ch_layout.nb_channels.max(0) as u16,
            sample_rate: raw.sample_rate.max(0) as u32,
        },
        other => StreamKind::Other(format!("{other:?}").to_lowercase()),
    };

    let codec_name = match codec_id.name() {
        "" => "unknown".to_string(),
        name => name.to_string(),
    };

    StreamDescriptor {
        index: stream.index(),
        kind,
        codec_id,
        codec_name,
        bit_rate: raw.bit_rate,
    }
}
