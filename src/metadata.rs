//! Container, stream, and frame metadata types.
//!
//! [`ContainerInfo`] and [`StreamDescriptor`] are built once, when
//! [`MediaSource::probe_streams`](crate::MediaSource::probe_streams) runs, and
//! hold no references into the demuxer. [`FrameInfo`] is a per-frame snapshot
//! taken after decoding, before the frame is converted and released.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use ffmpeg_next::{codec::Id as CodecId, picture::Type as FfmpegPictureType};
use ffmpeg_sys_next::AVCodecID;

/// Container-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ContainerInfo {
    /// Short container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`,
    /// `"matroska,webm"`).
    pub format: String,
    /// Total duration, or `None` when the container does not declare one.
    pub duration: Option<Duration>,
}

/// The kind of media carried by a stream, with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamKind {
    /// A video stream.
    Video {
        /// Coded width in pixels.
        width: u32,
        /// Coded height in pixels.
        height: u32,
    },
    /// An audio stream.
    Audio {
        /// Number of audio channels.
        channels: u16,
        /// Sample rate in hertz.
        sample_rate: u32,
    },
    /// Any other stream (subtitles, data, attachments).
    Other(String),
}

impl StreamKind {
    /// Returns `true` for [`StreamKind::Video`].
    pub fn is_video(&self) -> bool {
        matches!(self, StreamKind::Video { .. })
    }

    /// Returns `true` for [`StreamKind::Audio`].
    pub fn is_audio(&self) -> bool {
        matches!(self, StreamKind::Audio { .. })
    }
}

/// Metadata for one stream of an opened container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct StreamDescriptor {
    /// Stream index inside the container. Packets carry the same index.
    pub index: usize,
    /// Media kind and kind-specific parameters.
    pub kind: StreamKind,
    /// FFmpeg codec identifier.
    pub codec_id: CodecId,
    /// Codec name (e.g. `"h264"`, `"aac"`).
    pub codec_name: String,
    /// Declared bit rate in bits per second (0 when unknown).
    pub bit_rate: i64,
}

impl StreamDescriptor {
    /// Numeric FFmpeg codec id, as printed by FFmpeg's own tools.
    pub fn codec_number(&self) -> i32 {
        AVCodecID::from(self.codec_id) as i32
    }
}

/// FFmpeg picture type of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictureType {
    /// Undefined.
    Unknown,
    /// Intra.
    I,
    /// Predicted.
    P,
    /// Bi-directionally predicted.
    B,
    /// S(GMC)-VOP MPEG-4.
    S,
    /// Switching intra.
    SI,
    /// Switching predicted.
    SP,
    /// BI type.
    BI,
}

impl PictureType {
    /// Single-character code, matching `av_get_picture_type_char`.
    pub fn as_char(self) -> char {
        match self {
            PictureType::I => 'I',
            PictureType::P => 'P',
            PictureType::B => 'B',
            PictureType::S => 'S',
            PictureType::SI => 'i',
            PictureType::SP => 'p',
            PictureType::BI => 'b',
            PictureType::Unknown => '?',
        }
    }
}

impl From<FfmpegPictureType> for PictureType {
    fn from(kind: FfmpegPictureType) -> Self {
        match kind {
            FfmpegPictureType::I => PictureType::I,
            FfmpegPictureType::P => PictureType::P,
            FfmpegPictureType::B => PictureType::B,
            FfmpegPictureType::S => PictureType::S,
            FfmpegPictureType::SI => PictureType::SI,
            FfmpegPictureType::SP => PictureType::SP,
            FfmpegPictureType::BI => PictureType::BI,
            FfmpegPictureType::None => PictureType::Unknown,
        }
    }
}

impl Display for PictureType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_char())
    }
}

/// Per-frame decode information.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct FrameInfo {
    /// Sequence number assigned by the decoder session (1-based).
    pub sequence: u64,
    /// Picture type reported by the decoder.
    pub picture_type: PictureType,
    /// Size in bytes of the decoded picture planes, row padding included.
    ///
    /// This is the uncompressed size, not the size of the packet the frame
    /// was decoded from: FFmpeg has deprecated the per-frame packet size,
    /// and with B-frame reordering the producing packet is not the last one
    /// submitted.
    pub size: usize,
    /// Native pixel format name (e.g. `"yuv420p"`).
    pub pixel_format: String,
    /// Presentation timestamp in stream time base, if known.
    pub pts: Option<i64>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Whether the decoder flagged the frame as a key frame.
    pub is_keyframe: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_type_characters() {
        assert_eq!(PictureType::from(FfmpegPictureType::I).as_char(), 'I');
        assert_eq!(PictureType::from(FfmpegPictureType::BI).to_string(), "b");
        assert_eq!(PictureType::from(FfmpegPictureType::None), PictureType::Unknown);
    }

    #[test]
    fn codec_number_matches_ffmpeg() {
        let stream = StreamDescriptor {
            index: 0,
            kind: StreamKind::Video {
                width: 2,
                height: 2,
            },
            codec_id: CodecId::H264,
            codec_name: "h264".to_string(),
            bit_rate: 0,
        };
        assert_eq!(stream.codec_number(), 27);
        assert!(stream.kind.is_video());
        assert!(!stream.kind.is_audio());
    }
}
