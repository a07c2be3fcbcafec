//! Video decoding.
//!
//! [`DecoderSession`] wraps an opened FFmpeg video decoder bound to the
//! selected stream. Decoding is pull-based: after a packet is submitted the
//! caller keeps calling [`receive`](FrameDecoder::receive) until it returns
//! [`DecodeStatus::NeedMoreInput`]. A packet may yield zero, one, or several
//! frames, because decoders buffer packets to reorder B-frames.

use ffmpeg_next::{
    Error as FfmpegError, Packet, codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder, frame::Video as VideoFrame, util::error::EAGAIN,
};

use crate::{
    error::FrameDumpError,
    metadata::{FrameInfo, PictureType},
    reader::MediaSource,
    selector::SelectedStream,
};

/// A decoded picture together with its session sequence number.
pub struct DecodedFrame {
    sequence: u64,
    frame: VideoFrame,
}

impl DecodedFrame {
    /// Pair a decoded FFmpeg frame with its sequence number.
    pub fn new(sequence: u64, frame: VideoFrame) -> Self {
        Self { sequence, frame }
    }

    /// Sequence number within the decoder session, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The raw decoded picture.
    pub fn frame(&self) -> &VideoFrame {
        &self.frame
    }

    /// Snapshot of the frame's decode metadata.
    pub fn info(&self) -> FrameInfo {
        let frame = &self.frame;
        let size = (0..frame.planes()).map(|plane| frame.data(plane).len()).sum();
        let pixel_format = frame
            .format()
            .descriptor()
            .map(|descriptor| descriptor.name().to_string())
            .unwrap_or_else(|| "none".to_string());

        FrameInfo {
            sequence: self.sequence,
            picture_type: PictureType::from(frame.kind()),
            size,
            pixel_format,
            pts: frame.pts(),
            width: frame.width(),
            height: frame.height(),
            is_keyframe: frame.is_key(),
        }
    }
}

/// Outcome of a single [`receive`](FrameDecoder::receive) call.
pub enum DecodeStatus {
    /// A frame was produced.
    Frame(DecodedFrame),
    /// The decoder has no queued output; submit another packet.
    NeedMoreInput,
    /// The decoder has been fully drained and will produce nothing more.
    EndOfStream,
}

/// A packet-in, frame-out decoder.
///
/// Implemented by [`DecoderSession`]; the pipeline loop only depends on this
/// trait.
pub trait FrameDecoder {
    /// Hand one compressed packet to the decoder.
    fn submit(&mut self, packet: &Packet) -> Result<(), FrameDumpError>;

    /// Try to produce one decoded frame from previously submitted data.
    fn receive(&mut self) -> Result<DecodeStatus, FrameDumpError>;

    /// Signal that no further packets will be submitted, so that buffered
    /// frames can be drained.
    fn finish(&mut self) -> Result<(), FrameDumpError>;
}

/// An opened decoder bound to one video stream.
///
/// Dropping the session frees the codec context.
pub struct DecoderSession {
    decoder: VideoDecoder,
    stream_index: usize,
    frames_decoded: u64,
    eof_sent: bool,
}

impl DecoderSession {
    /// Open a decoder for the selected stream of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::DecoderOpen`] if the stream no longer exists
    /// or the codec context cannot be created or opened.
    pub fn open(source: &MediaSource, selected: &SelectedStream) -> Result<Self, FrameDumpError> {
        let stream_index = selected.index();
        let open_error = |reason: String| FrameDumpError::DecoderOpen {
            stream_index,
            reason,
        };

        let stream = source
            .input()
            .stream(stream_index)
            .ok_or_else(|| open_error("stream not found in container".to_string()))?;
        let context = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| open_error(format!("invalid codec parameters: {error}")))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|error| open_error(error.to_string()))?;

        log::debug!(
            "Opened {} decoder for stream {} ({}x{}, {:?})",
            selected.decoder_name,
            stream_index,
            decoder.width(),
            decoder.height(),
            decoder.format(),
        );

        Ok(Self {
            decoder,
            stream_index,
            frames_decoded: 0,
            eof_sent: false,
        })
    }

    /// Index of the stream this session decodes.
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /// Number of frames produced so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }
}

impl FrameDecoder for DecoderSession {
    fn submit(&mut self, packet: &Packet) -> Result<(), FrameDumpError> {
        self.decoder
            .send_packet(packet)
            .map_err(|error| FrameDumpError::Send {
                stream_index: self.stream_index,
                reason: error.to_string(),
            })
    }

    fn receive(&mut self) -> Result<DecodeStatus, FrameDumpError> {
        let mut frame = VideoFrame::empty();
        match self.decoder.receive_frame(&mut frame) {
            Ok(()) => {
                self.frames_decoded += 1;
                Ok(DecodeStatus::Frame(DecodedFrame::new(
                    self.frames_decoded,
                    frame,
                )))
            }
            Err(FfmpegError::Other { errno }) if errno == EAGAIN => Ok(DecodeStatus::NeedMoreInput),
            Err(FfmpegError::Eof) => Ok(DecodeStatus::EndOfStream),
            Err(error) => Err(FrameDumpError::Receive(error.to_string())),
        }
    }

    fn finish(&mut self) -> Result<(), FrameDumpError> {
        if self.eof_sent {
            return Ok(());
        }
        self.eof_sent = true;
        log::debug!("Flushing decoder for stream {}", self.stream_index);
        self.decoder.send_eof().map_err(|error| FrameDumpError::Send {
            stream_index: self.stream_index,
            reason: format!("end of stream rejected: {error}"),
        })
    }
}

impl Drop for DecoderSession {
    fn drop(&mut self) {
        log::debug!(
            "Closing decoder for stream {} after {} frames",
            self.stream_index,
            self.frames_decoded,
        );
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::{format::Pixel, frame::Video as VideoFrame};

    use super::DecodedFrame;
    use crate::metadata::PictureType;

    #[test]
    fn info_reports_decoded_plane_bytes() {
        let frame = VideoFrame::new(Pixel::YUV420P, 32, 24);
        let expected = frame.data(0).len() + frame.data(1).len() + frame.data(2).len();
        assert!(expected >= 32 * 24 * 3 / 2);

        let info = DecodedFrame::new(5, frame).info();
        assert_eq!(info.sequence, 5);
        assert_eq!(info.size, expected);
        assert_eq!(info.pixel_format, "yuv420p");
        assert_eq!((info.width, info.height), (32, 24));
        assert_eq!(info.picture_type, PictureType::Unknown);
        assert_eq!(info.pts, None);
    }
}
