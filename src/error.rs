//! Error types for the `framedump` crate.
//!
//! This module defines [`FrameDumpError`], the unified error type returned by
//! every fallible stage of the pipeline. Each variant names the stage that
//! failed and carries the upstream FFmpeg or `image` message as text, so a
//! single line is enough to diagnose the failure. Library errors are never
//! converted implicitly: each call site picks the variant of its stage.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for all `framedump` operations.
///
/// Apart from [`FrameWrite`](FrameDumpError::FrameWrite) under
/// [`WriteFailurePolicy::Skip`](crate::WriteFailurePolicy::Skip), every
/// variant terminates the run. Nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameDumpError {
    /// The media file could not be opened or its container was not
    /// recognised.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::MediaSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container header did not carry enough information to describe
    /// its streams.
    #[error("Failed to probe streams in {path}: {reason}")]
    Probe {
        /// Path of the media file being probed.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// No stream in the file is a video stream with an available decoder.
    #[error("File {path} does not contain a decodable video stream")]
    NoVideoStream {
        /// Path of the media file.
        path: PathBuf,
    },

    /// The decoder for the selected stream could not be opened.
    #[error("Failed to open decoder for stream {stream_index}: {reason}")]
    DecoderOpen {
        /// Index of the selected stream.
        stream_index: usize,
        /// Underlying reason the decoder could not be opened.
        reason: String,
    },

    /// Demuxing failed for a reason other than reaching the end of input.
    #[error("Failed to read packet: {0}")]
    PacketRead(String),

    /// The decoder rejected a packet.
    #[error("Failed to send packet to decoder for stream {stream_index}: {reason}")]
    Send {
        /// Index of the stream the packet belonged to.
        stream_index: usize,
        /// Underlying FFmpeg status.
        reason: String,
    },

    /// The decoder failed while producing a frame.
    #[error("Failed to receive frame from decoder: {0}")]
    Receive(String),

    /// A decoded frame could not be converted to RGB.
    #[error("Failed to convert frame to RGB: {0}")]
    Conversion(String),

    /// A converted frame could not be encoded or written to disk.
    #[error("Failed to write frame to {path}: {reason}")]
    FrameWrite {
        /// Destination path of the still image.
        path: PathBuf,
        /// Underlying encoder or I/O error.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::FrameDumpError;

    #[test]
    fn messages_name_the_failing_stage() {
        let open = FrameDumpError::FileOpen {
            path: PathBuf::from("clip.mp4"),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            open.to_string(),
            "Failed to open media file at clip.mp4: No such file or directory"
        );

        let send = FrameDumpError::Send {
            stream_index: 0,
            reason: "Invalid data found when processing input".to_string(),
        };
        assert!(send.to_string().starts_with("Failed to send packet to decoder for stream 0"));

        let write = FrameDumpError::FrameWrite {
            path: PathBuf::from("3.jpg"),
            reason: "Permission denied".to_string(),
        };
        assert!(write.to_string().contains("3.jpg"));
    }

    #[test]
    fn error_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<FrameDumpError>();
    }
}
