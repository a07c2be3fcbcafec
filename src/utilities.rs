//! Internal utility functions.
//!
//! Helpers for pixel-row copying and output naming that do not belong in any
//! single public module.

use std::path::{Path, PathBuf};

/// Copy `height` rows of `row_bytes` each out of a buffer whose rows are
/// `stride` bytes apart, dropping the per-row padding.
///
/// FFmpeg aligns rows, so `stride` is frequently larger than
/// `width * bytes_per_pixel`. The result can be passed directly to
/// [`image::RgbImage::from_raw`].
pub(crate) fn pack_rows(data: &[u8], stride: usize, row_bytes: usize, height: usize) -> Vec<u8> {
    if stride == row_bytes {
        data[..row_bytes * height].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * height);
        for row in 0..height {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}

/// Path of the still image for `frame_number`: `<directory>/<n>.<extension>`.
pub(crate) fn frame_path(directory: &Path, frame_number: u64, extension: &str) -> PathBuf {
    directory.join(format!("{frame_number}.{extension}"))
}
