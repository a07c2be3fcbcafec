//! Still-image output.
//!
//! [`FrameEmitter`] encodes converted frames with the `image` crate and
//! writes them as `<n>.<extension>` into an output directory. The encoder is
//! chosen from the extension.

use std::path::{Path, PathBuf};

use crate::{conversion::ImageBuffer, error::FrameDumpError};

/// Writes numbered still images.
#[derive(Debug, Clone)]
pub struct FrameEmitter {
    directory: PathBuf,
    extension: String,
}

impl FrameEmitter {
    /// Create an emitter writing into `directory` with the given file
    /// extension (e.g. `"jpg"`, `"png"`).
    pub fn new<P: AsRef<Path>>(directory: P, extension: &str) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
        }
    }

    /// Destination path for `frame_number`.
    pub fn path_for(&self, frame_number: u64) -> PathBuf {
        crate::utilities::frame_path(&self.directory, frame_number, &self.extension)
    }

    /// Encode `buffer` and write it to the path for `frame_number`.
    ///
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::FrameWrite`] if the extension has no
    /// encoder, the directory is missing or not writable, or encoding fails.
    pub fn emit(&self, buffer: &ImageBuffer, frame_number: u64) -> Result<PathBuf, FrameDumpError> {
        let path = self.path_for(frame_number);
        let write_error = |reason: String| FrameDumpError::FrameWrite {
            path: path.clone(),
            reason,
        };

        let image = buffer
            .to_rgb_image()
            .map_err(|error| write_error(error.to_string()))?;
        image
            .save(&path)
            .map_err(|error| write_error(error.to_string()))?;

        log::debug!(
            "Wrote frame {} ({}x{}) to {}",
            frame_number,
            buffer.width(),
            buffer.height(),
            path.display(),
        );

        Ok(path)
    }
}
