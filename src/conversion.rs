//! Pixel format conversion.
//!
//! [`FrameConverter`] turns decoded frames into packed RGB24
//! [`ImageBuffer`]s using FFmpeg's software scaler. The source pixel format
//! is read from each frame rather than assumed, and the scaling context is
//! rebuilt whenever the format or dimensions change mid-stream.

use ffmpeg_next::{
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::FrameDumpError;

const RGB_CHANNELS: usize = 3;

/// A packed RGB24 picture with an explicit row stride.
///
/// `stride` is the distance in bytes between the starts of two rows and may
/// exceed `width * 3` because of scaler alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Wrap raw RGB24 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::Conversion`] if `stride` is shorter than a
    /// row of pixels, the layout does not fit in memory, or `data` does not
    /// hold `height` rows.
    pub fn new(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Result<Self, FrameDumpError> {
        let row_bytes = width as usize * RGB_CHANNELS;
        if stride < row_bytes {
            return Err(FrameDumpError::Conversion(format!(
                "stride {stride} is shorter than a {width}-pixel RGB row"
            )));
        }
        let required = stride
            .checked_mul(height.saturating_sub(1) as usize)
            .and_then(|bytes| bytes.checked_add(row_bytes))
            .ok_or_else(|| {
                FrameDumpError::Conversion(format!(
                    "{width}x{height} with stride {stride} overflows the address space"
                ))
            })?;
        if height > 0 && data.len() < required {
            return Err(FrameDumpError::Conversion(format!(
                "buffer holds {} bytes, {width}x{height} with stride {stride} needs {required}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw bytes, including row padding.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The RGB triple at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * RGB_CHANNELS;
        let rgb = self.data.get(offset..offset + RGB_CHANNELS)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }

    /// Convert into a tightly packed [`RgbImage`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::Conversion`] if the packed buffer does not
    /// match the image dimensions.
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameDumpError> {
        let packed = crate::utilities::pack_rows(
            &self.data,
            self.stride,
            self.width as usize * RGB_CHANNELS,
            self.height as usize,
        );
        RgbImage::from_raw(self.width, self.height, packed).ok_or_else(|| {
            FrameDumpError::Conversion(
                "Failed to construct RGB image from converted frame data".to_string(),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScalerKey {
    format: Pixel,
    width: u32,
    height: u32,
}

/// Converts decoded frames to RGB24, caching the scaling context.
pub struct FrameConverter {
    scaler: Option<(ScalerKey, ScalingContext)>,
    contexts_created: u64,
}

impl Default for FrameConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameConverter {
    /// Create a converter. The scaling context is built on first use.
    pub fn new() -> Self {
        Self {
            scaler: None,
            contexts_created: 0,
        }
    }

    /// How many scaling contexts have been derived so far.
    pub fn contexts_created(&self) -> u64 {
        self.contexts_created
    }

    /// Convert one decoded frame to packed RGB24 at its native resolution.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDumpError::Conversion`] if the frame has no pixel
    /// format or zero size, or if FFmpeg cannot build or run the scaler.
    pub fn convert(&mut self, frame: &VideoFrame) -> Result<ImageBuffer, FrameDumpError> {
        let key = ScalerKey {
            format: frame.format(),
            width: frame.width(),
            height: frame.height(),
        };

        if key.format == Pixel::None || key.width == 0 || key.height == 0 {
            return Err(FrameDumpError::Conversion(format!(
                "frame has no usable picture ({:?}, {}x{})",
                key.format, key.width, key.height
            )));
        }

        let reusable = matches!(&self.scaler, Some((cached, _)) if *cached == key);
        if !reusable {
            if let Some((previous, _)) = &self.scaler {
                log::debug!(
                    "Frame changed from {:?} {}x{} to {:?} {}x{}, rebuilding scaler",
                    previous.format,
                    previous.width,
                    previous.height,
                    key.format,
                    key.width,
                    key.height,
                );
            }
            let scaler = ScalingContext::get(
                key.format,
                key.width,
                key.height,
                Pixel::RGB24,
                key.width,
                key.height,
                ScalingFlags::BILINEAR,
            )
            .map_err(|error| {
                FrameDumpError::Conversion(format!(
                    "cannot convert {:?} to RGB24: {error}",
                    key.format
                ))
            })?;
            self.contexts_created += 1;
            self.scaler = Some((key, scaler));
        }

        let (_, scaler) = self
            .scaler
            .as_mut()
            .ok_or_else(|| FrameDumpError::Conversion("scaler was not initialised".to_string()))?;

        let mut rgb_frame = VideoFrame::empty();
        scaler
            .run(frame, &mut rgb_frame)
            .map_err(|error| FrameDumpError::Conversion(error.to_string()))?;

        let stride = rgb_frame.stride(0);
        let length = stride * key.height as usize;
        let data = rgb_frame.data(0)[..length].to_vec();

        ImageBuffer::new(key.width, key.height, stride, data)
    }
}
