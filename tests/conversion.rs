//! Pixel format conversion integration tests.
//!
//! Frames are allocated directly with FFmpeg and filled with flat colours,
//! so the expected RGB values are known without a decoder.

use ffmpeg_next::{format::Pixel, frame::Video as VideoFrame};
use framedump::{FrameConverter, FrameDumpError, ImageBuffer};

fn flat_yuv420p(width: u32, height: u32, luma: u8) -> VideoFrame {
    let mut frame = VideoFrame::new(Pixel::YUV420P, width, height);
    frame.data_mut(0).fill(luma);
    frame.data_mut(1).fill(128);
    frame.data_mut(2).fill(128);
    frame
}

fn assert_grey(buffer: &ImageBuffer, low: u8, high: u8) {
    for (x, y) in [(0, 0), (buffer.width() - 1, buffer.height() - 1)] {
        let [r, g, b] = buffer.pixel(x, y).expect("Pixel should be in bounds");
        let spread = r.max(g).max(b) - r.min(g).min(b);
        assert!(
            (low..=high).contains(&r) && spread <= 2,
            "Expected grey in {low}..={high} at ({x}, {y}), got ({r}, {g}, {b})",
        );
    }
}

#[test]
fn converts_yuv420p_to_rgb24() {
    let mut converter = FrameConverter::new();
    let buffer = converter
        .convert(&flat_yuv420p(64, 48, 128))
        .expect("Failed to convert frame");

    assert_eq!(buffer.width(), 64);
    assert_eq!(buffer.height(), 48);
    assert!(buffer.stride() >= 64 * 3);
    assert_grey(&buffer, 120, 140);
}

#[test]
fn black_and_white_stay_at_the_ends_of_the_range() {
    let mut converter = FrameConverter::new();

    let black = converter
        .convert(&flat_yuv420p(16, 16, 16))
        .expect("Failed to convert black frame");
    assert_grey(&black, 0, 8);

    let white = converter
        .convert(&flat_yuv420p(16, 16, 235))
        .expect("Failed to convert white frame");
    assert_grey(&white, 247, 255);
}

#[test]
fn pixel_format_is_read_from_the_frame() {
    let mut frame = VideoFrame::new(Pixel::GRAY8, 20, 10);
    frame.data_mut(0).fill(200);

    let buffer = FrameConverter::new()
        .convert(&frame)
        .expect("Failed to convert GRAY8 frame");

    assert_eq!((buffer.width(), buffer.height()), (20, 10));
    assert_grey(&buffer, 190, 220);
}

#[test]
fn scaler_is_reused_for_identical_frames() {
    let mut converter = FrameConverter::new();
    for _ in 0..3 {
        converter
            .convert(&flat_yuv420p(32, 32, 100))
            .expect("Failed to convert frame");
    }
    assert_eq!(converter.contexts_created(), 1);
}

#[test]
fn resolution_change_rebuilds_the_scaler() {
    let mut converter = FrameConverter::new();

    let small = converter
        .convert(&flat_yuv420p(32, 32, 100))
        .expect("Failed to convert small frame");
    let large = converter
        .convert(&flat_yuv420p(64, 48, 100))
        .expect("Failed to convert large frame");

    assert_eq!(converter.contexts_created(), 2);
    assert_eq!((small.width(), small.height()), (32, 32));
    assert_eq!((large.width(), large.height()), (64, 48));
}

#[test]
fn empty_frame_is_rejected() {
    let result = FrameConverter::new().convert(&VideoFrame::empty());
    assert!(matches!(result, Err(FrameDumpError::Conversion(_))));
}

#[test]
fn image_buffer_rejects_short_data() {
    let result = ImageBuffer::new(4, 4, 12, vec![0; 40]);
    assert!(matches!(result, Err(FrameDumpError::Conversion(_))));

    let result = ImageBuffer::new(4, 4, 8, vec![0; 64]);
    assert!(
        matches!(result, Err(FrameDumpError::Conversion(_))),
        "Stride shorter than a row must be rejected",
    );
}

#[test]
fn image_buffer_drops_row_padding() {
    // 2x2 pixels, rows padded from 6 to 8 bytes.
    let data = vec![
        1, 2, 3, 4, 5, 6, 0, 0, //
        7, 8, 9, 10, 11, 12, 0, 0,
    ];
    let buffer = ImageBuffer::new(2, 2, 8, data).expect("Valid buffer");

    assert_eq!(buffer.pixel(1, 1), Some([10, 11, 12]));
    assert_eq!(buffer.pixel(2, 0), None);

    let image = buffer.to_rgb_image().expect("Failed to pack image");
    assert_eq!(image.as_raw(), &vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
}

#[test]
fn image_buffer_rejects_overflowing_layout() {
    let result = ImageBuffer::new(2, 3, usize::MAX, Vec::new());
    assert!(matches!(result, Err(FrameDumpError::Conversion(_))));
}
