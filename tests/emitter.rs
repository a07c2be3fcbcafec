//! Still-image output integration tests.

use framedump::{FrameDumpError, FrameEmitter, ImageBuffer};

fn red_buffer(width: u32, height: u32) -> ImageBuffer {
    let data = [255, 0, 0].repeat((width * height) as usize);
    ImageBuffer::new(width, height, width as usize * 3, data).expect("Valid buffer")
}

#[test]
fn writes_numbered_jpeg() {
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let emitter = FrameEmitter::new(output.path(), "jpg");

    let path = emitter
        .emit(&red_buffer(40, 30), 7)
        .expect("Failed to write frame");

    assert_eq!(path, output.path().join("7.jpg"));
    let image = image::open(&path).expect("Output is not a readable image");
    assert_eq!((image.width(), image.height()), (40, 30));

    let pixel = image.to_rgb8().get_pixel(20, 15).0;
    assert!(pixel[0] > 200 && pixel[1] < 60 && pixel[2] < 60, "Expected red, got {pixel:?}");
}

#[test]
fn extension_selects_the_encoder() {
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let emitter = FrameEmitter::new(output.path(), ".PNG");

    let path = emitter
        .emit(&red_buffer(4, 4), 1)
        .expect("Failed to write frame");

    assert_eq!(path, output.path().join("1.png"));
    let image = image::open(&path).expect("Output is not a readable image");
    assert_eq!(image.to_rgb8().get_pixel(0, 0).0, [255, 0, 0]);
}

#[test]
fn existing_file_is_overwritten() {
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let emitter = FrameEmitter::new(output.path(), "jpg");
    std::fs::write(emitter.path_for(1), b"stale").expect("Failed to write stale file");

    let path = emitter
        .emit(&red_buffer(8, 8), 1)
        .expect("Failed to overwrite frame");

    assert!(image::open(path).is_ok());
}

#[test]
fn missing_directory_is_a_write_error() {
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let emitter = FrameEmitter::new(output.path().join("missing"), "jpg");

    let result = emitter.emit(&red_buffer(8, 8), 1);

    match result {
        Err(error @ FrameDumpError::FrameWrite { .. }) => {
            let message = error.to_string();
            assert!(message.contains("1.jpg"), "Error should name the file: {message}");
        }
        other => panic!("Expected FrameWrite, got {other:?}"),
    }
}

#[test]
fn unknown_extension_is_a_write_error() {
    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let emitter = FrameEmitter::new(output.path(), "notanimage");

    let result = emitter.emit(&red_buffer(8, 8), 1);
    assert!(matches!(result, Err(FrameDumpError::FrameWrite { .. })));
}
