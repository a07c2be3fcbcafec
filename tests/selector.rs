//! Stream selection integration tests.
//!
//! Decoder availability is injected through a closure so that the tests do
//! not depend on which codecs the local FFmpeg build ships.

use std::sync::Mutex;

use ffmpeg_next::codec::Id as CodecId;
use framedump::{
    FrameDumpError, PipelineObserver, StreamDescriptor, StreamKind, StreamSelector,
};

fn video(index: usize, codec_id: CodecId, codec_name: &str) -> StreamDescriptor {
    StreamDescriptor {
        index,
        kind: StreamKind::Video {
            width: 640,
            height: 480,
        },
        codec_id,
        codec_name: codec_name.to_string(),
        bit_rate: 0,
    }
}

fn audio(index: usize) -> StreamDescriptor {
    StreamDescriptor {
        index,
        kind: StreamKind::Audio {
            channels: 2,
            sample_rate: 44_100,
        },
        codec_id: CodecId::AAC,
        codec_name: "aac".to_string(),
        bit_rate: 128_000,
    }
}

/// Every codec except VP9 has a decoder.
fn without_vp9(codec_id: CodecId) -> Option<String> {
    match codec_id {
        CodecId::VP9 => None,
        CodecId::H264 => Some("h264".to_string()),
        CodecId::AAC => Some("aac".to_string()),
        other => Some(format!("{other:?}").to_lowercase()),
    }
}

#[derive(Default)]
struct StreamLog {
    seen: Mutex<Vec<(usize, Option<String>)>>,
}

impl PipelineObserver for StreamLog {
    fn on_stream(&self, stream: &StreamDescriptor, decoder: Option<&str>) {
        self.seen
            .lock()
            .expect("stream log lock poisoned")
            .push((stream.index, decoder.map(str::to_string)));
    }
}

#[test]
fn first_decodable_video_stream_wins() {
    let log = StreamLog::default();
    let streams = [
        audio(0),
        video(1, CodecId::H264, "h264"),
        video(2, CodecId::MPEG4, "mpeg4"),
    ];

    let selected = StreamSelector::new(&log, "input.mp4")
        .select_with(&streams, &without_vp9)
        .expect("Expected a video stream to be selected");

    assert_eq!(selected.index(), 1);
    assert_eq!(selected.decoder_name, "h264");
    assert_eq!(selected.descriptor, streams[1]);
}

#[test]
fn video_without_decoder_is_skipped() {
    let log = StreamLog::default();
    let streams = [video(0, CodecId::VP9, "vp9"), video(1, CodecId::H264, "h264")];

    let selected = StreamSelector::new(&log, "input.webm")
        .select_with(&streams, &without_vp9)
        .expect("Expected the second stream to be selected");

    assert_eq!(selected.index(), 1);
}

#[test]
fn audio_only_file_has_no_video_stream() {
    let log = StreamLog::default();
    let streams = [audio(0), audio(1)];

    let result = StreamSelector::new(&log, "music.m4a").select_with(&streams, &without_vp9);

    match result {
        Err(error @ FrameDumpError::NoVideoStream { .. }) => {
            let message = error.to_string();
            assert!(
                message.contains("music.m4a"),
                "Error should name the file: {message}"
            );
        }
        other => panic!("Expected NoVideoStream, got {other:?}"),
    }
}

#[test]
fn undecodable_video_is_no_video_stream() {
    let log = StreamLog::default();
    let streams = [video(0, CodecId::VP9, "vp9"), audio(1)];

    let result = StreamSelector::new(&log, "input.webm").select_with(&streams, &without_vp9);

    assert!(matches!(result, Err(FrameDumpError::NoVideoStream { .. })));
}

#[test]
fn empty_stream_list_is_no_video_stream() {
    let log = StreamLog::default();
    let result = StreamSelector::new(&log, "empty.mkv").select_with(&[], &without_vp9);
    assert!(matches!(result, Err(FrameDumpError::NoVideoStream { .. })));
}

#[test]
fn every_stream_is_reported_in_order() {
    let log = StreamLog::default();
    let streams = [
        video(0, CodecId::VP9, "vp9"),
        audio(1),
        video(2, CodecId::H264, "h264"),
        video(3, CodecId::MPEG4, "mpeg4"),
    ];

    StreamSelector::new(&log, "input.mkv")
        .select_with(&streams, &without_vp9)
        .expect("Expected a video stream to be selected");

    let seen = log.seen.lock().expect("stream log lock poisoned");
    assert_eq!(
        *seen,
        vec![
            (0, None),
            (1, Some("aac".to_string())),
            (2, Some("h264".to_string())),
            (3, Some("mpeg4".to_string())),
        ]
    );
}

#[test]
fn ffmpeg_registry_finds_a_common_decoder() {
    ffmpeg_next::init().expect("Failed to initialise FFmpeg");
    let log = StreamLog::default();
    let streams = [audio(0), video(1, CodecId::MPEG4, "mpeg4")];

    let selected = StreamSelector::new(&log, "input.avi")
        .select(&streams)
        .expect("FFmpeg ships an MPEG-4 part 2 decoder");

    assert_eq!(selected.index(), 1);
    assert!(!selected.decoder_name.is_empty());
}
