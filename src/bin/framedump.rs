use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::Parser;
use colored::Colorize;
use framedump::{
    ContainerInfo, FfmpegLogLevel, FrameInfo, Pipeline, PipelineObserver, PipelineOptions,
    RunSummary, StopReason, StreamDescriptor, StreamKind,
};

/// Environment variable controlling FFmpeg's own stderr output.
const FFMPEG_LOG_ENV: &str = "FRAMEDUMP_FFMPEG_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "framedump",
    version,
    about = "Write the first frames of a video as numbered JPEG files in the current directory",
    after_help = "Examples:\n  framedump input.mp4\n  RUST_LOG=debug framedump input.mkv\n  FRAMEDUMP_FFMPEG_LOG=warning framedump input.avi"
)]
struct Cli {
    /// Input media path.
    input: PathBuf,
}

/// Prints the container, stream, and frame report to stdout.
struct StdoutReport;

impl PipelineObserver for StdoutReport {
    fn on_container(&self, container: &ContainerInfo, stream_count: usize) {
        for line in container_lines(container, stream_count) {
            println!("{line}");
        }
    }

    fn on_stream(&self, stream: &StreamDescriptor, decoder: Option<&str>) {
        for line in stream_lines(stream, decoder) {
            println!("{line}");
        }
    }

    fn on_frame(&self, frame: &FrameInfo, output: &Path) {
        println!("{} -> {}", frame_line(frame), output.display());
    }
}

fn container_lines(container: &ContainerInfo, stream_count: usize) -> Vec<String> {
    let duration = container
        .duration
        .map(|duration| format!("{} us", duration.as_micros()))
        .unwrap_or_else(|| "unknown".to_string());
    vec![
        format!("Format: {} Duration: {}", container.format, duration),
        format!("Count of Stream: {stream_count}"),
    ]
}

fn stream_lines(stream: &StreamDescriptor, decoder: Option<&str>) -> Vec<String> {
    let Some(decoder) = decoder else {
        return vec![format!(
            "Unsupported codec {} in stream {}",
            stream.codec_name, stream.index
        )];
    };

    let mut lines = Vec::with_capacity(2);
    match &stream.kind {
        StreamKind::Video { width, height } => {
            lines.push(format!("Video Codec: resolution {width} x {height}"));
        }
        StreamKind::Audio {
            channels,
            sample_rate,
        } => {
            lines.push(format!(
                "Audio Codec: {channels} channels, sample rate {sample_rate}"
            ));
        }
        StreamKind::Other(_) => {}
    }
    lines.push(format!(
        "Codec {} ID {} bit_rate {}",
        decoder,
        stream.codec_number(),
        stream.bit_rate
    ));
    lines
}

fn frame_line(frame: &FrameInfo) -> String {
    let pts = frame
        .pts
        .map(|pts| pts.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "Frame {} (type={}, size={} bytes, format={}) pts {} {} x {} key_frame {}",
        frame.sequence,
        frame.picture_type,
        frame.size,
        frame.pixel_format,
        pts,
        frame.width,
        frame.height,
        u8::from(frame.is_keyframe),
    )
}

fn summary_line(summary: &RunSummary) -> String {
    let reason = match summary.stop_reason {
        StopReason::BudgetReached => "frame budget reached",
        StopReason::InputExhausted => "end of input",
    };
    format!(
        "Wrote {} frames from stream {} ({reason}; {} of {} packets skipped)",
        summary.frames_emitted, summary.stream_index, summary.packets_skipped, summary.packets_read,
    )
}

fn configure_ffmpeg_logging() {
    let level = match std::env::var(FFMPEG_LOG_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|error| {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("{error}, using error").yellow()
            );
            FfmpegLogLevel::Error
        }),
        Err(_) => FfmpegLogLevel::Error,
    };
    framedump::set_ffmpeg_log_level(level);
}

fn run(cli: &Cli) -> Result<RunSummary, Box<dyn std::error::Error>> {
    configure_ffmpeg_logging();

    let options = PipelineOptions::new().with_observer(Arc::new(StdoutReport));
    Ok(Pipeline::new(options).run(&cli.input)?)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            println!("{}", summary_line(&summary));
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
