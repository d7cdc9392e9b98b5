//! Gesture Scene - headless demo
//!
//! Drives the scene from a scripted synthetic hand through the real capture
//! pipeline and inference worker, logging mode transitions and selections.
//!
//! Usage: `gesture-scene [config.json] [seconds]`

use std::time::{Duration, Instant};

use anyhow::Context;
use gesture_scene::capture::{CapturePipeline, PipelineState};
use gesture_scene::demo::{ScriptedDetector, SyntheticFrameSource};
use gesture_scene::scene::PhotoRef;
use gesture_scene::telemetry::{init_logging, LogConfig, LogGuard, TickRate};
use gesture_scene::{GestureScene, SceneConfig};

const TARGET_FPS: u32 = 60;
const DEFAULT_RUN_SECONDS: u64 = 20;
const CAMERA_WIDTH: u32 = 640;
const CAMERA_HEIGHT: u32 = 480;
const DEMO_PHOTOS: usize = 8;

fn main() -> anyhow::Result<()> {
    // Keep the guard alive so buffered file output is flushed on exit
    let _log_guard: Option<LogGuard> = match init_logging(&LogConfig::default()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("Gesture Scene v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SceneConfig::load_or_default(path),
        None => SceneConfig::default(),
    };
    let run_for = match args.next() {
        Some(secs) => Duration::from_secs(secs.parse().context("run length must be whole seconds")?),
        None => Duration::from_secs(DEFAULT_RUN_SECONDS),
    };

    let mut scene = GestureScene::new(&config);
    scene.resize(1280, 720);

    let photos: Vec<PhotoRef> = (0..DEMO_PHOTOS).map(|i| PhotoRef(format!("photo-{i:02}.jpg"))).collect();
    scene.add_photos(photos.iter().cloned());

    let mut pipeline = CapturePipeline::new(
        Box::new(SyntheticFrameSource::new(CAMERA_WIDTH, CAMERA_HEIGHT)),
        Box::new(ScriptedDetector::default()),
        &config.capture,
    );
    if pipeline.start() == PipelineState::Unavailable {
        tracing::warn!("Running without gesture input");
    }

    let frame_interval = Duration::from_secs_f64(1.0 / TARGET_FPS as f64);
    let mut render_rate = TickRate::default();
    let mut capture_rate = TickRate::default();
    let mut last_hovered = None;
    let mut last_report = Instant::now();
    let mut last_frame = Instant::now();
    let started = last_frame;

    while started.elapsed() < run_for {
        let now = Instant::now();

        if let Some(detection) = pipeline.poll(now) {
            capture_rate.record(now);
            scene.capture_tick(detection.hand.as_ref());
        }

        // Photos "finish loading" one by one over the first seconds
        let loaded = (now.duration_since(started).as_millis() / 250) as usize;
        if let Some(photo) = photos.get(loaded) {
            scene.mark_photo_ready(photo);
        }

        let delta_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        let frame = scene.render_tick(delta_time);
        render_rate.record(now);

        if frame.hovered != last_hovered {
            if let Some(index) = frame.hovered {
                tracing::info!(index, photo = %photos[index].0, "Pointer over photo");
            }
            last_hovered = frame.hovered;
        }

        if now.duration_since(last_report) >= Duration::from_secs(2) {
            tracing::info!(
                mode = frame.mode.label(),
                hand = frame.hand.label(),
                selected = frame.selected_index,
                render_hz = render_rate.rate(),
                capture_hz = capture_rate.rate(),
                dropped = pipeline.frames_dropped(),
                "Status"
            );
            last_report = now;
        }

        let next_frame = now + frame_interval;
        if let Some(wait) = next_frame.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    pipeline.stop();
    // No further detections arrive, so report the hand as gone
    scene.capture_tick(None);
    tracing::info!(
        hand = scene.hand_status().label(),
        frames = render_rate.total(),
        detections = capture_rate.total(),
        submitted = pipeline.frames_submitted(),
        "Demo finished"
    );
    Ok(())
}
