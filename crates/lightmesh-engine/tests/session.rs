//! Integration tests for render sessions and the frame loop

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use lightmesh_engine::{
    EngineConfig, FixedRate, FrameClock, GlyphPolicy, GlyphSet, LightSource, RefreshSignal,
    RenderSession, Scene, SessionError, StopHandle,
};
use std::sync::Arc;
use std::thread;

fn small_config() -> EngineConfig {
    EngineConfig::default().with_size(24, 16)
}

/// A tiny glyph set so tests don't rasterize the full wordmark
fn tiny_glyphs() -> GlyphSet {
    GlyphSet::new(12, 4).with_path("M1,1h10v2h-10Z")
}

fn broken_glyphs() -> GlyphSet {
    GlyphSet::new(12, 4).with_path("M1,1 X 2,2")
}

fn session() -> RenderSession {
    RenderSession::with_glyph_set(small_config(), &tiny_glyphs())
        .expect("session should start")
        .with_clock(FrameClock::Stepped { fps: 10.0 })
}

#[test]
fn starts_with_default_layout() {
    let session = session();
    assert_eq!(session.scene().len(), 7);
    assert!(!session.is_glyph_degraded());
    assert_eq!(session.frames_rendered(), 0);
}

#[test]
fn strict_policy_refuses_broken_glyphs() {
    let config = small_config().with_glyph_policy(GlyphPolicy::Strict);
    let result = RenderSession::with_glyph_set(config, &broken_glyphs());
    assert!(matches!(result, Err(SessionError::Glyph(_))));
}

#[test]
fn degraded_policy_substitutes_saturated_field() {
    let session = RenderSession::with_glyph_set(small_config(), &broken_glyphs())
        .expect("degraded session should start");
    assert!(session.is_glyph_degraded());
    assert_eq!(session.glyph().width(), 1);

    let frame = session.render_frame().expect("frame should render");
    assert_eq!(frame.image.dimensions(), (24, 16));
}

#[test]
fn render_frame_counts_frames_and_steps_time() {
    let session = session();
    let first = session.render_frame().unwrap();
    let second = session.render_frame().unwrap();

    assert_eq!((first.index, second.index), (0, 1));
    assert_eq!(first.time, 0.0);
    assert!((second.time - 0.1).abs() < 1e-6);
    assert_eq!(session.frames_rendered(), 2);
}

#[test]
fn snapshot_is_isolated_from_later_edits() {
    let session = session();
    let before = session.snapshot().unwrap();

    session.edit(|scene| {
        scene.clear();
        scene.globals.bloom = 1.0;
    });

    assert_eq!(before.lights.len(), 7);
    assert_eq!(before.globals.bloom, 0.0);
    assert_eq!(session.snapshot().unwrap().lights.len(), 0);
}

#[test]
fn empty_scene_renders_black() {
    let session = session().with_scene(Scene::empty());
    let frame = session.render_frame().unwrap();
    assert!(frame.image.pixels().all(|p| p.0 == [0, 0, 0, 255]));
}

#[test]
fn failed_frame_leaves_session_intact() {
    let config = EngineConfig::default().with_size(0, 16);
    let session =
        RenderSession::with_glyph_set(config, &tiny_glyphs()).expect("session should start");

    let result = session.render_frame();
    assert!(matches!(result, Err(SessionError::Render(_))));
    assert_eq!(session.frames_rendered(), 0);
    assert_eq!(session.scene().len(), 7);
}

#[test]
fn scene_bound_holds_through_edits() {
    let session = session();
    session.edit(|scene| while scene.add_light(LightSource::new(0.5, 0.5)).is_ok() {});
    assert_eq!(session.scene().len(), 16);
    assert!(session.render_frame().is_ok());
}

#[test]
fn run_loop_stops_when_signal_ends() {
    let session = session();
    let mut signal = FixedRate::unthrottled().take(4);
    let mut seen = Vec::new();

    let rendered = session
        .run_loop(&mut signal, &StopHandle::new(), |frame| {
            seen.push(frame.index);
            Ok::<(), std::io::Error>(())
        })
        .unwrap();

    assert_eq!(rendered, 4);
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[test]
fn stop_is_honored_between_frames() {
    let session = session();
    let stop = StopHandle::new();
    let mut signal = FixedRate::unthrottled();
    let mut count = 0;

    let rendered = session
        .run_loop(&mut signal, &stop, |_| {
            count += 1;
            if count == 3 {
                stop.stop();
            }
            Ok::<(), std::io::Error>(())
        })
        .unwrap();

    // The frame that raised the flag completed; no further frame started
    assert_eq!(rendered, 3);
    assert_eq!(session.frames_rendered(), 3);
}

#[test]
fn pre_stopped_loop_renders_nothing() {
    let session = session();
    let stop = StopHandle::new();
    stop.stop();
    let rendered = session
        .run_loop(&mut FixedRate::unthrottled(), &stop, |_| {
            Ok::<(), std::io::Error>(())
        })
        .unwrap();
    assert_eq!(rendered, 0);
}

#[test]
fn sink_errors_end_the_loop() {
    let session = session();
    let mut signal = FixedRate::unthrottled().take(10);
    let result = session.run_loop(&mut signal, &StopHandle::new(), |frame| {
        if frame.index == 1 {
            Err(std::io::Error::other("disk full"))
        } else {
            Ok(())
        }
    });

    assert!(matches!(result, Err(SessionError::Sink(_))));
    assert_eq!(session.frames_rendered(), 2);
}

/// Counts ticks and lets an editor thread run between them
struct Handshake {
    ticks: u64,
    limit: u64,
}

impl RefreshSignal for Handshake {
    fn wait(&mut self) -> bool {
        self.ticks += 1;
        self.ticks <= self.limit
    }
}

#[test]
fn editor_thread_can_mutate_between_frames() {
    let session = Arc::new(session().with_scene(Scene::empty()));

    let editor = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            for i in 0..8 {
                session.edit(|scene| {
                    scene
                        .add_light(LightSource::new(i as f32 / 8.0, 0.5).with_color("core"))
                        .unwrap();
                });
            }
        })
    };

    let mut sizes = Vec::new();
    let mut signal = Handshake { ticks: 0, limit: 20 };
    session
        .run_loop(&mut signal, &StopHandle::new(), |_| {
            sizes.push(session.scene().len());
            Ok::<(), std::io::Error>(())
        })
        .unwrap();
    editor.join().unwrap();

    // Scene sizes only ever grow and never exceed what the editor added
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    assert!(sizes.iter().all(|&n| n <= 8));
    assert_eq!(session.scene().len(), 8);
}

#[test]
fn concurrent_renders_keep_index_and_time_paired() {
    let session = Arc::new(session());
    let clock = FrameClock::Stepped { fps: 10.0 };

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                (0..5)
                    .map(|_| {
                        let frame = session.render_frame().unwrap();
                        (frame.index, frame.time)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut frames: Vec<(u64, f32)> = workers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    frames.sort_by_key(|&(index, _)| index);

    let indices: Vec<u64> = frames.iter().map(|&(index, _)| index).collect();
    assert_eq!(indices, (0..20).collect::<Vec<_>>());
    for (index, time) in frames {
        assert_eq!(time, clock.time(index));
    }
    assert_eq!(session.frames_rendered(), 20);
}
