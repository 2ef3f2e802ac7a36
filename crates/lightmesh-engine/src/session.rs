//! Render sessions and the frame loop
//!
//! A session owns the scene behind a read/write lock and the glyph field
//! built at startup. Every frame starts by taking a [`FrameSnapshot`], so
//! edits made between frames never tear a frame in half.

use crate::config::{EngineConfig, GlyphPolicy};
use crate::scene::Scene;
use image::RgbaImage;
use lightmesh_core::frame::FrameSnapshot;
use lightmesh_core::glyph::{GlyphField, GlyphSet, build_glyph_field};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur in a render session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Glyph field could not be built under [`GlyphPolicy::Strict`]
    #[error("Glyph field unavailable: {0}")]
    Glyph(#[source] lightmesh_core::Error),

    /// A frame failed to render; the session is left unchanged
    #[error("Frame render failed: {0}")]
    Render(#[from] lightmesh_core::Error),

    /// The frame sink rejected a frame
    #[error("Frame sink failed: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// How animation time advances
#[derive(Debug, Clone, Copy)]
pub enum FrameClock {
    /// Seconds since the session started
    Wall(Instant),
    /// `frame / fps`, for reproducible offline renders
    Stepped { fps: f32 },
}

impl FrameClock {
    pub fn wall() -> Self {
        Self::Wall(Instant::now())
    }

    /// Animation time for the given frame index
    pub fn time(&self, frame: u64) -> f32 {
        match *self {
            Self::Wall(start) => start.elapsed().as_secs_f32(),
            Self::Stepped { fps } if fps > 0.0 => frame as f32 / fps,
            Self::Stepped { .. } => 0.0,
        }
    }
}

/// A finished frame, handed to the sink
#[derive(Debug)]
pub struct RenderedFrame {
    /// Zero-based frame index within the session
    pub index: u64,
    pub time: f32,
    pub image: RgbaImage,
}

/// Source of refresh ticks for [`RenderSession::run_loop`]
///
/// The loop calls [`wait`](RefreshSignal::wait) once before every frame.
pub trait RefreshSignal {
    /// Block until the next frame is due; `false` ends the loop
    fn wait(&mut self) -> bool;
}

/// Longest wait between two [`FixedRate`] ticks
pub const MAX_FRAME_INTERVAL: Duration = Duration::from_secs(60);

/// Ticks at a fixed rate, optionally for a limited number of frames
#[derive(Debug, Clone)]
pub struct FixedRate {
    interval: Duration,
    next: Option<Instant>,
    remaining: Option<u64>,
}

impl FixedRate {
    /// Rates slower than one frame per [`MAX_FRAME_INTERVAL`] are clamped to it
    pub fn new(fps: f32) -> Self {
        let interval = if fps.is_finite() && fps > 0.0 {
            Duration::try_from_secs_f32(1.0 / fps)
                .map_or(MAX_FRAME_INTERVAL, |d| d.min(MAX_FRAME_INTERVAL))
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            next: None,
            remaining: None,
        }
    }

    /// Tick as fast as frames complete
    pub fn unthrottled() -> Self {
        Self::new(0.0)
    }

    /// Stop after `frames` ticks
    pub fn take(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl RefreshSignal for FixedRate {
    fn wait(&mut self) -> bool {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        // Don't try to catch up on missed ticks
        self.next = Some(due.max(now) + self.interval);
        true
    }
}

/// Cloneable cancellation flag, checked between frames
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Per-session render context
///
/// Created once per output surface; dropping it releases the glyph field.
pub struct RenderSession {
    config: EngineConfig,
    scene: RwLock<Scene>,
    glyph: Arc<GlyphField>,
    glyph_degraded: bool,
    clock: FrameClock,
    frames: AtomicU64,
    // Held from snapshot to counter bump so each index keeps its own time
    frame_slot: Mutex<()>,
}

impl RenderSession {
    /// Start a session with the built-in wordmark glyphs
    pub fn new(config: EngineConfig) -> Result<Self, SessionError> {
        Self::with_glyph_set(config, &GlyphSet::wordmark())
    }

    /// Start a session with a custom glyph set
    pub fn with_glyph_set(config: EngineConfig, glyphs: &GlyphSet) -> Result<Self, SessionError> {
        let started = Instant::now();
        let (glyph, glyph_degraded) = match build_glyph_field(glyphs) {
            Ok(field) => {
                tracing::debug!(
                    "Built {}x{} glyph field in {:?}",
                    field.width(),
                    field.height(),
                    started.elapsed()
                );
                (field, false)
            }
            Err(e) => match config.glyph_policy {
                GlyphPolicy::Strict => return Err(SessionError::Glyph(e)),
                GlyphPolicy::Degraded => {
                    tracing::warn!("Glyph field unavailable, glyph lights will be dark: {}", e);
                    (GlyphField::saturated(), true)
                }
            },
        };

        tracing::info!(
            "Render session ready ({}x{} @ {} fps)",
            config.width,
            config.height,
            config.fps
        );

        Ok(Self {
            config,
            scene: RwLock::new(Scene::default_layout()),
            glyph: Arc::new(glyph),
            glyph_degraded,
            clock: FrameClock::wall(),
            frames: AtomicU64::new(0),
            frame_slot: Mutex::new(()),
        })
    }

    /// Replace the scene
    pub fn with_scene(self, scene: Scene) -> Self {
        *self.scene.write() = scene;
        self
    }

    /// Replace the animation clock
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared read access to the scene
    pub fn scene(&self) -> RwLockReadGuard<'_, Scene> {
        self.scene.read()
    }

    /// Mutate the scene under the write lock
    ///
    /// Frames already in flight keep rendering their own snapshot.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        f(&mut self.scene.write())
    }

    pub fn glyph(&self) -> &Arc<GlyphField> {
        &self.glyph
    }

    /// Whether the glyph field fell back to the saturated placeholder
    pub fn is_glyph_degraded(&self) -> bool {
        self.glyph_degraded
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Capture the scene for the next frame
    pub fn snapshot(&self) -> Result<FrameSnapshot, SessionError> {
        let time = self.clock.time(self.frames_rendered());
        self.snapshot_at(time)
    }

    /// Capture the scene at an explicit animation time
    pub fn snapshot_at(&self, time: f32) -> Result<FrameSnapshot, SessionError> {
        let scene = self.scene.read();
        let snapshot = FrameSnapshot::new(scene.lights(), &scene.palette, scene.globals, time)?;
        Ok(snapshot)
    }

    /// Render a snapshot at the configured size without touching the frame
    /// counter
    pub fn render_snapshot(&self, snapshot: &FrameSnapshot) -> Result<RgbaImage, SessionError> {
        if !snapshot.lights.has_color() {
            tracing::debug!("No colored lights in scene, frame will be black");
        }
        let image = snapshot.render(self.config.size(), &self.glyph)?;
        Ok(image)
    }

    /// Snapshot and render the next frame
    ///
    /// Concurrent callers are serialized, so frame `n` is always rendered at
    /// `clock.time(n)`. A failed frame does not consume an index.
    pub fn render_frame(&self) -> Result<RenderedFrame, SessionError> {
        let _slot = self.frame_slot.lock();
        let index = self.frames_rendered();
        let snapshot = self.snapshot_at(self.clock.time(index))?;
        let image = self.render_snapshot(&snapshot)?;
        self.frames.store(index + 1, Ordering::Release);
        Ok(RenderedFrame {
            index,
            time: snapshot.time,
            image,
        })
    }

    /// Render frames until the signal ends or `stop` is raised
    ///
    /// `stop` is only checked between frames, so the frame in flight always
    /// reaches the sink. Returns the number of frames this call rendered.
    pub fn run_loop<S, F, E>(
        &self,
        signal: &mut S,
        stop: &StopHandle,
        mut sink: F,
    ) -> Result<u64, SessionError>
    where
        S: RefreshSignal + ?Sized,
        F: FnMut(&RenderedFrame) -> Result<(), E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        tracing::info!("Frame loop started");
        let mut rendered = 0;

        while !stop.is_stopped() && signal.wait() {
            if stop.is_stopped() {
                break;
            }
            let frame = self.render_frame()?;
            rendered += 1;
            sink(&frame).map_err(|e| SessionError::Sink(e.into()))?;
        }

        tracing::info!("Frame loop stopped after {} frames", rendered);
        Ok(rendered)
    }
}
