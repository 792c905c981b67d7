//! Simulation Clock & Loop
//!
//! Per-frame bookkeeping shared by the sandbox and the labs: the clamped
//! delta, the play/pause flag, cancellation, and frame statistics. The loop
//! itself is driven by the host (winit redraws, tests calling `frame`).

use std::time::Instant;

use crate::camera::Camera;
use crate::scene::{MeshHandle, Scene};

/// Smoothing factor for the FPS moving average.
const FPS_SMOOTHING: f32 = 0.1;

/// Anything that can draw a scene. The GPU mesh pass implements this; tests
/// use a recording stub.
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera);

    /// Meshes removed since the previous frame; drop any cached data for them.
    fn release(&mut self, _handles: &[MeshHandle]) {}
}

/// What a call to `frame` did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The frame rendered; `stepped` tells whether dynamics advanced by `dt`.
    Rendered { dt: f32, stepped: bool },
    /// The loop was cancelled; nothing happened.
    Cancelled,
}

/// Frame statistics readable by a HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub steps: u64,
    /// Exponentially smoothed frames per second (wall clock)
    pub fps: f32,
    /// Last raw wall-clock delta in milliseconds
    pub frame_ms: f32,
}

/// Delta clamping plus statistics.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_dt: f32,
    nominal_dt: f32,
    last_instant: Option<Instant>,
    stats: FrameStats,
}

impl FrameClock {
    pub fn new(max_dt: f32, nominal_dt: f32) -> Self {
        Self {
            max_dt,
            nominal_dt,
            last_instant: None,
            stats: FrameStats::default(),
        }
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Clamp a raw wall-clock delta into `[0, max_dt]` and record it.
    /// Non-finite deltas count as zero.
    pub fn tick(&mut self, raw_dt: f32) -> f32 {
        let raw = if raw_dt.is_finite() { raw_dt.max(0.0) } else { 0.0 };
        self.stats.frames += 1;
        self.stats.frame_ms = raw * 1000.0;
        if raw > 0.0 {
            let instant_fps = 1.0 / raw;
            self.stats.fps = if self.stats.fps == 0.0 {
                instant_fps
            } else {
                self.stats.fps + (instant_fps - self.stats.fps) * FPS_SMOOTHING
            };
        }
        raw.min(self.max_dt)
    }

    /// Wall-clock delta since the previous call (the nominal step on the first).
    pub fn elapsed_since_last(&mut self, now: Instant) -> f32 {
        let raw = match self.last_instant {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => self.nominal_dt,
        };
        self.last_instant = Some(now);
        raw
    }

    pub fn record_step(&mut self) {
        self.stats.steps += 1;
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

/// Play/pause and cancellation flags for a frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoop {
    playing: bool,
    cancelled: bool,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self {
            playing: true,
            cancelled: false,
        }
    }
}

impl FrameLoop {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Gates dynamics only; rendering continues while paused.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Renderer that draws nothing. Useful for headless stepping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl FrameRenderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, _camera: &Camera) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tick_clamps_large_delta() {
        let mut clock = FrameClock::new(0.033, 1.0 / 60.0);
        assert_eq!(clock.tick(0.5), 0.033);
        assert_eq!(clock.tick(0.01), 0.01);
        assert_eq!(clock.stats().frames, 2);
    }

    #[test]
    fn test_tick_rejects_garbage() {
        let mut clock = FrameClock::new(0.033, 1.0 / 60.0);
        assert_eq!(clock.tick(-1.0), 0.0);
        assert_eq!(clock.tick(f32::NAN), 0.0);
    }

    #[test]
    fn test_fps_tracks_steady_rate() {
        let mut clock = FrameClock::new(0.033, 1.0 / 60.0);
        for _ in 0..200 {
            clock.tick(1.0 / 50.0);
        }
        assert!((clock.stats().fps - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_first_elapsed_is_nominal() {
        let mut clock = FrameClock::new(0.033, 0.02);
        let start = Instant::now();
        assert_eq!(clock.elapsed_since_last(start), 0.02);
        let later = start + Duration::from_millis(10);
        assert!((clock.elapsed_since_last(later) - 0.01).abs() < 1e-4);
    }

    #[test]
    fn test_loop_flags() {
        let mut frame_loop = FrameLoop::default();
        assert!(frame_loop.is_playing());
        frame_loop.set_playing(false);
        assert!(!frame_loop.is_playing());
        frame_loop.cancel();
        assert!(frame_loop.is_cancelled());
    }
}
