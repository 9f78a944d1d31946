//! Animation and Warp Timing
//!
//! Time sources, the per-frame clock and the warp transition curve. The warp
//! is a two-state machine: `Idle`, or `Warping` since a start timestamp. While
//! warping, an ease-out quartic drives the galaxy's depth stretch and the
//! camera's field of view; reaching full progress ends the warp.

use serde::{Deserialize, Serialize};

// ============================================================================
// TIME
// ============================================================================

/// Monotonic millisecond clock.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

impl<F: Fn() -> f64> TimeSource for F {
    fn now_ms(&self) -> f64 {
        self()
    }
}

/// Wall-clock time source for the running application.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

/// Elapsed time since the explorer started.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start_ms: f64,
}

impl FrameClock {
    pub fn new(now_ms: f64) -> Self {
        Self { start_ms: now_ms }
    }

    /// Seconds since start, never negative.
    pub fn elapsed_seconds(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms).max(0.0) / 1000.0) as f32
    }
}

// ============================================================================
// WARP
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Length of the transition in milliseconds.
    pub duration_ms: f64,
    /// Extra depth scale at full progress (scale = 1 + eased * stretch).
    pub depth_stretch: f32,
    /// Degrees added to the field of view at full progress.
    pub fov_widen: f32,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1500.0,
            depth_stretch: 25.0,
            fov_widen: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum WarpState {
    #[default]
    Idle,
    Warping {
        start_ms: f64,
    },
}

impl WarpState {
    pub fn is_warping(&self) -> bool {
        matches!(self, WarpState::Warping { .. })
    }

    /// Raw progress at `now_ms` (0 at start, 1 at the end, unclamped above).
    /// `None` when idle.
    pub fn progress(&self, now_ms: f64, duration_ms: f64) -> Option<f32> {
        match *self {
            WarpState::Idle => None,
            WarpState::Warping { start_ms } => {
                let duration = duration_ms.max(f64::EPSILON);
                Some(((now_ms - start_ms) / duration).max(0.0) as f32)
            }
        }
    }
}

/// `1 - (1 - t)^4`, fast start and gentle finish.
pub fn ease_out_quart(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// Visual state of the warp at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpEffect {
    /// Galaxy scale along the depth (Z) axis.
    pub depth_scale: f32,
    /// Camera field of view in degrees.
    pub fov: f32,
}

impl WarpEffect {
    /// The resting state.
    pub fn rest(base_fov: f32) -> Self {
        Self {
            depth_scale: 1.0,
            fov: base_fov,
        }
    }

    /// Effect at raw progress `t`. At or beyond 1 the warp is over and the
    /// rest state applies.
    pub fn at(t: f32, base_fov: f32, config: &WarpConfig) -> Self {
        if t >= 1.0 {
            return Self::rest(base_fov);
        }
        let eased = ease_out_quart(t);
        Self {
            depth_scale: 1.0 + eased * config.depth_stretch,
            fov: base_fov + eased * config.fov_widen,
        }
    }
}

// ============================================================================
// FRAME REPORT
// ============================================================================

/// What one frame tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Seconds since the explorer started (the disk shader time).
    pub elapsed: f32,
    /// Raw warp progress this frame, if warping.
    pub warp_progress: Option<f32>,
    /// The warp ended this frame.
    pub warp_finished: bool,
    /// Point count of a galaxy regenerated this frame.
    pub regenerated: Option<u32>,
}
