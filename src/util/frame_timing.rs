use web_time::{Duration, Instant};

/// Longest step handed to the camera, so a stalled frame does not teleport
/// it.
const MAX_DT: f32 = 0.1;

/// How often the smoothed FPS is logged.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Per-frame delta time with a smoothed FPS estimate.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time the FPS was logged
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Start timing from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,
        }
    }

    /// Call once per frame. Returns the seconds since the previous call,
    /// capped at [`MAX_DT`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            log::debug!("{:.1} fps", self.smoothed_fps);
            self.last_report = now;
        }

        frame_time.min(MAX_DT)
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_is_capped() {
        let mut timing = FrameTiming::new();
        timing.last_frame -= Duration::from_secs(2);
        let dt = timing.tick();
        assert_eq!(dt, MAX_DT);
        let dt = timing.tick();
        assert!((0.0..MAX_DT).contains(&dt));
    }

    #[test]
    fn fps_moves_toward_frame_rate() {
        let mut timing = FrameTiming::new();
        timing.last_frame -= Duration::from_millis(100);
        let _ = timing.tick();
        assert!(timing.fps() < 60.0);
    }
}
