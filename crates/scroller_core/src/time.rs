use std::time::Instant;

/// Largest step the simulation accepts; longer frames are clamped to this.
pub const DEFAULT_MAX_DT: f32 = 1.0 / 30.0;

const FPS_SAMPLE_COUNT: usize = 60;

/// Turn a raw wall-clock delta into a usable step: non-finite or negative
/// values become zero, anything above `max_dt` is capped.
pub fn sanitize_dt(raw_dt: f64, max_dt: f32) -> f32 {
    if !raw_dt.is_finite() || raw_dt < 0.0 {
        log::warn!("Discarding degenerate frame delta {raw_dt}");
        return 0.0;
    }
    let dt = raw_dt as f32;
    if dt > max_dt {
        log::debug!(
            "Frame took {:.1}ms, clamping step to {:.1}ms",
            dt * 1000.0,
            max_dt * 1000.0
        );
        return max_dt;
    }
    dt
}

/// Measures wall-clock deltas between frames for real-time drivers.
pub struct FrameClock {
    pub max_dt: f32,
    pub total_time: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt,
            total_time: 0.0,
            frame_count: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the time since the previous call and return the clamped step.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.record(self.real_dt)
    }

    fn record(&mut self, real_dt: f64) -> f32 {
        let dt = sanitize_dt(real_dt, self.max_dt);
        self.total_time += dt as f64;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = real_dt.max(0.0);
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_passes_normal_steps() {
        assert!((sanitize_dt(1.0 / 60.0, DEFAULT_MAX_DT) - 1.0 / 60.0).abs() < 1e-7);
        assert_eq!(sanitize_dt(0.0, DEFAULT_MAX_DT), 0.0);
    }

    #[test]
    fn sanitize_clamps_long_frames() {
        assert_eq!(sanitize_dt(0.5, DEFAULT_MAX_DT), DEFAULT_MAX_DT);
        assert_eq!(sanitize_dt(f64::INFINITY, DEFAULT_MAX_DT), 0.0);
    }

    #[test]
    fn sanitize_zeroes_degenerate_deltas() {
        assert_eq!(sanitize_dt(-0.01, DEFAULT_MAX_DT), 0.0);
        assert_eq!(sanitize_dt(f64::NAN, DEFAULT_MAX_DT), 0.0);
        assert_eq!(sanitize_dt(f64::NEG_INFINITY, DEFAULT_MAX_DT), 0.0);
    }

    #[test]
    fn record_accumulates_clamped_time() {
        let mut clock = FrameClock::default();
        let dt = clock.record(2.0);
        assert_eq!(dt, DEFAULT_MAX_DT);
        clock.record(f64::NAN);
        assert_eq!(clock.frame_count, 2);
        assert!((clock.total_time - DEFAULT_MAX_DT as f64).abs() < 1e-9);
    }

    #[test]
    fn begin_frame_never_exceeds_max() {
        let mut clock = FrameClock::new(0.02);
        for _ in 0..3 {
            let dt = clock.begin_frame();
            assert!((0.0..=0.02).contains(&dt));
        }
    }
}
