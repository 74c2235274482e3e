use instant::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Frame delta timing with a periodic frames-per-second sample.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
    window_start: Instant,
    frames: u32,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            last: now,
            window_start: now,
            frames: 0,
        }
    }

    /// Record a frame at `now`. Returns the delta since the previous frame and,
    /// once per reporting interval, the average rate over that interval.
    pub fn tick(&mut self, now: Instant) -> (Duration, Option<f32>) {
        let dt = now.duration_since(self.last);
        self.last = now;
        self.frames += 1;
        let window = now.duration_since(self.window_start);
        if window < REPORT_INTERVAL {
            return (dt, None);
        }
        let fps = self.frames as f32 / window.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        (dt, Some(fps))
    }
}
