use std::time::Instant;

/// Delta-time clock for frame pacing. Each tick returns the seconds elapsed
/// since the previous tick and advances the clock.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolling frame-timing estimate rendered as a diagnostic string.
///
/// The deltas are smoothed with an exponential moving average so a single
/// slow frame does not whipsaw the readout. The string is empty until the
/// first update.
#[derive(Debug)]
pub struct FrameStats {
    width: u32,
    height: u32,
    smoothed_delta: f32,
    text: String,
}

impl FrameStats {
    const SMOOTHING: f32 = 0.05;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            smoothed_delta: 0.0,
            text: String::new(),
        }
    }

    /// Fold one frame delta (seconds) into the estimate and rebuild the text.
    pub fn update(&mut self, delta: f32) {
        self.smoothed_delta = if self.smoothed_delta == 0.0 {
            delta
        } else {
            self.smoothed_delta * (1.0 - Self::SMOOTHING) + delta * Self::SMOOTHING
        };

        let fps = self.fps();
        self.text = format!(
            "{:.3} ms/frame ({:.0} FPS) ({}x{})",
            self.smoothed_delta * 1000.0,
            fps,
            self.width,
            self.height,
        );
    }

    pub fn fps(&self) -> f32 {
        if self.smoothed_delta > 0.0 {
            1.0 / self.smoothed_delta
        } else {
            0.0
        }
    }

    /// Most recently computed statistics string; empty before any update.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_delta() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();
        assert!(delta >= 0.009 && delta <= 0.050);
    }

    #[test]
    fn clock_advances_between_ticks() {
        let mut clock = FrameClock::new();
        let _ = clock.tick();
        let second = clock.tick();
        // Back-to-back ticks see almost no elapsed time.
        assert!(second < 0.005);
    }

    #[test]
    fn stats_empty_before_first_update() {
        let stats = FrameStats::new(800, 600);
        assert_eq!(stats.text(), "");
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn stats_text_carries_timing_and_resolution() {
        let mut stats = FrameStats::new(800, 600);
        stats.update(1.0 / 60.0);
        let text = stats.text().to_string();
        assert!(text.contains("ms/frame"));
        assert!(text.contains("60 FPS"));
        assert!(text.contains("(800x600)"));
    }

    #[test]
    fn stats_smooths_outliers() {
        let mut stats = FrameStats::new(100, 100);
        for _ in 0..100 {
            stats.update(1.0 / 60.0);
        }
        stats.update(0.5); // one hitch
        // Estimate stays near 60 FPS rather than collapsing to 2 FPS.
        assert!(stats.fps() > 20.0);
    }
}
