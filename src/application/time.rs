//! Timing and stepping of the frame loop.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeParams {
    /// If fps goes lower than this, time will appear to slow. 0 disables it.
    pub min_fps: u32,
    /// The loop sleeps if fps is higher than this. 0 disables it.
    pub max_fps: u32,
    /// Maximum frames per second when the window does not have input focus.
    pub max_inactive_fps: u32,
    /// How many frames to average for timestep smoothing.
    pub smoothing_step: u32,
}

impl Default for TimeParams {
    fn default() -> Self {
        TimeParams {
            min_fps: 0,
            max_fps: 60,
            max_inactive_fps: 0,
            smoothing_step: 0,
        }
    }
}

pub struct FrameTimer {
    params: TimeParams,
    timestep: Duration,
    previous_timesteps: VecDeque<Duration>,
    last_frame_timepoint: Instant,
}

impl FrameTimer {
    pub fn new(params: TimeParams) -> Self {
        FrameTimer {
            params,
            timestep: Duration::new(0, 0),
            previous_timesteps: VecDeque::new(),
            last_frame_timepoint: Instant::now(),
        }
    }

    #[inline]
    pub fn params(&self) -> TimeParams {
        self.params
    }

    #[inline]
    pub fn set_min_fps(&mut self, fps: u32) {
        self.params.min_fps = fps;
    }

    #[inline]
    pub fn set_max_fps(&mut self, fps: u32) {
        self.params.max_fps = fps;
    }

    #[inline]
    pub fn set_max_inactive_fps(&mut self, fps: u32) {
        self.params.max_inactive_fps = fps;
    }

    #[inline]
    pub fn set_smoothing_step(&mut self, step: u32) {
        self.params.smoothing_step = step;
    }

    /// Waits until the frame rate cap allows a new frame, then returns the
    /// timestep of the frame.
    pub fn advance(&mut self, focused: bool) -> Duration {
        let cap = if !focused && self.params.max_inactive_fps > 0 {
            self.params.max_inactive_fps
        } else {
            self.params.max_fps
        };

        // Cooperatively gives up a timeslice to the OS scheduler while waiting.
        if cap > 0 {
            let td = Duration::from_millis(u64::from(1000 / cap));
            while self.last_frame_timepoint.elapsed() <= td {
                if (self.last_frame_timepoint.elapsed() + Duration::from_millis(2)) < td {
                    std::thread::sleep(Duration::from_millis(1));
                } else {
                    std::thread::yield_now();
                }
            }
        }

        let elapsed = self.last_frame_timepoint.elapsed();
        self.last_frame_timepoint = Instant::now();
        self.step(elapsed)
    }

    fn step(&mut self, mut elapsed: Duration) -> Duration {
        if self.params.min_fps > 0 {
            elapsed = elapsed.min(Duration::from_millis(u64::from(1000 / self.params.min_fps)));
        }

        let smoothing = self.params.smoothing_step as usize;
        if smoothing > 0 {
            self.previous_timesteps.push_front(elapsed);
            self.previous_timesteps.truncate(smoothing);

            let sum: Duration = self.previous_timesteps.iter().sum();
            self.timestep = sum / self.previous_timesteps.len() as u32;
        } else {
            self.timestep = elapsed;
        }

        self.timestep
    }

    /// Gets current fps.
    pub fn fps(&self) -> u32 {
        let secs = self.timestep.as_secs_f64();
        if secs > 0.0 {
            (1.0 / secs).round() as u32
        } else {
            0
        }
    }

    /// Gets the duration of last frame.
    #[inline]
    pub fn frame_duration(&self) -> Duration {
        self.timestep
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn clamp_min_fps() {
        let mut timer = FrameTimer::new(TimeParams {
            min_fps: 10,
            ..TimeParams::default()
        });

        assert_eq!(timer.step(ms(500)), ms(100));
        assert_eq!(timer.step(ms(20)), ms(20));
        assert_eq!(timer.fps(), 50);
    }

    #[test]
    fn smoothing() {
        let mut timer = FrameTimer::new(TimeParams {
            smoothing_step: 2,
            ..TimeParams::default()
        });

        assert_eq!(timer.step(ms(10)), ms(10));
        assert_eq!(timer.step(ms(30)), ms(20));
        assert_eq!(timer.step(ms(50)), ms(40));
    }

    #[test]
    fn max_fps() {
        let mut timer = FrameTimer::new(TimeParams {
            max_fps: 100,
            ..TimeParams::default()
        });

        timer.advance(true);
        assert!(timer.advance(true) >= ms(10));
    }
}
