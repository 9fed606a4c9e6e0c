// Idle eye blinking: a two-state machine driven only by elapsed time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::avatar::expression::{BLINK, ExpressionManager};
use crate::settings::BlinkSettings;

/// Source of the random part of the idle interval. Must return values in `[0, 1)`.
pub trait BlinkJitter {
    fn unit(&mut self) -> f32;
}

pub struct RandomJitter(StdRng);

impl RandomJitter {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl BlinkJitter for RandomJitter {
    fn unit(&mut self) -> f32 {
        self.0.gen_range(0.0..1.0)
    }
}

/// Always returns the same fraction; for pinning blink timing.
pub struct FixedJitter(pub f32);

impl BlinkJitter for FixedJitter {
    fn unit(&mut self) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Idle,
    Blinking,
}

/// Clock fields are `f64`: per-frame deltas summed in `f32` stop advancing
/// after a few days of uptime.
#[derive(Debug, Clone, PartialEq)]
pub struct BlinkState {
    pub elapsed: f64,
    pub next_blink_at: f64,
    pub is_blinking: bool,
    pub blink_started_at: f64,
    pub blink_duration: f32,
}

pub struct BlinkController {
    state: BlinkState,
    min_interval: f32,
    interval_jitter: f32,
    jitter: Box<dyn BlinkJitter>,
}

impl BlinkController {
    pub fn new(settings: &BlinkSettings, jitter: Box<dyn BlinkJitter>) -> Self {
        let mut controller = Self {
            state: BlinkState {
                elapsed: 0.0,
                next_blink_at: 0.0,
                is_blinking: false,
                blink_started_at: 0.0,
                blink_duration: settings.duration,
            },
            min_interval: settings.min_interval,
            interval_jitter: settings.interval_jitter,
            jitter,
        };
        controller.reschedule();
        controller
    }

    pub fn state(&self) -> &BlinkState {
        &self.state
    }

    pub fn phase(&self) -> BlinkPhase {
        if self.state.is_blinking {
            BlinkPhase::Blinking
        } else {
            BlinkPhase::Idle
        }
    }

    /// Open the eyes and start a fresh idle interval, e.g. when a new character arrives.
    pub fn reset(&mut self, expressions: &mut ExpressionManager) {
        if self.state.is_blinking {
            self.state.is_blinking = false;
            expressions.set_value(BLINK, 0.0);
        }
        self.reschedule();
    }

    /// Schedule the next blink relative to now and return the chosen interval.
    pub fn reschedule(&mut self) -> f32 {
        let unit = self.jitter.unit().clamp(0.0, 1.0 - f32::EPSILON);
        let interval = self.min_interval + unit * self.interval_jitter;
        self.state.next_blink_at = self.state.elapsed + f64::from(interval);
        interval
    }

    /// Advance by `delta` seconds. Returns the phase entered, if a transition happened.
    pub fn step(&mut self, delta: f32, expressions: &mut ExpressionManager) -> Option<BlinkPhase> {
        self.state.elapsed += f64::from(delta.max(0.0));

        if self.state.is_blinking {
            let held = self.state.elapsed - self.state.blink_started_at;
            if held > f64::from(self.state.blink_duration) {
                expressions.set_value(BLINK, 0.0);
                self.state.is_blinking = false;
                self.reschedule();
                return Some(BlinkPhase::Idle);
            }
        } else if self.state.elapsed > self.state.next_blink_at {
            self.state.is_blinking = true;
            self.state.blink_started_at = self.state.elapsed;
            expressions.set_value(BLINK, 1.0);
            return Some(BlinkPhase::Blinking);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(unit: f32) -> BlinkController {
        BlinkController::new(&BlinkSettings::default(), Box::new(FixedJitter(unit)))
    }

    #[test]
    fn first_blink_is_scheduled_in_the_future() {
        let c = controller(0.5);
        assert_eq!(c.state().next_blink_at, 6.0);
        assert_eq!(c.phase(), BlinkPhase::Idle);
    }

    #[test]
    fn blink_closes_then_opens_after_duration() {
        let mut c = controller(0.0);
        let mut e = ExpressionManager::new([BLINK]);

        assert_eq!(c.step(2.0, &mut e), None);
        assert_eq!(c.step(0.1, &mut e), Some(BlinkPhase::Blinking));
        assert_eq!(e.value(BLINK), Some(1.0));
        assert_eq!(c.state().blink_started_at, c.state().elapsed);

        assert_eq!(c.step(0.1, &mut e), None);
        assert_eq!(e.value(BLINK), Some(1.0));
        assert_eq!(c.step(0.1, &mut e), Some(BlinkPhase::Idle));
        assert_eq!(e.value(BLINK), Some(0.0));

        let s = c.state();
        assert!((s.next_blink_at - s.elapsed - 2.0).abs() < 1e-5);
    }

    #[test]
    fn missing_blink_channel_does_not_stop_the_machine() {
        let mut c = controller(0.0);
        let mut e = ExpressionManager::default();
        assert_eq!(c.step(2.5, &mut e), Some(BlinkPhase::Blinking));
        assert_eq!(c.step(0.5, &mut e), Some(BlinkPhase::Idle));
    }

    #[test]
    fn jitter_of_one_stays_below_upper_bound() {
        let mut c = controller(1.0);
        let interval = c.reschedule();
        assert!(interval < 10.0);
        assert!(interval >= 2.0);
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let mut a = RandomJitter::seeded(7);
        let mut b = RandomJitter::seeded(7);
        for _ in 0..16 {
            let x = a.unit();
            assert_eq!(x, b.unit());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn reset_opens_the_eyes_and_reschedules() {
        let mut c = controller(0.25);
        let mut e = ExpressionManager::new([BLINK]);
        c.step(4.5, &mut e);
        assert_eq!(c.phase(), BlinkPhase::Blinking);

        c.reset(&mut e);
        assert_eq!(c.phase(), BlinkPhase::Idle);
        assert_eq!(e.value(BLINK), Some(0.0));
        assert!((c.state().next_blink_at - 8.5).abs() < 1e-5);
    }

    #[test]
    fn blinks_still_cycle_after_a_week_of_frames() {
        let mut c = controller(0.0);
        let mut e = ExpressionManager::new([BLINK]);
        // Jump to one week in, just before the scheduled blink.
        c.state.elapsed = 604_800.0;
        c.state.next_blink_at = 604_800.01;

        let frame = 1.0 / 60.0;
        let mut opened = None;
        let mut closed = None;
        for i in 0..120 {
            match c.step(frame, &mut e) {
                Some(BlinkPhase::Blinking) => opened = Some(i),
                Some(BlinkPhase::Idle) => closed = Some(i),
                None => {}
            }
        }
        let (opened, closed) = (opened.unwrap(), closed.unwrap());
        // 0.15 s at 60 Hz: nine or ten frames held shut.
        assert!((9..=10).contains(&(closed - opened)));
        assert_eq!(e.value(BLINK), Some(0.0));
        assert!(c.state().elapsed > 604_801.9);
    }
}
