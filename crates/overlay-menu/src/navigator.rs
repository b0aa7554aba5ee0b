//! Held-key repeat with acceleration.
//!
//! Each direction runs its own small state machine, advanced once per tick
//! with the direction's held state and the current time:
//!
//! - first tick held: step immediately
//! - still held: step whenever more than `delay` ms passed since the last
//!   step, then tighten `delay` according to the [`RepeatSchedule`]
//! - released: forget everything
//!
//! Delays only ever shrink while a key stays held.

use serde::{Deserialize, Serialize};

use overlay_menu_core::logging::targets;

use crate::input::Direction;

/// Once more than `after_steps` repeats happened, wait at most `delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatThreshold {
    pub after_steps: u32,
    pub delay_ms: u64,
}

/// The acceleration curve of held-key repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatSchedule {
    /// Wait before the first repeat.
    pub initial_delay_ms: u64,
    /// Tighter waits unlocked by repeat count.
    pub thresholds: Vec<RepeatThreshold>,
}

impl Default for RepeatSchedule {
    fn default() -> Self {
        Self {
            initial_delay_ms: 200,
            thresholds: vec![
                RepeatThreshold {
                    after_steps: 2,
                    delay_ms: 150,
                },
                RepeatThreshold {
                    after_steps: 5,
                    delay_ms: 100,
                },
                RepeatThreshold {
                    after_steps: 25,
                    delay_ms: 50,
                },
                RepeatThreshold {
                    after_steps: 60,
                    delay_ms: 25,
                },
            ],
        }
    }
}

impl RepeatSchedule {
    /// The delay in effect after `steps` repeats.
    ///
    /// Every crossed threshold is a floor, so the tightest one wins even if
    /// the list is not sorted.
    pub fn delay_after(&self, steps: u32) -> u64 {
        self.thresholds
            .iter()
            .filter(|threshold| steps > threshold.after_steps)
            .map(|threshold| threshold.delay_ms)
            .fold(self.initial_delay_ms, u64::min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HoldState {
    #[default]
    Idle,
    Held {
        last_step_ms: u64,
        steps: u32,
        delay_ms: u64,
    },
    /// Held across a cancel; ignored until released.
    Suppressed,
}

/// Per-direction repeat state.
#[derive(Debug, Clone, Default)]
pub struct RepeatNavigator {
    schedule: RepeatSchedule,
    states: [HoldState; 4],
}

impl RepeatNavigator {
    /// Create a navigator using `schedule`.
    pub fn new(schedule: RepeatSchedule) -> Self {
        Self {
            schedule,
            states: [HoldState::Idle; 4],
        }
    }

    /// The acceleration curve.
    pub fn schedule(&self) -> &RepeatSchedule {
        &self.schedule
    }

    /// Advance `direction` to `now_ms`. Returns `true` if a navigation step
    /// is due this tick.
    pub fn update(&mut self, direction: Direction, held: bool, now_ms: u64) -> bool {
        let state = &mut self.states[direction.slot()];
        if !held {
            if matches!(state, HoldState::Held { .. }) {
                tracing::trace!(target: targets::REPEAT, ?direction, "released");
            }
            *state = HoldState::Idle;
            return false;
        }

        match state {
            HoldState::Suppressed => false,
            HoldState::Idle => {
                *state = HoldState::Held {
                    last_step_ms: now_ms,
                    steps: 0,
                    delay_ms: self.schedule.initial_delay_ms,
                };
                tracing::trace!(target: targets::REPEAT, ?direction, "pressed");
                true
            }
            HoldState::Held {
                last_step_ms,
                steps,
                delay_ms,
            } => {
                if now_ms.saturating_sub(*last_step_ms) <= *delay_ms {
                    return false;
                }
                *steps += 1;
                *last_step_ms = now_ms;
                *delay_ms = (*delay_ms).min(self.schedule.delay_after(*steps));
                tracing::trace!(
                    target: targets::REPEAT,
                    ?direction,
                    steps = *steps,
                    delay_ms = *delay_ms,
                    "repeat"
                );
                true
            }
        }
    }

    /// Stop every running repeat. Keys still held stay ignored until they
    /// are released and pressed again.
    pub fn cancel(&mut self) {
        for state in &mut self.states {
            if *state != HoldState::Idle {
                *state = HoldState::Suppressed;
            }
        }
    }

    /// Ignore every direction until it is next seen released, whether or not
    /// it was repeating.
    pub fn suppress_all(&mut self) {
        self.states = [HoldState::Suppressed; 4];
    }

    /// Forget all state, including suppressed keys.
    pub fn reset(&mut self) {
        self.states = [HoldState::Idle; 4];
    }

    /// Whether `direction` is currently repeating.
    pub fn is_repeating(&self, direction: Direction) -> bool {
        matches!(self.states[direction.slot()], HoldState::Held { .. })
    }

    /// Repeats taken since `direction` was pressed; the immediate first step
    /// is not counted.
    pub fn steps_taken(&self, direction: Direction) -> Option<u32> {
        match self.states[direction.slot()] {
            HoldState::Held { steps, .. } => Some(steps),
            _ => None,
        }
    }

    /// The wait before the next repeat of `direction`.
    pub fn current_delay(&self, direction: Direction) -> Option<u64> {
        match self.states[direction.slot()] {
            HoldState::Held { delay_ms, .. } => Some(delay_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_after_schedule() {
        let schedule = RepeatSchedule::default();
        assert_eq!(schedule.delay_after(0), 200);
        assert_eq!(schedule.delay_after(2), 200);
        assert_eq!(schedule.delay_after(3), 150);
        assert_eq!(schedule.delay_after(6), 100);
        assert_eq!(schedule.delay_after(26), 50);
        assert_eq!(schedule.delay_after(61), 25);
    }

    #[test]
    fn test_first_press_steps_immediately() {
        let mut nav = RepeatNavigator::default();
        assert!(nav.update(Direction::Down, true, 1_000));
        assert_eq!(nav.steps_taken(Direction::Down), Some(0));
        assert!(!nav.update(Direction::Down, true, 1_016));
    }

    #[test]
    fn test_repeat_needs_more_than_delay() {
        let mut nav = RepeatNavigator::default();
        nav.update(Direction::Up, true, 0);
        assert!(!nav.update(Direction::Up, true, 200));
        assert!(nav.update(Direction::Up, true, 201));
        assert_eq!(nav.steps_taken(Direction::Up), Some(1));
    }

    #[test]
    fn test_release_stops_repeat() {
        let mut nav = RepeatNavigator::default();
        nav.update(Direction::Up, true, 0);
        assert!(!nav.update(Direction::Up, false, 500));
        assert!(!nav.is_repeating(Direction::Up));
        assert!(nav.update(Direction::Up, true, 510));
        assert_eq!(nav.steps_taken(Direction::Up), Some(0));
    }

    #[test]
    fn test_directions_are_independent() {
        let mut nav = RepeatNavigator::default();
        nav.update(Direction::Left, true, 0);
        assert!(nav.update(Direction::Right, true, 100));
        assert!(nav.update(Direction::Left, true, 201));
        assert!(!nav.update(Direction::Right, true, 201));
    }

    #[test]
    fn test_cancel_suppresses_until_release() {
        let mut nav = RepeatNavigator::default();
        nav.update(Direction::Down, true, 0);
        nav.cancel();
        assert!(!nav.update(Direction::Down, true, 1_000));
        assert!(!nav.update(Direction::Down, false, 1_016));
        assert!(nav.update(Direction::Down, true, 1_032));
    }

    #[test]
    fn test_cancel_leaves_idle_keys_alone() {
        let mut nav = RepeatNavigator::default();
        nav.cancel();
        assert!(nav.update(Direction::Up, true, 0));
    }

    #[test]
    fn test_suppress_all_covers_idle_keys() {
        let mut nav = RepeatNavigator::default();
        nav.suppress_all();
        assert!(!nav.update(Direction::Up, true, 0));
        assert!(!nav.update(Direction::Down, false, 0));
        assert!(nav.update(Direction::Down, true, 16));
    }

    #[test]
    fn test_delay_never_relaxes() {
        let schedule = RepeatSchedule {
            initial_delay_ms: 100,
            thresholds: vec![RepeatThreshold {
                after_steps: 1,
                delay_ms: 300,
            }],
        };
        let mut nav = RepeatNavigator::new(schedule);
        nav.update(Direction::Down, true, 0);
        nav.update(Direction::Down, true, 101);
        nav.update(Direction::Down, true, 202);
        assert_eq!(nav.current_delay(Direction::Down), Some(100));
    }
}
