//! Per-question countdown timer
//!
//! The timer counts a question's configured duration down one second at a
//! time. It never owns a thread: ticks are alarms the caller schedules
//! through a closure and routes back in, the same cooperative shape the
//! rest of the game uses for timed events. Each scheduled tick carries the
//! generation it was scheduled under; pausing, submitting, or expiring
//! bumps the generation, so a tick that was already in flight when the
//! state changed arrives stale and is dropped instead of mutating state
//! after logical completion.
//!
//! The timer is scoped to a single question. When the question's flow
//! completes, the owner drops it; any still-scheduled tick has nowhere to
//! be routed and dies with it.

use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Duration;

use crate::constants::timer::TICK_SECONDS;

/// The phases of a question timer
///
/// `Expired` is the answer-reveal signal: it is reached either by the
/// countdown hitting zero or by a manual answer submission, and the
/// presentation layer treats both the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Counting down, one tick per second
    Running,
    /// Frozen at the current remaining time
    Paused,
    /// Countdown finished or answer submitted; reveal the answer
    Expired,
}

/// Alarm messages scheduled by the timer and routed back by the caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// A one-second countdown tick
    Tick {
        /// Generation the tick was scheduled under; stale ticks are dropped
        generation: u64,
    },
}

/// A countdown clock for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionTimer {
    /// Whole seconds left on the clock
    remaining: u64,
    phase: Phase,
    /// Bumped on every transition that must cancel in-flight ticks
    generation: u64,
}

impl QuestionTimer {
    /// Starts a running timer and schedules its first tick
    ///
    /// # Arguments
    ///
    /// * `duration` - Time on the clock; the game clamps this to its
    ///   configured bounds before constructing the timer
    /// * `schedule` - Callback that arranges for the alarm to be routed
    ///   back to [`QuestionTimer::receive_alarm`] after the given delay
    pub fn start<S: FnMut(AlarmMessage, Duration)>(duration: Duration, mut schedule: S) -> Self {
        let timer = Self {
            remaining: duration.as_secs(),
            phase: Phase::Running,
            generation: 0,
        };
        timer.schedule_tick(&mut schedule);
        timer
    }

    /// Schedules the next tick under the current generation
    fn schedule_tick<S: FnMut(AlarmMessage, Duration)>(&self, schedule: &mut S) {
        schedule(
            AlarmMessage::Tick {
                generation: self.generation,
            },
            Duration::from_secs(TICK_SECONDS),
        );
    }

    /// Handles a tick alarm coming back from the scheduler
    ///
    /// A tick only counts if the timer is still running and the tick's
    /// generation matches the current one; anything else is a stale alarm
    /// from before a pause or submission and is dropped.
    ///
    /// # Returns
    ///
    /// `true` exactly when this tick drove the countdown to zero, which the
    /// caller treats as an implicit answer submission.
    pub fn receive_alarm<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        mut schedule: S,
    ) -> bool {
        let AlarmMessage::Tick { generation } = message;
        if self.phase != Phase::Running || generation != self.generation {
            debug!(
                tick_generation = generation,
                current_generation = self.generation,
                phase = ?self.phase,
                "dropping stale timer tick"
            );
            return false;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.generation += 1;
            self.phase = Phase::Expired;
            true
        } else {
            self.schedule_tick(&mut schedule);
            false
        }
    }

    /// Freezes the countdown at the current remaining time
    ///
    /// Cancels any in-flight tick. No-op unless the timer is running.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.generation += 1;
            self.phase = Phase::Paused;
        }
    }

    /// Continues a paused countdown from its frozen remaining time
    ///
    /// No-op unless the timer is paused.
    pub fn resume<S: FnMut(AlarmMessage, Duration)>(&mut self, mut schedule: S) {
        if self.phase == Phase::Paused {
            self.generation += 1;
            self.phase = Phase::Running;
            self.schedule_tick(&mut schedule);
        }
    }

    /// Stops the countdown for a manual answer reveal
    ///
    /// Valid from both `Running` and `Paused`; cancels any in-flight tick
    /// and moves straight to `Expired` regardless of remaining time.
    pub fn submit_answer(&mut self) {
        if self.phase != Phase::Expired {
            self.generation += 1;
            self.phase = Phase::Expired;
        }
    }

    /// Whole seconds left on the clock
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the timer has reached the answer-reveal state
    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Expired
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    /// Drives a timer the way a scheduler would: alarms land in a queue and
    /// are fed back in order.
    fn drive(timer: &mut QuestionTimer, queue: &mut Vec<AlarmMessage>, ticks: usize) -> bool {
        for _ in 0..ticks {
            let Some(message) = queue.pop() else {
                return false;
            };
            let expired = timer.receive_alarm(message, |m, _| queue.push(m));
            if expired {
                return true;
            }
        }
        false
    }

    fn start(seconds: u64) -> (QuestionTimer, Vec<AlarmMessage>) {
        let mut queue = Vec::new();
        let timer = QuestionTimer::start(Duration::from_secs(seconds), |m, _| queue.push(m));
        (timer, queue)
    }

    #[test]
    fn test_counts_down_to_expiry() {
        let (mut timer, mut queue) = start(3);
        assert_eq!(timer.phase(), Phase::Running);
        assert_eq!(timer.remaining(), 3);

        assert!(!drive(&mut timer, &mut queue, 2));
        assert_eq!(timer.remaining(), 1);

        assert!(drive(&mut timer, &mut queue, 1));
        assert_eq!(timer.remaining(), 0);
        assert!(timer.is_expired());
        // no further tick was scheduled
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pause_freezes_and_cancels_inflight_tick() {
        let (mut timer, mut queue) = start(10);
        drive(&mut timer, &mut queue, 3);
        assert_eq!(timer.remaining(), 7);

        // a tick is already scheduled; pausing must make it stale
        timer.pause();
        assert_eq!(timer.phase(), Phase::Paused);

        assert!(!drive(&mut timer, &mut queue, 1));
        assert_eq!(timer.remaining(), 7);
        assert_eq!(timer.phase(), Phase::Paused);
    }

    #[test]
    fn test_resume_continues_from_frozen_remaining() {
        let (mut timer, mut queue) = start(10);
        drive(&mut timer, &mut queue, 4);
        timer.pause();
        queue.clear();

        timer.resume(|m, _| queue.push(m));
        assert_eq!(timer.phase(), Phase::Running);
        assert_eq!(timer.remaining(), 6);

        drive(&mut timer, &mut queue, 1);
        assert_eq!(timer.remaining(), 5);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let (mut timer, mut queue) = start(5);
        let before = queue.len();
        timer.resume(|m, _| queue.push(m));
        assert_eq!(queue.len(), before);

        timer.submit_answer();
        timer.resume(|m, _| queue.push(m));
        assert!(timer.is_expired());
    }

    #[test]
    fn test_submit_from_running() {
        let (mut timer, mut queue) = start(10);
        drive(&mut timer, &mut queue, 2);

        timer.submit_answer();
        assert!(timer.is_expired());

        // the tick that was in flight at submission time is stale
        assert!(!drive(&mut timer, &mut queue, 1));
        assert_eq!(timer.remaining(), 8);
    }

    #[test]
    fn test_submit_from_paused() {
        let (mut timer, mut queue) = start(10);
        drive(&mut timer, &mut queue, 1);
        timer.pause();

        timer.submit_answer();
        assert!(timer.is_expired());
    }

    #[test]
    fn test_pause_after_expiry_is_noop() {
        let (mut timer, mut queue) = start(1);
        assert!(drive(&mut timer, &mut queue, 1));

        timer.pause();
        assert!(timer.is_expired());
    }
}
