use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::payload::TimerConfig;
use crate::runtime::{TickId, TickSchedule};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("Please enter a message!")]
    EmptyMessage,
    #[error("Please enter a valid duration!")]
    InvalidDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or the tick belongs to a cancelled schedule
    Ignored,
    Counting(u32),
    Expired,
}

pub fn validate(message: &str, duration_secs: u32) -> Result<(), StartError> {
    if message.trim().is_empty() {
        return Err(StartError::EmptyMessage);
    }
    if duration_secs == 0 {
        return Err(StartError::InvalidDuration);
    }
    Ok(())
}

/// Formats seconds as `MM:SS`; minutes keep growing past 99
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// The countdown state machine: `Idle -> Running -> Expired`, back to `Idle` on reset.
#[derive(Debug, Clone)]
pub struct Countdown {
    message: String,
    duration_secs: u32,
    remaining_secs: u32,
    phase: Phase,
    viewer_mode: bool,
    schedule: TickSchedule,
}

impl Countdown {
    /// Creator mode: nothing on the clock until started
    pub fn creator(message: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            message: message.into(),
            duration_secs,
            remaining_secs: 0,
            phase: Phase::Idle,
            viewer_mode: false,
            schedule: TickSchedule::new(TICK_INTERVAL),
        }
    }

    /// Viewer mode: pre-loaded from a shared link with the full duration on the clock
    pub fn viewer(config: TimerConfig) -> Self {
        Self {
            remaining_secs: config.duration_secs,
            message: config.message,
            duration_secs: config.duration_secs,
            phase: Phase::Idle,
            viewer_mode: true,
            schedule: TickSchedule::new(TICK_INTERVAL),
        }
    }

    /// Overrides the one-second cadence, for headless runs that cannot wait
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.schedule = TickSchedule::new(interval);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Expired
    }

    pub fn is_viewer_mode(&self) -> bool {
        self.viewer_mode
    }

    pub fn schedule_mut(&mut self) -> &mut TickSchedule {
        &mut self.schedule
    }

    /// Id of the tick the running countdown is waiting for
    pub fn pending_tick(&self) -> Option<TickId> {
        self.schedule.current()
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.schedule.next_due()
    }

    /// Replaces message and duration. Ignored while running; returns whether it applied.
    pub fn configure(&mut self, message: impl Into<String>, duration_secs: u32) -> bool {
        if self.is_running() {
            return false;
        }
        self.message = message.into();
        self.duration_secs = duration_secs;
        true
    }

    pub fn config(&self) -> Result<TimerConfig, StartError> {
        validate(&self.message, self.duration_secs)?;
        Ok(TimerConfig::new(self.message.clone(), self.duration_secs))
    }

    pub fn start(&mut self) -> Result<(), StartError> {
        self.start_at(Instant::now())
    }

    pub fn start_at(&mut self, now: Instant) -> Result<(), StartError> {
        validate(&self.message, self.duration_secs)?;
        if self.is_running() {
            return Ok(());
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.duration_secs;
        }
        self.phase = Phase::Running;
        let id = self.schedule.arm(now);
        info!(
            remaining = self.remaining_secs,
            viewer = self.viewer_mode,
            ?id,
            "countdown started"
        );
        Ok(())
    }

    pub fn on_tick(&mut self, id: TickId) -> TickOutcome {
        if !self.is_running() || !self.schedule.is_current(id) {
            debug!(?id, phase = %self.phase, "ignoring stale tick");
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.schedule.cancel();
            self.phase = Phase::Expired;
            info!("countdown expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(self.remaining_secs)
        }
    }

    /// Stops the countdown. Viewer mode puts the full duration back on the
    /// clock since the link can be replayed; creator mode clears it.
    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.phase = Phase::Idle;
        self.remaining_secs = if self.viewer_mode {
            self.duration_secs
        } else {
            0
        };
        debug!(remaining = self.remaining_secs, "countdown reset");
    }

    /// Seconds to show on the clock face
    pub fn display_secs(&self) -> u32 {
        if self.remaining_secs > 0 {
            self.remaining_secs
        } else if self.viewer_mode {
            self.duration_secs
        } else {
            0
        }
    }

    pub fn display_time(&self) -> String {
        format_time(self.display_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(countdown: &mut Countdown, n: usize) -> TickOutcome {
        let mut last = TickOutcome::Ignored;
        for _ in 0..n {
            let id = countdown.pending_tick().expect("countdown should be ticking");
            last = countdown.on_tick(id);
        }
        last
    }

    #[test]
    fn start_rejects_empty_message() {
        let mut countdown = Countdown::creator("", 10);
        assert_eq!(countdown.start(), Err(StartError::EmptyMessage));
        assert_eq!(countdown.phase(), Phase::Idle);
        assert_eq!(countdown.remaining_secs(), 0);
        assert!(countdown.pending_tick().is_none());
    }

    #[test]
    fn start_rejects_whitespace_message() {
        let mut countdown = Countdown::creator("  \n\t", 10);
        assert_eq!(countdown.start(), Err(StartError::EmptyMessage));
        assert_eq!(countdown.phase(), Phase::Idle);
    }

    #[test]
    fn start_rejects_zero_duration() {
        let mut countdown = Countdown::creator("Hi", 0);
        assert_eq!(countdown.start(), Err(StartError::InvalidDuration));
        assert_eq!(countdown.phase(), Phase::Idle);
        assert!(countdown.pending_tick().is_none());
    }

    #[test]
    fn start_loads_duration_and_arms_schedule() {
        let mut countdown = Countdown::creator("Hi", 5);
        countdown.start().unwrap();
        assert_eq!(countdown.phase(), Phase::Running);
        assert_eq!(countdown.remaining_secs(), 5);
        assert!(countdown.pending_tick().is_some());
    }

    #[test]
    fn five_ticks_expire_a_five_second_countdown() {
        let mut countdown = Countdown::creator("Hi", 5);
        countdown.start().unwrap();

        assert_eq!(run_ticks(&mut countdown, 4), TickOutcome::Counting(1));
        assert!(countdown.is_running());

        assert_eq!(run_ticks(&mut countdown, 1), TickOutcome::Expired);
        assert_eq!(countdown.phase(), Phase::Expired);
        assert_eq!(countdown.remaining_secs(), 0);
        assert!(countdown.next_tick().is_none());
        assert!(countdown.pending_tick().is_none());
    }

    #[test]
    fn ticks_after_expiry_are_ignored() {
        let mut countdown = Countdown::creator("Hi", 1);
        countdown.start().unwrap();
        let id = countdown.pending_tick().unwrap();
        assert_eq!(countdown.on_tick(id), TickOutcome::Expired);
        assert_eq!(countdown.on_tick(id), TickOutcome::Ignored);
        assert_eq!(countdown.remaining_secs(), 0);
    }

    #[test]
    fn reset_in_viewer_mode_restores_full_duration() {
        let mut countdown = Countdown::viewer(TimerConfig::new("Surprise", 10));
        countdown.start().unwrap();
        run_ticks(&mut countdown, 3);
        assert_eq!(countdown.remaining_secs(), 7);

        countdown.reset();
        assert_eq!(countdown.phase(), Phase::Idle);
        assert_eq!(countdown.remaining_secs(), 10);
        assert!(countdown.next_tick().is_none());
    }

    #[test]
    fn reset_in_creator_mode_clears_remaining() {
        let mut countdown = Countdown::creator("Hi", 10);
        countdown.start().unwrap();
        run_ticks(&mut countdown, 3);

        countdown.reset();
        assert_eq!(countdown.phase(), Phase::Idle);
        assert_eq!(countdown.remaining_secs(), 0);
        assert!(countdown.next_tick().is_none());
    }

    #[test]
    fn stale_tick_after_reset_is_a_no_op() {
        let mut countdown = Countdown::creator("Hi", 10);
        countdown.start().unwrap();
        let stale = countdown.pending_tick().unwrap();

        countdown.reset();
        assert_eq!(countdown.on_tick(stale), TickOutcome::Ignored);

        countdown.start().unwrap();
        assert_eq!(countdown.on_tick(stale), TickOutcome::Ignored);
        assert_eq!(countdown.remaining_secs(), 10);

        let fresh = countdown.pending_tick().unwrap();
        assert_eq!(countdown.on_tick(fresh), TickOutcome::Counting(9));
    }

    #[test]
    fn start_while_running_keeps_schedule() {
        let mut countdown = Countdown::creator("Hi", 10);
        countdown.start().unwrap();
        let id = countdown.pending_tick().unwrap();
        countdown.start().unwrap();
        assert_eq!(countdown.pending_tick(), Some(id));
    }

    #[test]
    fn restart_after_expiry_reloads_duration() {
        let mut countdown = Countdown::creator("Hi", 2);
        countdown.start().unwrap();
        run_ticks(&mut countdown, 2);
        assert!(countdown.is_expired());

        countdown.start().unwrap();
        assert!(countdown.is_running());
        assert_eq!(countdown.remaining_secs(), 2);
    }

    #[test]
    fn configure_is_ignored_while_running() {
        let mut countdown = Countdown::creator("Hi", 10);
        countdown.start().unwrap();
        assert!(!countdown.configure("changed", 99));
        assert_eq!(countdown.message(), "Hi");
        assert_eq!(countdown.duration_secs(), 10);

        countdown.reset();
        assert!(countdown.configure("changed", 99));
        assert_eq!(countdown.message(), "changed");
    }

    #[test]
    fn viewer_starts_with_full_duration() {
        let countdown = Countdown::viewer(TimerConfig::new("Hi", 10));
        assert!(countdown.is_viewer_mode());
        assert_eq!(countdown.remaining_secs(), 10);
        assert_eq!(countdown.message(), "Hi");
        assert_eq!(countdown.phase(), Phase::Idle);
    }

    #[test]
    fn display_time_follows_mode() {
        let creator = Countdown::creator("Hi", 90);
        assert_eq!(creator.display_time(), "00:00");

        let mut viewer = Countdown::viewer(TimerConfig::new("Hi", 90));
        assert_eq!(viewer.display_time(), "01:30");
        viewer.start().unwrap();
        let id = viewer.pending_tick().unwrap();
        viewer.on_tick(id);
        assert_eq!(viewer.display_time(), "01:29");
    }

    #[test]
    fn format_time_pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(5), "00:05");
        assert_eq!(format_time(61), "01:01");
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn config_requires_valid_inputs() {
        assert_eq!(
            Countdown::creator("Hi", 3).config(),
            Ok(TimerConfig::new("Hi", 3))
        );
        assert_eq!(
            Countdown::creator("", 3).config(),
            Err(StartError::EmptyMessage)
        );
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(Phase::Idle.to_string(), "Idle");
        assert_eq!(Phase::Running.to_string(), "Running");
        assert_eq!(Phase::Expired.to_string(), "Expired");
    }
}
