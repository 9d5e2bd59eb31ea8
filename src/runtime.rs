use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Bracketed paste: the whole pasted text, newlines included
    Paste(String),
    /// One countdown second elapsed for the schedule identified by the id
    Tick(TickId),
    /// Nothing happened within a frame interval; time to refresh transient UI
    Frame,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(width, height)) => {
                    if tx.send(AppEvent::Resize(width, height)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Paste(text)) => {
                    if tx.send(AppEvent::Paste(text)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!("terminal event stream closed: {err}");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable frame interval
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Identifies one armed generation of a [`TickSchedule`].
///
/// Ticks carrying an id from an earlier generation are stale and must be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickId(u64);

/// A cancellable, drift-free periodic schedule.
///
/// Arming starts a new generation whose first tick is due one interval later.
/// Cancelling clears the deadline so nothing fires until the next `arm`.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    generation: u64,
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            next_due: None,
        }
    }

    pub fn arm(&mut self, now: Instant) -> TickId {
        self.generation += 1;
        self.next_due = Some(now + self.interval);
        TickId(self.generation)
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Id of the armed generation, if any
    pub fn current(&self) -> Option<TickId> {
        self.next_due.map(|_| TickId(self.generation))
    }

    pub fn is_current(&self, id: TickId) -> bool {
        self.current() == Some(id)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns the tick id when a deadline has passed and advances the
    /// deadline by exactly one interval. Overdue ticks are delivered one
    /// per call so a stalled loop catches up.
    pub fn poll(&mut self, now: Instant) -> Option<TickId> {
        let due = self.next_due?;
        if now < due {
            return None;
        }
        self.next_due = Some(due + self.interval);
        Some(TickId(self.generation))
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks until the next terminal event, the next due countdown tick, or
    /// the end of the frame interval, whichever comes first.
    pub fn step(&self, schedule: &mut TickSchedule) -> AppEvent {
        let now = Instant::now();
        if let Some(id) = schedule.poll(now) {
            return AppEvent::Tick(id);
        }

        let frame = self.ticker.interval();
        let timeout = schedule
            .time_until_due(now)
            .map_or(frame, |until_due| until_due.min(frame));

        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => Self::due_or_frame(schedule),
            Err(RecvTimeoutError::Disconnected) => {
                // no more input will arrive; keep time moving without spinning
                std::thread::sleep(timeout);
                Self::due_or_frame(schedule)
            }
        }
    }

    fn due_or_frame(schedule: &mut TickSchedule) -> AppEvent {
        schedule
            .poll(Instant::now())
            .map_or(AppEvent::Frame, AppEvent::Tick)
    }
}
