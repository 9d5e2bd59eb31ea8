use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};
use url::Url;

use crate::celebration::Celebration;
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::countdown::{self, Countdown, StartError, TickOutcome};
use crate::form::{Field, Form};
use crate::link::{self, LinkSource};
use crate::payload::TimerConfig;
use crate::runtime::{AppEvent, TickId};
use crate::status::{Status, StatusLine};

/// Which of the three presentations is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Creator,
    Viewer,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// A blocking notice; all keys except dismissal are swallowed while it is up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
}

/// What the app was launched with
#[derive(Debug, Clone, Default)]
pub struct Launch {
    pub link: Option<String>,
    pub message: Option<String>,
    pub duration_secs: Option<u32>,
}

pub struct App {
    pub countdown: Countdown,
    pub form: Form,
    pub notice: Option<Notice>,
    pub status: StatusLine,
    pub celebration: Celebration,
    pub settings: Config,
    pub share_base: Url,
    /// Terminal size, used to place the confetti
    pub area: (u16, u16),
    clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(settings: Config, launch: Launch, clipboard: Box<dyn Clipboard>) -> Self {
        let settings = settings.sanitized();
        let share_base = link::base_url(&settings.base_url);
        let form = Form::new(
            launch.message.unwrap_or_default(),
            launch.duration_secs.unwrap_or(settings.default_duration_secs),
            settings.max_duration_secs,
        );

        let shared = launch
            .link
            .as_deref()
            .and_then(|input| match link::parse_link(input) {
                Ok(shared) => Some(shared),
                Err(err) => {
                    // a bad link just means creator mode
                    debug!("ignoring share link: {err}");
                    None
                }
            });

        let countdown = match shared {
            Some(shared) => {
                if shared.source == LinkSource::LegacyQuery {
                    info!("opened legacy query link");
                }
                info!(duration = shared.config.duration_secs, "viewer mode");
                Countdown::viewer(shared.config)
            }
            None => Countdown::creator(form.message.clone(), form.duration_secs()),
        };

        Self {
            countdown,
            form,
            notice: None,
            status: StatusLine::default(),
            celebration: Celebration::new(),
            settings,
            share_base,
            area: (80, 24),
            clipboard,
        }
    }

    pub fn is_viewer_mode(&self) -> bool {
        self.countdown.is_viewer_mode()
    }

    pub fn presentation(&self) -> Presentation {
        if self.countdown.is_expired() {
            Presentation::Reveal
        } else if self.is_viewer_mode() {
            Presentation::Viewer
        } else {
            Presentation::Creator
        }
    }

    /// Starts (or reveals) the countdown; validation failures raise a notice
    pub fn start(&mut self) {
        if !self.is_viewer_mode() {
            self.countdown
                .configure(self.form.message.clone(), self.form.duration_secs());
        }
        if let Err(err) = self.countdown.start() {
            self.raise(err);
            return;
        }
        self.celebration.stop();
    }

    pub fn reset(&mut self) {
        self.countdown.reset();
        self.celebration.stop();
    }

    /// Share URL for the current form contents
    pub fn share_url(&self) -> Result<String, StartError> {
        let duration_secs = self.form.duration_secs();
        countdown::validate(&self.form.message, duration_secs)?;
        let config = TimerConfig::new(self.form.message.clone(), duration_secs);
        Ok(link::share_url(&self.share_base, &config))
    }

    /// Copies the share URL; the outcome shows in the status line
    pub fn share(&mut self) {
        let url = match self.share_url() {
            Ok(url) => url,
            Err(StartError::EmptyMessage) => {
                self.notice = Some(Notice {
                    text: "Please enter a message to share!".into(),
                });
                return;
            }
            Err(err) => {
                self.raise(err);
                return;
            }
        };

        let now = Instant::now();
        match self.clipboard.set_text(&url) {
            Ok(()) => {
                info!("share link copied");
                self.status.show(Status::Copied, now);
            }
            Err(err) => {
                warn!("could not copy share link: {err}");
                self.status.show(
                    Status::CopyFailed {
                        reason: err.to_string(),
                        link: url,
                    },
                    now,
                );
            }
        }
    }

    /// Leaves viewer mode for a fresh creator form
    pub fn create_own(&mut self) {
        self.countdown = Countdown::creator("", self.settings.default_duration_secs);
        self.form = Form::new(
            "",
            self.settings.default_duration_secs,
            self.settings.max_duration_secs,
        );
        self.celebration.stop();
        self.status.clear();
    }

    pub fn on_tick(&mut self, id: TickId) {
        if self.countdown.on_tick(id) == TickOutcome::Expired && self.settings.celebrate {
            let (width, height) = self.area;
            self.celebration.start(width, height, Instant::now());
        }
    }

    /// Housekeeping between events: expire the status flash, animate confetti
    pub fn refresh(&mut self, now: Instant) {
        self.status.expire(now);
        self.celebration.update(now);
    }

    pub fn handle(&mut self, event: AppEvent) -> Control {
        let control = match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize(width, height) => {
                self.area = (width, height);
                Control::Continue
            }
            AppEvent::Paste(text) => {
                self.on_paste(&text);
                Control::Continue
            }
            AppEvent::Tick(id) => {
                self.on_tick(id);
                Control::Continue
            }
            AppEvent::Frame => Control::Continue,
        };
        self.refresh(Instant::now());
        control
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return Control::Continue;
        }

        match self.presentation() {
            Presentation::Reveal => self.on_reveal_key(key),
            Presentation::Viewer => self.on_viewer_key(key),
            Presentation::Creator => self.on_creator_key(key),
        }
    }

    /// Pasted text goes into the focused field; it never starts the countdown
    fn on_paste(&mut self, text: &str) {
        if self.notice.is_some()
            || self.presentation() != Presentation::Creator
            || self.countdown.is_running()
        {
            return;
        }
        self.form.insert_str(text);
    }

    fn on_reveal_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Char('g') | KeyCode::Enter => self.reset(),
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            _ => {}
        }
        Control::Continue
    }

    fn on_viewer_key(&mut self, key: KeyEvent) -> Control {
        if self.countdown.is_running() {
            if matches!(key.code, KeyCode::Char('s') | KeyCode::Esc) {
                self.reset();
            }
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('r') | KeyCode::Char(' ') | KeyCode::Enter => self.start(),
            KeyCode::Char('n') => self.create_own(),
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            _ => {}
        }
        Control::Continue
    }

    fn on_creator_key(&mut self, key: KeyEvent) -> Control {
        if self.countdown.is_running() {
            // inputs are locked while counting down
            if key.code == KeyCode::Esc {
                self.reset();
            }
            return Control::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Enter if alt => self.form.newline(),
            KeyCode::Enter => self.start(),
            KeyCode::Tab | KeyCode::BackTab => self.form.focus_next(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Up if self.form.focus == Field::Duration => self.form.adjust_duration(1),
            KeyCode::Down if self.form.focus == Field::Duration => self.form.adjust_duration(-1),
            KeyCode::Char('s') if ctrl => self.share(),
            KeyCode::Char(c) if !ctrl => self.form.insert_char(c),
            _ => {}
        }
        Control::Continue
    }

    fn raise(&mut self, err: StartError) {
        debug!("start rejected: {err}");
        self.notice = Some(Notice {
            text: err.to_string(),
        });
    }
}
