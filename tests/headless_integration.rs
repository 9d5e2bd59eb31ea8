use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tock::clipboard::MemoryClipboard;
use tock::config::Config;
use tock::countdown::Countdown;
use tock::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use tock::{App, Control, Launch, Presentation, TimerConfig};

// Headless integration using the internal runtime + App without a TTY.
// The countdown runs on a millisecond cadence so the tests stay fast.

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn viewer_app(message: &str, secs: u32) -> App {
    let token = tock::payload::encode(&TimerConfig::new(message, secs));
    let mut app = App::new(
        Config::default(),
        Launch {
            link: Some(format!("https://tock.link/#{token}")),
            ..Launch::default()
        },
        Box::new(MemoryClipboard::new()),
    );
    app.countdown = Countdown::viewer(TimerConfig::new(message, secs))
        .with_tick_interval(Duration::from_millis(2));
    app
}

#[test]
fn headless_viewer_flow_reveals_message() {
    let mut app = viewer_app("Happy New Year!", 3);
    assert_eq!(app.presentation(), Presentation::Viewer);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('r')).unwrap();

    let mut ticks = 0;
    for _ in 0..500u32 {
        let event = runner.step(app.countdown.schedule_mut());
        if let AppEvent::Tick(_) = event {
            ticks += 1;
        }
        assert_eq!(app.handle(event), Control::Continue);
        if app.presentation() == Presentation::Reveal {
            break;
        }
    }

    assert_eq!(app.presentation(), Presentation::Reveal);
    assert_eq!(ticks, 3, "one tick per second of duration");
    assert_eq!(app.countdown.remaining_secs(), 0);
    assert!(app.countdown.next_tick().is_none());
    assert_eq!(app.countdown.message(), "Happy New Year!");
}

#[test]
fn headless_stop_cancels_pending_ticks() {
    let mut app = viewer_app("Hi", 1000);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('r')).unwrap();
    // start, then let a few ticks land
    let mut ticks = 0;
    while ticks < 3 {
        let event = runner.step(app.countdown.schedule_mut());
        if let AppEvent::Tick(_) = event {
            ticks += 1;
        }
        app.handle(event);
    }
    assert_eq!(app.countdown.remaining_secs(), 997);

    tx.send(key('s')).unwrap();
    for _ in 0..20u32 {
        let event = runner.step(app.countdown.schedule_mut());
        assert!(
            !matches!(event, AppEvent::Tick(_)),
            "no tick may fire after the countdown is stopped"
        );
        app.handle(event);
    }

    assert!(!app.countdown.is_running());
    assert_eq!(app.countdown.remaining_secs(), 1000);
}

#[test]
fn headless_creator_shares_then_quits() {
    let clipboard = MemoryClipboard::new();
    let mut app = App::new(
        Config {
            base_url: "https://example.com/c".into(),
            ..Config::default()
        },
        Launch {
            message: Some("See you soon".into()),
            duration_secs: Some(60),
            ..Launch::default()
        },
        Box::new(clipboard.clone()),
    );

    app.handle(AppEvent::Key(KeyEvent::new(
        KeyCode::Char('s'),
        KeyModifiers::CONTROL,
    )));
    let shared = clipboard.last().expect("share link copied");
    assert!(shared.starts_with("https://example.com/c#"));

    let roundtrip = tock::link::parse_link(&shared).unwrap();
    assert_eq!(roundtrip.config, TimerConfig::new("See you soon", 60));

    let quit = app.handle(AppEvent::Key(KeyEvent::new(
        KeyCode::Esc,
        KeyModifiers::NONE,
    )));
    assert_eq!(quit, Control::Quit);
}
