use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

use tock::{
    app::{App, Control, Launch},
    app_dirs::AppDirs,
    clipboard::SystemClipboard,
    config::{Config, ConfigStore, FileConfigStore},
    countdown,
    form::Form,
    link, logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    ui, TimerConfig,
};

const FRAME_RATE_MS: u64 = 100;

/// surprise countdown: write a message, share a link, reveal it when time runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Write a message, pick a duration and start a countdown that reveals the message when it hits zero. Share the countdown as a link; whoever opens it gets the same surprise."
)]
pub struct Cli {
    /// share link (or bare token) to open in viewer mode
    link: Option<String>,

    /// message to pre-fill the creator form with
    #[clap(short = 'm', long)]
    message: Option<String>,

    /// duration in seconds to pre-fill the creator form with
    #[clap(short = 'd', long)]
    duration: Option<u32>,

    /// page share links point at (overrides the config file)
    #[clap(long)]
    base_url: Option<String>,

    /// print the share link for --message/--duration and exit
    #[clap(long, conflicts_with = "link")]
    print_link: bool,

    /// print what LINK contains and exit
    #[clap(long, requires = "link")]
    decode: bool,

    /// write the effective configuration to the config file and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config.sanitized()
    }

    fn launch(&self) -> Launch {
        Launch {
            link: self.link.clone(),
            message: self.message.clone(),
            duration_secs: self.duration,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        // logging is best effort; the app works without it
        let _ = logging::init(&path);
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());

    if cli.write_config {
        store.save(&config)?;
        println!("{}", store.path().display());
        return Ok(());
    }

    if cli.print_link {
        // same bounds as the creator form
        let form = Form::new(
            cli.message.clone().unwrap_or_default(),
            cli.duration.unwrap_or(config.default_duration_secs),
            config.max_duration_secs,
        );
        let duration = form.duration_secs();
        if let Err(err) = countdown::validate(&form.message, duration) {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
        let base = link::base_url(&config.base_url);
        println!(
            "{}",
            link::share_url(&base, &TimerConfig::new(form.message, duration))
        );
        return Ok(());
    }

    if cli.decode {
        let input = cli.link.as_deref().unwrap_or_default();
        match link::parse_link(input) {
            Ok(shared) => {
                println!("message: {}", ui::sanitize_message(&shared.config.message));
                println!(
                    "duration: {}s ({})",
                    shared.config.duration_secs,
                    countdown::format_time(shared.config.duration_secs)
                );
                return Ok(());
            }
            Err(err) => {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::InvalidValue, format!("invalid share link: {err}"))
                    .exit();
            }
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, cli.launch(), Box::new(SystemClipboard::new()));
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(FRAME_RATE_MS)),
    );

    let size = terminal.size()?;
    app.area = (size.width, size.height);
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step(app.countdown.schedule_mut());
        if app.handle(event) == Control::Quit {
            break;
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["tock"]);

        assert_eq!(cli.link, None);
        assert_eq!(cli.message, None);
        assert_eq!(cli.duration, None);
        assert_eq!(cli.base_url, None);
        assert!(!cli.print_link);
        assert!(!cli.decode);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_link_positional() {
        let cli = Cli::parse_from(["tock", "https://tock.link/#eyJtIjoiSGkiLCJ0IjoxMH0="]);
        assert_eq!(
            cli.link.as_deref(),
            Some("https://tock.link/#eyJtIjoiSGkiLCJ0IjoxMH0=")
        );
        assert_eq!(cli.launch().link, cli.link);
    }

    #[test]
    fn test_cli_message_and_duration() {
        let cli = Cli::parse_from(["tock", "-m", "hello", "-d", "30"]);
        assert_eq!(cli.message.as_deref(), Some("hello"));
        assert_eq!(cli.duration, Some(30));

        let cli = Cli::parse_from(["tock", "--message", "hi", "--duration", "5"]);
        let launch = cli.launch();
        assert_eq!(launch.message.as_deref(), Some("hi"));
        assert_eq!(launch.duration_secs, Some(5));
    }

    #[test]
    fn test_cli_rejects_negative_duration() {
        assert!(Cli::try_parse_from(["tock", "-d", "-5"]).is_err());
        assert!(Cli::try_parse_from(["tock", "-d", "soon"]).is_err());
    }

    #[test]
    fn test_cli_decode_requires_link() {
        assert!(Cli::try_parse_from(["tock", "--decode"]).is_err());
        assert!(Cli::try_parse_from(["tock", "--decode", "abc"]).is_ok());
    }

    #[test]
    fn test_cli_print_link_conflicts_with_link() {
        assert!(Cli::try_parse_from(["tock", "--print-link", "abc"]).is_err());
    }

    #[test]
    fn test_cli_base_url_overrides_config() {
        let cli = Cli::parse_from(["tock", "--base-url", "https://example.com/"]);
        let config = cli.apply(Config::default());
        assert_eq!(config.base_url, "https://example.com/");

        let cli = Cli::parse_from(["tock"]);
        assert_eq!(cli.apply(Config::default()), Config::default());
    }

    #[test]
    fn test_frame_rate_constant() {
        const _: () = assert!(FRAME_RATE_MS > 0);
        const _: () = assert!(FRAME_RATE_MS < 1000); // must refresh faster than the countdown ticks
    }
}
