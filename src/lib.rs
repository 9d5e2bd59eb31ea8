// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod clipboard;
pub mod config;
pub mod countdown;
pub mod form;
pub mod link;
pub mod logging;
pub mod payload;
pub mod runtime;
pub mod status;
pub mod ui;

pub use app::{App, Control, Launch, Presentation};
pub use payload::TimerConfig;
