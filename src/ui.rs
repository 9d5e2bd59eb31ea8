pub mod digits;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{
    app::{App, Notice},
    celebration::Celebration,
    status::Status,
};

pub(crate) const HORIZONTAL_MARGIN: u16 = 5;
pub(crate) const VERTICAL_MARGIN: u16 = 1;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.presentation()).render(self, area, buf);

        if self.celebration.is_active() {
            render_confetti(&self.celebration, area, buf);
        }

        // the notice sits on top of everything, confetti included
        if let Some(notice) = &self.notice {
            render_notice(notice, area, buf);
        }
    }
}

/// Makes a user-supplied message safe to put on a terminal: control
/// characters (escape sequences included) are replaced, tabs expanded,
/// and line breaks kept.
pub fn sanitize_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\n' => out.push('\n'),
            '\r' => {}
            '\t' => out.push_str("    "),
            c if c.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn title_text(app: &App) -> &'static str {
    if app.is_viewer_mode() {
        "🎁 Surprise Countdown"
    } else {
        "⏱️ Countdown Timer"
    }
}

pub(crate) fn render_title(app: &App, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        title_text(app),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

pub(crate) fn render_legend(text: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(area, buf);
}

pub(crate) fn render_status(status: Option<&Status>, area: Rect, buf: &mut Buffer) {
    let lines = match status {
        None => return,
        Some(Status::Copied) => vec![Line::from(Span::styled(
            "✅ Copied!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))],
        Some(Status::CopyFailed { reason, link }) => vec![
            Line::from(Span::styled(
                format!("Copy failed: {reason}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                link.clone(),
                Style::default().fg(Color::Gray),
            )),
        ],
    };

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_notice(notice: &Notice, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(50, 5, area);
    Clear.render(popup, buf);

    Paragraph::new(vec![
        Line::from(Span::styled(
            notice.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) ok",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Notice")
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(popup, buf);
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render confetti on top of the reveal screen
fn render_confetti(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let brightness = particle.brightness();
        let style = if brightness > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if brightness > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
