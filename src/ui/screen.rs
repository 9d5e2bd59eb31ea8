use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, Presentation},
    form::Field,
    ui::{
        digits, render_legend, render_status, render_title, sanitize_message, HORIZONTAL_MARGIN,
        VERTICAL_MARGIN,
    },
};

const CURSOR: &str = "▏";

/// A UI Screen boundary: renders one presentation of the app
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Creator form: message and duration inputs, clock, start/share controls
pub struct CreatorScreen;

impl Screen for CreatorScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let running = app.countdown.is_running();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Length(6), // message
                Constraint::Length(3), // duration
                Constraint::Min(1),    // clock
                Constraint::Length(2), // status
                Constraint::Length(2), // legend
            ])
            .split(area);

        render_title(app, chunks[0], buf);

        let field_style = |field: Field| {
            if running {
                Style::default().fg(Color::DarkGray)
            } else if app.form.focus == field {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }
        };
        let focused = |field: Field| !running && app.form.focus == field;

        // message
        let message_block = Block::default()
            .borders(Borders::ALL)
            .title("Your Message")
            .border_style(field_style(Field::Message));
        let message = if app.form.message.is_empty() && !focused(Field::Message) {
            Text::from(Span::styled(
                "Enter your message (e.g., Happy New Year!)",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            let mut text = sanitize_message(&app.form.message);
            if focused(Field::Message) {
                text.push_str(CURSOR);
            }
            Text::from(text)
        };
        // keep the end of long messages in view
        let visible = chunks[1].height.saturating_sub(2);
        let scroll = (message.lines.len() as u16).saturating_sub(visible);
        let message_style = if running {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };
        Paragraph::new(message)
            .style(message_style)
            .block(message_block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(chunks[1], buf);

        // duration
        let mut duration = app.form.duration_text().to_string();
        if focused(Field::Duration) {
            duration.push_str(CURSOR);
        }
        Paragraph::new(duration)
            .style(message_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(
                        "Duration (seconds, 1-{})",
                        app.form.max_duration_secs()
                    ))
                    .border_style(field_style(Field::Duration)),
            )
            .render(chunks[2], buf);

        // clock
        let clock_area = vertical_center(chunks[3], 1);
        Paragraph::new(Span::styled(
            app.countdown.display_time(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(clock_area, buf);

        render_status(app.status.current(), chunks[4], buf);

        let legend = if running {
            "(esc) reset"
        } else {
            "(enter) start / (ctrl+s) share link / (tab) next field / (alt+enter) new line / (esc)ape"
        };
        render_legend(legend, chunks[5], buf);
    }
}

/// Viewer countdown: large clock, no inputs
pub struct ViewerScreen;

impl Screen for ViewerScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let running = app.countdown.is_running();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Min(1),    // clock
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_title(app, chunks[0], buf);

        let time = app.countdown.display_time();
        let clock_style = Style::default()
            .fg(if running { Color::Yellow } else { Color::Cyan })
            .add_modifier(Modifier::BOLD);
        match digits::big_text(&time) {
            Some(lines)
                if digits::big_text_width(&lines) <= chunks[1].width as usize
                    && digits::GLYPH_HEIGHT <= chunks[1].height as usize =>
            {
                let lines: Vec<Line> = lines
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, clock_style)))
                    .collect();
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(vertical_center(chunks[1], digits::GLYPH_HEIGHT as u16), buf);
            }
            _ => {
                Paragraph::new(Span::styled(time, clock_style))
                    .alignment(Alignment::Center)
                    .render(vertical_center(chunks[1], 1), buf);
            }
        }

        let legend = if running {
            "(s)top"
        } else {
            "(r)eveal surprise / (n) create your own countdown / (esc)ape"
        };
        render_legend(legend, chunks[2], buf);
    }
}

/// Success screen: the message, revealed
pub struct RevealScreen;

impl Screen for RevealScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Min(3),    // message
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_title(app, chunks[0], buf);

        let message = Text::from(sanitize_message(app.countdown.message()));
        let inner_height = chunks[1].height.saturating_sub(2);
        let top_padding = inner_height.saturating_sub(message.lines.len() as u16) / 2;
        let mut lines: Vec<Line> = (0..top_padding).map(|_| Line::from("")).collect();
        lines.extend(message.lines);

        Paragraph::new(lines)
            .style(
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(chunks[1], buf);

        render_legend("✨ (g)o again / (esc)ape", chunks[2], buf);
    }
}

/// A `height`-row strip through the middle of `area`
fn vertical_center(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

/// Helper to construct the appropriate screen for the current presentation
pub fn current_screen(presentation: Presentation) -> Box<dyn Screen> {
    match presentation {
        Presentation::Creator => Box::new(CreatorScreen),
        Presentation::Viewer => Box::new(ViewerScreen),
        Presentation::Reveal => Box::new(RevealScreen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_center_stays_inside_area() {
        let area = Rect::new(0, 4, 10, 9);
        assert_eq!(vertical_center(area, 5), Rect::new(0, 6, 10, 5));
        assert_eq!(vertical_center(area, 20), area);
    }
}
