use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Message, Speaker};
use crate::tui::wrap::wrap_text;

const BUBBLE_WIDTH_PERCENT: usize = 75;
const MIN_BUBBLE_TEXT_WIDTH: usize = 10;

struct Bubble {
    lines: Vec<String>,
    title: String,
    width: u16,
    height: u16,
    speaker: Speaker,
    style: Style,
}

impl Bubble {
    fn new(message: &Message, max_text_width: usize) -> Self {
        let lines = wrap_text(&message.text, max_text_width);
        let title = match message.speaker {
            Speaker::User => format!(" you {} ", message.sent_at),
            Speaker::Bot => format!(" taskmate {} ", message.sent_at),
        };
        let text_width = lines
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .max(title.width());
        let style = match (message.speaker, message.is_error) {
            (_, true) => Style::default().fg(Color::Red),
            (Speaker::User, false) => Style::default().fg(Color::Cyan),
            (Speaker::Bot, false) => Style::default().fg(Color::Green),
        };
        Self {
            width: to_u16(text_width + 2),
            height: to_u16(lines.len() + 2),
            lines,
            title,
            speaker: message.speaker,
            style,
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Conversation
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("TASKMATE")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    draw_conversation(f, app, main_chunks[1]);
    draw_input(f, app, main_chunks[2]);

    let footer = Paragraph::new("Enter: Send | Up/Down/PgUp/PgDn: Scroll | Esc: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

/// Newest message sits at the bottom; `app.scroll` lifts the view.
fn draw_conversation(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let max_text_width = (usize::from(area.width) * BUBBLE_WIDTH_PERCENT / 100)
        .saturating_sub(2)
        .max(MIN_BUBBLE_TEXT_WIDTH)
        .min(usize::from(area.width).saturating_sub(2));

    let bubbles: Vec<Bubble> = app
        .messages
        .iter()
        .map(|m| Bubble::new(m, max_text_width))
        .collect();

    let total: u32 = bubbles.iter().map(|b| u32::from(b.height)).sum();
    let overflow = total.saturating_sub(u32::from(area.height));
    app.max_scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
    app.scroll = app.scroll.min(app.max_scroll);

    let top = i32::from(area.y);
    let bottom_edge = i32::from(area.y) + i32::from(area.height);
    let mut bottom = bottom_edge + i32::from(app.scroll);

    for bubble in bubbles.iter().rev() {
        let bubble_top = bottom - i32::from(bubble.height);
        if bubble_top >= bottom_edge {
            bottom = bubble_top;
            continue;
        }
        if bottom <= top {
            break;
        }

        let visible_top = bubble_top.max(top);
        let visible_bottom = bottom.min(bottom_edge);
        let hidden_rows = visible_top - bubble_top;
        let width = bubble.width.min(area.width);
        let x = match bubble.speaker {
            Speaker::User => area.x + area.width - width,
            Speaker::Bot => area.x,
        };
        let rect = Rect::new(
            x,
            clamp_row(visible_top),
            width,
            clamp_row(visible_bottom - visible_top),
        );
        render_bubble(f, bubble, rect, clamp_row(hidden_rows));

        bottom = bubble_top;
    }
}

fn render_bubble(f: &mut Frame, bubble: &Bubble, rect: Rect, hidden_rows: u16) {
    let lines: Vec<Line> = bubble.lines.iter().map(|l| Line::from(l.as_str())).collect();
    let title = Line::from(bubble.title.as_str());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(bubble.style)
        .title(match bubble.speaker {
            Speaker::User => title.right_aligned(),
            Speaker::Bot => title.left_aligned(),
        });

    let paragraph = Paragraph::new(lines)
        .style(bubble.style)
        .block(block)
        .scroll((hidden_rows, 0));
    f.render_widget(paragraph, rect);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let inner_width = usize::from(area.width.saturating_sub(2));
    let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
    let cursor_col = before_cursor.width();
    // keep the cursor inside the box once the line outgrows it
    let h_scroll = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .scroll((0, to_u16(h_scroll)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Message "),
        );
    f.render_widget(input, area);

    let x = area.x + 1 + to_u16(cursor_col - h_scroll);
    f.set_cursor_position((x, area.y + 1));
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn clamp_row(n: i32) -> u16 {
    u16::try_from(n.max(0)).unwrap_or(u16::MAX)
}
