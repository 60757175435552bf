//! Form and preview rendering

use crate::estimator::{EstimatorKind, Flag};
use crate::form::{Field, FormReport};
use crate::labels;
use crate::tui::app::{App, Focus, NoticeLevel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

fn text_label(field: Field) -> &'static str {
    match field {
        Field::Name => labels::PROMPT_NAME,
        Field::Kind => labels::PROMPT_ESTIMATOR,
        Field::Required => labels::PROMPT_REQUIRED,
        Field::Optional => labels::PROMPT_OPTIONAL,
        Field::Tags => labels::PROMPT_TAGS,
        Field::Output => labels::PROMPT_OUTPUT,
    }
}

fn border_style(focused: bool, has_error: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else if has_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let report = app.report();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("sklearn-smithy: forge a scikit-learn estimator")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(title, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    render_form(app, &report, frame, columns[0]);
    render_preview(app, frame, columns[1]);
    render_status(app, &report, frame, rows[2]);

    let help = Paragraph::new(
        "Tab/↑↓ Move • Space Toggle/Cycle • Ctrl+F Forge • Ctrl+S Save • PgUp/PgDn Scroll • Esc Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);
}

fn render_form(app: &App, report: &FormReport, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Kind
            Constraint::Length(3), // Required
            Constraint::Length(3), // Optional
            Constraint::Length(6), // Flags
            Constraint::Length(3), // Tags
            Constraint::Length(3), // Output
            Constraint::Min(3),    // Messages
        ])
        .split(area);

    render_text(app, report, Field::Name, frame, chunks[0]);
    render_kind(app, report, frame, chunks[1]);
    render_text(app, report, Field::Required, frame, chunks[2]);
    render_text(app, report, Field::Optional, frame, chunks[3]);
    render_flags(app, frame, chunks[4]);
    render_text(app, report, Field::Tags, frame, chunks[5]);
    render_text(app, report, Field::Output, frame, chunks[6]);
    render_messages(report, frame, chunks[7]);
}

fn render_text(app: &App, report: &FormReport, field: Field, frame: &mut Frame, area: Rect) {
    let focused = app.focus() == Focus::Text(field);
    let value = app.form().text(field);

    let content = if value.is_empty() && field == Field::Output {
        let derived = report
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Span::styled(derived, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };

    let label = text_label(field);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(label)
        .border_style(border_style(focused, report.errors.contains_key(&field)));
    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if focused {
        let column = cursor_column(value, app.cursor(), area.width);
        frame.set_cursor_position((area.x + 1 + column, area.y + 1));
    }
}

/// Display column of the char cursor inside a bordered block of `width`
fn cursor_column(text: &str, cursor: usize, width: u16) -> u16 {
    let before: String = text.chars().take(cursor).collect();
    let inner = width.saturating_sub(2);
    u16::try_from(before.width()).unwrap_or(u16::MAX).min(inner)
}

fn render_kind(app: &App, report: &FormReport, frame: &mut Frame, area: Rect) {
    let focused = app.focus() == Focus::Kind;
    let selected = app.form().kind();

    let spans: Vec<Span> = EstimatorKind::ALL
        .iter()
        .flat_map(|kind| {
            let style = if Some(*kind) == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} ", kind.display_name()), style), Span::raw(" ")]
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(labels::PROMPT_ESTIMATOR)
        .border_style(border_style(focused, report.errors.contains_key(&Field::Kind)));
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_flags(app: &App, frame: &mut Frame, area: Rect) {
    let flags = app.form().flags();

    let lines: Vec<Line> = Flag::ALL
        .iter()
        .filter(|flag| app.is_focusable(Focus::Flag(**flag)))
        .map(|flag| {
            let focused = app.focus() == Focus::Flag(*flag);
            let marker = if flag.get(&flags) { "[x]" } else { "[ ]" };
            let style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{} {}", marker, labels::flag_prompt(*flag)),
                style,
            ))
        })
        .collect();

    let lines = if lines.is_empty() {
        vec![Line::from(Span::styled(
            "Select an estimator type first",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        lines
    };

    let focused = matches!(app.focus(), Focus::Flag(_));
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Options")
        .border_style(border_style(focused, false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_messages(report: &FormReport, frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = report
        .errors
        .values()
        .flat_map(|msg| msg.lines())
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Red))))
        .collect();
    lines.extend(report.advisories.values().map(|msg| {
        Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)))
    }));

    let block = Block::default().borders(Borders::ALL).title("Validation");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_preview(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Preview");

    let paragraph = match app.preview() {
        Some(code) => Paragraph::new(Text::raw(code)).scroll((app.preview_scroll(), 0)),
        None => Paragraph::new(Span::styled(
            "Press Ctrl+F to forge the estimator",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(paragraph.block(block), area);
}

fn render_status(app: &App, report: &FormReport, frame: &mut Frame, area: Rect) {
    let line = match app.notice() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            // Formatter errors can span lines
            let first = notice.message.lines().next().unwrap_or_default();
            Span::styled(first.to_string(), Style::default().fg(color))
        }
        None if report.can_forge => {
            Span::styled("Ready to forge", Style::default().fg(Color::Green))
        }
        None => Span::styled(
            format!("{} field(s) need attention", report.errors.len()),
            Style::default().fg(Color::Yellow),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}
