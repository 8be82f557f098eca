// UI rendering logic
//
// Called on every frame. Layout is a title bar, the form and result panes
// side by side, a console strip of recent log lines, and a status bar.

use super::app::{App, Focus};
use super::markdown::render_markdown;
use super::text_input::{cursor_position, visual_rows};
use crate::logging::LogEntry;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PLACEHOLDER: &str = "Your optimized resume will appear here";
const SUBMIT_LABEL: &str = "Generate Optimized Resume";
const LOADING_LABEL: &str = "Generating...";

/// Main UI render function
///
/// Takes `&mut App` so the result pane can record its viewport for scroll
/// clamping.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(12),   // Form | Result
            Constraint::Length(6), // Console
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    f.render_widget(Block::default().style(app.theme.base_style()), f.area());

    render_title(f, chunks[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    render_form(f, panes[0], app);
    render_result(f, panes[1], app);

    render_console(f, chunks[2], app);
    render_status(f, chunks[3], app);

    if let Some(toast) = &app.toast {
        let area = f.area();
        toast.render(f, area, &app.theme);
    }
}

fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(" Resume Optimizer", app.theme.title_style()),
        Span::styled(
            "  Tailor your resume to match the job description",
            Style::default().fg(app.theme.muted),
        ),
    ]);

    let title = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(app.theme.border_style(false)),
    );
    f.render_widget(title, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Form pane
// ─────────────────────────────────────────────────────────────────────────────

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let error_height = if app.form.error().is_empty() { 0 } else { 2 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Resume URL
            Constraint::Min(5),               // Job description
            Constraint::Length(3),            // Submit
            Constraint::Length(error_height), // Error
        ])
        .split(area);

    render_url_input(f, rows[0], app);
    render_job_input(f, rows[1], app);
    render_submit(f, rows[2], app);

    if error_height > 0 {
        let error = Paragraph::new(app.form.error())
            .style(app.theme.error_style())
            .wrap(Wrap { trim: true });
        f.render_widget(error, rows[3]);
    }
}

fn field_block<'a>(title: &'a str, focused: bool, app: &App) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.border_style(focused))
        .title(format!(" {} ", title))
}

fn render_url_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::ResumeUrl;
    let block = field_block("Resume URL", focused, app);
    let inner = block.inner(area);
    let width = inner.width.max(1) as usize;

    // Scroll horizontally so the cursor stays visible
    let cursor = app.url_input.cursor();
    let start = cursor.saturating_sub(width - 1);
    let visible: String = app.form.resume_url.chars().skip(start).take(width).collect();

    let text = if app.form.resume_url.is_empty() && !focused {
        Paragraph::new("https://…/resume.pdf").style(Style::default().fg(app.theme.muted))
    } else {
        Paragraph::new(visible).style(Style::default().fg(app.theme.fg))
    };
    f.render_widget(text.block(block), area);

    if focused {
        let col = app
            .form
            .resume_url
            .chars()
            .skip(start)
            .take(cursor - start)
            .collect::<String>()
            .width() as u16;
        f.set_cursor_position((inner.x + col.min(inner.width), inner.y));
    }
}

fn render_job_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::JobDescription;
    let block = field_block("Job Description", focused, app);
    let inner = block.inner(area);
    let width = inner.width.max(1) as usize;
    let height = inner.height.max(1) as usize;

    let text = &app.form.job_description;
    let rows = visual_rows(text, width);
    let (row, col) = cursor_position(text, app.job_input.cursor(), width);
    let top = row.saturating_sub(height - 1);

    let paragraph = if text.is_empty() && !focused {
        Paragraph::new("Paste the job description here")
            .style(Style::default().fg(app.theme.muted))
    } else {
        let lines: Vec<Line> = rows
            .into_iter()
            .skip(top)
            .take(height)
            .map(Line::from)
            .collect();
        Paragraph::new(lines).style(Style::default().fg(app.theme.fg))
    };
    f.render_widget(paragraph.block(block), area);

    if focused {
        let y = inner.y + (row - top) as u16;
        f.set_cursor_position((inner.x + col as u16, y));
    }
}

fn render_submit(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Submit;

    let (label, color) = if app.form.is_loading() {
        let elapsed = app
            .elapsed()
            .map(|d| format!(" {}s", d.as_secs()))
            .unwrap_or_default();
        (
            format!("{} {}{}", app.spinner_char(), LOADING_LABEL, elapsed),
            app.theme.button_disabled,
        )
    } else {
        (SUBMIT_LABEL.to_string(), app.theme.button)
    };

    let mut style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    if focused && app.form.can_submit() {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(app.theme.border_style(focused)),
        );
    f.render_widget(button, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Result pane
// ─────────────────────────────────────────────────────────────────────────────

fn render_result(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus.is_export();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.border_style(focused))
        .title(" Generated Resume ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !app.form.has_result() {
        app.result_lines = 0;
        app.result_height = inner.height;
        let placeholder = Paragraph::new(PLACEHOLDER)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(app.theme.muted)
                    .add_modifier(Modifier::ITALIC),
            );
        let middle = Rect {
            y: inner.y + inner.height / 2,
            height: 1.min(inner.height),
            ..inner
        };
        f.render_widget(placeholder, middle);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    render_actions(f, rows[0], app);

    let content = rows[1];
    // Leave a column for the scrollbar
    let text_width = content.width.saturating_sub(1).max(1) as usize;
    let lines = render_markdown(app.form.result(), text_width, &app.theme);

    app.result_lines = lines.len().min(u16::MAX as usize) as u16;
    app.result_height = content.height;
    app.result_scroll = app
        .result_scroll
        .min(app.result_lines.saturating_sub(content.height));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.fg))
        .scroll((app.result_scroll, 0));
    f.render_widget(paragraph, content);

    if app.result_lines > content.height {
        let mut state = ScrollbarState::new(app.result_lines as usize)
            .position(app.result_scroll as usize)
            .viewport_content_length(content.height as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            content,
            &mut state,
        );
    }
}

fn render_actions(f: &mut Frame, area: Rect, app: &App) {
    let action = |label: &'static str, target: Focus| {
        let style = Style::default()
            .fg(app.theme.button)
            .add_modifier(Modifier::BOLD);
        if app.focus == target {
            Span::styled(label, style.add_modifier(Modifier::REVERSED))
        } else {
            Span::styled(label, style)
        }
    };

    let line = Line::from(vec![
        action(" Copy ", Focus::Copy),
        Span::raw("  "),
        action(" Download ", Focus::Download),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Console and status
// ─────────────────────────────────────────────────────────────────────────────

fn render_console(f: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .log_buffer
        .recent(height)
        .iter()
        .map(|entry| {
            ListItem::new(format_log_entry(entry)).style(app.theme.log_style(entry.level))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(app.theme.border_style(false))
            .title(format!(" Console ({}) ", app.log_buffer.len())),
    );
    f.render_widget(list, area);
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let state = if app.form.is_loading() {
        format!("{} generating", app.spinner_char())
    } else if app.form.has_result() {
        "ready".to_string()
    } else {
        "idle".to_string()
    };

    let mut hints = String::from("Tab focus │ ^S submit");
    if app.form.has_result() {
        hints.push_str(" │ ^Y copy │ ^D download │ PgUp/PgDn scroll");
    }
    hints.push_str(" │ Esc quit");

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state),
            Style::default()
                .fg(app.theme.status_bar)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("│ {} │ ", app.endpoint),
            Style::default().fg(app.theme.muted),
        ),
        Span::styled(hints, Style::default().fg(app.theme.muted)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logging::LogBuffer;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_toast_on_tiny_terminal() {
        let mut app = App::new(&Config::default(), LogBuffer::new());
        app.show_toast("Please fill out the Job Description field");
        for height in 1..=4 {
            let mut terminal = Terminal::new(TestBackend::new(80, height)).unwrap();
            terminal.draw(|f| draw(f, &mut app)).unwrap();
        }
    }

    #[test]
    fn test_placeholder_without_result() {
        let mut app = App::new(&Config::default(), LogBuffer::new());
        let screen = screen(&mut app);
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains(SUBMIT_LABEL));
        assert!(!screen.contains(" Download "));
    }

    #[test]
    fn test_loading_label_and_error() {
        let mut app = App::new(&Config::default(), LogBuffer::new());
        app.form.resume_url = "https://example.com/cv.pdf".to_string();
        app.form.job_description = "SRE".to_string();
        app.submit();
        assert!(screen(&mut app).contains(LOADING_LABEL));

        app.finish_submit(Err(crate::generator::GenerateError::InvalidFormat));
        let screen = screen(&mut app);
        assert!(screen.contains(SUBMIT_LABEL));
        assert!(screen.contains(crate::form::SUBMIT_FAILED_MESSAGE));
    }

    #[test]
    fn test_result_shows_actions() {
        let mut app = App::new(&Config::default(), LogBuffer::new());
        app.form.resume_url = "https://example.com/cv.pdf".to_string();
        app.form.job_description = "SRE".to_string();
        app.submit();
        app.finish_submit(Ok("Jane Doe\n\nBuilt things.".to_string()));

        let screen = screen(&mut app);
        assert!(!screen.contains(PLACEHOLDER));
        assert!(screen.contains("Jane Doe"));
        assert!(screen.contains(" Copy "));
        assert!(screen.contains(" Download "));
    }
}
