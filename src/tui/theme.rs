// Theme system for the TUI
//
// Each theme defines colors for every UI element: the form, the result pane
// and its markdown, the console strip.

use crate::logging::LogLevel;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub border_type: BorderType,

    // Title and status
    pub title: Color,
    pub status_bar: Color,

    // Form
    pub button: Color,
    pub button_disabled: Color,
    pub error: Color,

    // Markdown
    pub heading_1: Color,
    pub heading_2: Color,
    pub heading_3: Color,
    pub code_inline: Color,
    pub code_block: Color,
    pub link: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
    pub log_trace: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Look up a theme by config name; unknown names get the dark theme
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::Gray,
            border: Color::Gray,
            border_focused: Color::Cyan,
            border_type: BorderType::Rounded,

            title: Color::Cyan,
            status_bar: Color::Green,

            button: Color::LightBlue,
            button_disabled: Color::DarkGray,
            error: Color::Red,

            heading_1: Color::Magenta,
            heading_2: Color::LightBlue,
            heading_3: Color::Cyan,
            code_inline: Color::Yellow,
            code_block: Color::Gray,
            link: Color::Cyan,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
            log_trace: Color::DarkGray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            border_type: BorderType::Rounded,

            title: Color::Blue,
            status_bar: Color::DarkGray,

            button: Color::Blue,
            button_disabled: Color::Gray,
            error: Color::Red,

            heading_1: Color::Magenta,
            heading_2: Color::Blue,
            heading_3: Color::Rgb(0, 128, 128),
            code_inline: Color::Rgb(184, 134, 11), // Dark goldenrod
            code_block: Color::DarkGray,
            link: Color::Blue,

            log_error: Color::Red,
            log_warn: Color::Rgb(184, 134, 11),
            log_info: Color::Blue,
            log_debug: Color::DarkGray,
            log_trace: Color::Gray,
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn log_style(&self, level: LogLevel) -> Style {
        let color = match level {
            LogLevel::Error => self.log_error,
            LogLevel::Warn => self.log_warn,
            LogLevel::Info => self.log_info,
            LogLevel::Debug => self.log_debug,
            LogLevel::Trace => self.log_trace,
        };
        Style::default().fg(color)
    }
}
