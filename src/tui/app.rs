// TUI application state
//
// Wraps the form controller with view state: focus, cursors, result scroll,
// toast, and the console log buffer. All mutation happens on the event loop.

use super::text_input::{Handled, TextInput};
use super::theme::Theme;
use super::toast::Toast;
use crate::config::Config;
use crate::export::{self, ClipboardSink};
use crate::form::FormState;
use crate::generator::{GenerateError, GenerateRequest};
use crate::logging::LogBuffer;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Focusable controls, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    ResumeUrl,
    JobDescription,
    Submit,
    Copy,
    Download,
}

impl Focus {
    /// Tab order; the export actions only exist once there is a result
    fn order(has_result: bool) -> &'static [Focus] {
        static WITH_RESULT: [Focus; 5] = [
            Focus::ResumeUrl,
            Focus::JobDescription,
            Focus::Submit,
            Focus::Copy,
            Focus::Download,
        ];
        if has_result {
            &WITH_RESULT
        } else {
            &WITH_RESULT[..3]
        }
    }

    pub fn next(self, has_result: bool) -> Self {
        let order = Self::order(has_result);
        let current = order.iter().position(|&f| f == self).unwrap_or(0);
        order[(current + 1) % order.len()]
    }

    pub fn prev(self, has_result: bool) -> Self {
        let order = Self::order(has_result);
        let current = order.iter().position(|&f| f == self).unwrap_or(0);
        order[(current + order.len() - 1) % order.len()]
    }

    pub fn is_export(self) -> bool {
        matches!(self, Focus::Copy | Focus::Download)
    }
}

/// Main application state for the TUI
pub struct App {
    pub form: FormState,
    pub focus: Focus,
    pub url_input: TextInput,
    pub job_input: TextInput,

    /// First visible line of the result pane
    pub result_scroll: u16,
    /// Rendered line count and viewport height, recorded on each draw
    pub(crate) result_lines: u16,
    pub(crate) result_height: u16,

    pub toast: Option<Toast>,
    pub log_buffer: LogBuffer,
    pub theme: Theme,
    pub endpoint: String,
    pub download_dir: PathBuf,
    pub should_quit: bool,

    /// When the in-flight request was sent
    submitted_at: Option<Instant>,
    animation_frame: usize,
}

impl App {
    pub fn new(config: &Config, log_buffer: LogBuffer) -> Self {
        Self {
            form: FormState::default(),
            focus: Focus::default(),
            url_input: TextInput::single_line(),
            job_input: TextInput::multi_line(),
            result_scroll: 0,
            result_lines: 0,
            result_height: 0,
            toast: None,
            log_buffer,
            theme: Theme::by_name(&config.theme),
            endpoint: config.endpoint.clone(),
            download_dir: config.download_dir.clone(),
            should_quit: false,
            submitted_at: None,
            animation_frame: 0,
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Advance animations and expire the toast
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    /// How long the current request has been pending
    pub fn elapsed(&self) -> Option<Duration> {
        self.submitted_at.map(|t| t.elapsed())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Form controller
    // ─────────────────────────────────────────────────────────────────────

    /// Try to start a submission
    ///
    /// Returns the request to send, or `None` if the submit control is
    /// disabled or a required field is missing (reported via toast).
    pub fn submit(&mut self) -> Option<GenerateRequest> {
        match self.form.begin_submit() {
            Ok(request) => {
                self.submitted_at = Some(Instant::now());
                Some(request)
            }
            Err(refusal) => {
                tracing::debug!("Submission refused: {}", refusal);
                if self.form.can_submit() {
                    self.show_toast(refusal.to_string());
                }
                None
            }
        }
    }

    /// Apply the outcome of the request started by [`App::submit`]
    pub fn finish_submit(&mut self, outcome: Result<String, GenerateError>) {
        if let Some(elapsed) = self.elapsed() {
            tracing::debug!("Request settled after {:.1}s", elapsed.as_secs_f64());
        }
        let succeeded = outcome.is_ok();
        self.form.finish(outcome);
        self.submitted_at = None;
        if succeeded {
            self.result_scroll = 0;
        }
        if self.focus.is_export() && !self.form.has_result() {
            self.focus = Focus::Submit;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Export actions (only while there is a result)
    // ─────────────────────────────────────────────────────────────────────

    pub fn copy_result(&mut self, clipboard: &mut impl ClipboardSink) {
        if !self.form.has_result() {
            return;
        }
        if export::copy(self.form.result(), clipboard) {
            self.show_toast("✓ Copied to clipboard");
        }
    }

    pub fn download_result(&mut self) -> Option<PathBuf> {
        if !self.form.has_result() {
            return None;
        }
        match export::download(self.form.result(), &self.download_dir) {
            Ok(path) => {
                self.show_toast(format!("✓ Saved {}", path.display()));
                Some(path)
            }
            Err(e) => {
                tracing::error!("Download failed: {:#}", e);
                self.show_toast("✗ Download failed");
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next(self.form.has_result());
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev(self.form.has_result());
    }

    /// Route an editing key to the focused text field
    pub fn edit(&mut self, key: KeyEvent) -> Handled {
        match self.focus {
            Focus::ResumeUrl => self.url_input.handle_key(&mut self.form.resume_url, key),
            Focus::JobDescription => self
                .job_input
                .handle_key(&mut self.form.job_description, key),
            _ => Handled::No,
        }
    }

    /// Insert pasted text into the focused text field
    pub fn paste(&mut self, text: &str) {
        match self.focus {
            Focus::ResumeUrl => self.url_input.insert_str(&mut self.form.resume_url, text),
            Focus::JobDescription => self
                .job_input
                .insert_str(&mut self.form.job_description, text),
            _ => {}
        }
    }

    /// Enter on the focused control
    ///
    /// Enter in the URL field submits the form, like a browser's implicit
    /// submission. In the job description it inserts a newline.
    pub fn activate(&mut self, clipboard: &mut impl ClipboardSink) -> Option<GenerateRequest> {
        match self.focus {
            Focus::ResumeUrl | Focus::Submit => self.submit(),
            Focus::JobDescription => {
                let enter = KeyEvent::from(KeyCode::Enter);
                self.job_input
                    .handle_key(&mut self.form.job_description, enter);
                None
            }
            Focus::Copy => {
                self.copy_result(clipboard);
                None
            }
            Focus::Download => {
                self.download_result();
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Result pane scrolling
    // ─────────────────────────────────────────────────────────────────────

    fn max_scroll(&self) -> u16 {
        self.result_lines.saturating_sub(self.result_height)
    }

    pub fn scroll_result_up(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }

    pub fn scroll_result_down(&mut self, lines: u16) {
        self.result_scroll = (self.result_scroll + lines).min(self.max_scroll());
    }

    pub fn page_size(&self) -> u16 {
        self.result_height.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::FakeClipboard;
    use crate::form::SUBMIT_FAILED_MESSAGE;

    fn app() -> App {
        let mut app = App::new(&Config::default(), LogBuffer::new());
        app.form.resume_url = "https://example.com/resume.pdf".to_string();
        app.form.job_description = "Platform engineer".to_string();
        app
    }

    #[test]
    fn test_focus_skips_exports_without_result() {
        let app = app();
        assert_eq!(Focus::Submit.next(app.form.has_result()), Focus::ResumeUrl);
        assert_eq!(Focus::ResumeUrl.prev(false), Focus::Submit);
        assert_eq!(Focus::Submit.next(true), Focus::Copy);
        assert_eq!(Focus::ResumeUrl.prev(true), Focus::Download);
    }

    #[test]
    fn test_submit_disabled_while_pending() {
        let mut app = app();
        assert!(app.submit().is_some());
        assert!(app.elapsed().is_some());
        assert!(app.submit().is_none());
        // A disabled button stays quiet
        assert!(app.toast.is_none());

        app.finish_submit(Ok("# Done".to_string()));
        assert!(app.form.can_submit());
        assert!(app.elapsed().is_none());
        assert!(app.submit().is_some());
    }

    #[test]
    fn test_missing_field_shows_toast() {
        let mut app = app();
        app.form.job_description.clear();
        assert!(app.submit().is_none());
        assert!(app.toast.is_some());
        assert!(!app.form.is_loading());
    }

    #[test]
    fn test_failure_moves_focus_off_missing_exports() {
        let mut app = app();
        app.focus = Focus::Copy;
        app.submit();
        app.finish_submit(Err(GenerateError::InvalidFormat));
        assert_eq!(app.focus, Focus::Submit);
        assert_eq!(app.form.error(), SUBMIT_FAILED_MESSAGE);
    }

    #[test]
    fn test_exports_need_a_result() {
        let mut app = app();
        let dir = tempfile::tempdir().unwrap();
        app.download_dir = dir.path().to_path_buf();

        let mut clipboard = FakeClipboard::default();
        app.copy_result(&mut clipboard);
        assert!(clipboard.contents.is_none());
        assert!(app.download_result().is_none());

        app.submit();
        app.finish_submit(Ok("X".to_string()));

        app.copy_result(&mut clipboard);
        assert_eq!(clipboard.contents.as_deref(), Some("X"));
        let path = app.download_result().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "X");
    }

    #[test]
    fn test_copy_failure_does_not_touch_error() {
        let mut app = app();
        app.submit();
        app.finish_submit(Ok("X".to_string()));

        let mut clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        app.copy_result(&mut clipboard);
        assert!(app.form.error().is_empty());
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_wrapped_url_paste_is_sent_whole() {
        let mut app = app();
        app.form.resume_url.clear();
        app.focus = Focus::ResumeUrl;
        app.paste("https://example.com/\nresume.pdf");

        let request = app.submit().unwrap();
        assert_eq!(request.resume_url, "https://example.com/resume.pdf");
    }

    #[test]
    fn test_enter_in_url_field_submits() {
        let mut app = app();
        let mut clipboard = FakeClipboard::default();
        app.focus = Focus::ResumeUrl;
        assert!(app.activate(&mut clipboard).is_some());
    }

    #[test]
    fn test_enter_in_job_description_is_newline() {
        let mut app = app();
        let mut clipboard = FakeClipboard::default();
        app.focus = Focus::JobDescription;
        app.job_input.move_to_end(&app.form.job_description);
        assert!(app.activate(&mut clipboard).is_none());
        assert_eq!(app.form.job_description, "Platform engineer\n");
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app();
        app.result_lines = 50;
        app.result_height = 20;
        app.scroll_result_down(100);
        assert_eq!(app.result_scroll, 30);
        app.scroll_result_up(45);
        assert_eq!(app.result_scroll, 0);
    }
}
