// Markdown parsing and rendering for the result pane
//
// Uses pulldown-cmark to parse markdown and convert it to styled ratatui
// lines. Supports: headings, inline code, fenced code blocks, bold, italic,
// strikethrough, lists, blockquotes, tables, links and rules. Raw HTML is
// dropped.

use super::theme::Theme;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// A segment of parsed markdown with semantic meaning
#[derive(Debug, Clone, PartialEq)]
pub enum StyledSegment {
    /// Regular text
    Text(String),
    /// Bold, italic and/or struck-through text
    Emphasis { text: String, modifier: Modifier },
    /// Inline code: `like this`
    InlineCode(String),
    /// Fenced or indented code block
    CodeBlock { lang: Option<String>, code: String },
    /// Soft break (single newline in source)
    SoftBreak,
    /// Hard break (explicit line break)
    HardBreak,
    /// End of paragraph (adds blank line for spacing)
    ParagraphEnd,
    Heading { level: u8, text: String },
    /// List item marker (bullet or number)
    ListItemStart {
        ordered: bool,
        number: u64,
        depth: usize,
    },
    ListItemEnd,
    BlockQuoteStart,
    BlockQuoteEnd,
    /// Horizontal rule (---)
    Rule,
    /// Link: [text](url)
    Link { text: String, url: String },
    /// Whole table, so column widths can span every row
    Table {
        head: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse markdown into styled segments
pub fn parse_markdown(markdown: &str) -> Vec<StyledSegment> {
    let mut segments = Vec::new();

    let mut in_heading: Option<u8> = None;
    let mut heading_content = String::new();

    let mut in_code_block = false;
    let mut current_lang: Option<String> = None;
    let mut code_block_content = String::new();

    // Stack of (ordered, next_number) for nested lists
    let mut list_stack: Vec<(bool, u64)> = Vec::new();

    // Active inline emphasis
    let mut modifier = Modifier::empty();

    let mut in_link = false;
    let mut link_url = String::new();
    let mut link_text = String::new();

    let mut in_table = false;
    let mut in_table_head = false;
    let mut table_head: Vec<String> = Vec::new();
    let mut table_rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_cell = String::new();

    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = Some(heading_level(level));
                heading_content.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = in_heading.take() {
                    segments.push(StyledSegment::Heading {
                        level,
                        text: std::mem::take(&mut heading_content),
                    });
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                current_lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                code_block_content.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                segments.push(StyledSegment::CodeBlock {
                    lang: current_lang.take(),
                    code: std::mem::take(&mut code_block_content),
                });
                in_code_block = false;
            }

            // Text routing: innermost container wins
            Event::Text(text) | Event::Code(text) if in_code_block => {
                code_block_content.push_str(&text);
            }
            Event::Text(text) | Event::Code(text) if in_heading.is_some() => {
                heading_content.push_str(&text);
            }
            Event::Text(text) | Event::Code(text) if in_link => {
                link_text.push_str(&text);
            }
            Event::Text(text) | Event::Code(text) if in_table => {
                current_cell.push_str(&text);
            }
            Event::Code(code) => {
                segments.push(StyledSegment::InlineCode(code.to_string()));
            }
            Event::Text(text) => {
                if modifier.is_empty() {
                    segments.push(StyledSegment::Text(text.to_string()));
                } else {
                    segments.push(StyledSegment::Emphasis {
                        text: text.to_string(),
                        modifier,
                    });
                }
            }

            Event::End(TagEnd::Paragraph) => {
                segments.push(StyledSegment::ParagraphEnd);
            }
            Event::SoftBreak => {
                if in_heading.is_some() {
                    heading_content.push(' ');
                } else if in_table {
                    current_cell.push(' ');
                } else {
                    segments.push(StyledSegment::SoftBreak);
                }
            }
            Event::HardBreak => {
                segments.push(StyledSegment::HardBreak);
            }

            Event::Start(Tag::List(first_number)) => {
                list_stack.push((first_number.is_some(), first_number.unwrap_or(1)));
            }
            Event::End(TagEnd::List(_)) => {
                list_stack.pop();
                if list_stack.is_empty() {
                    segments.push(StyledSegment::ParagraphEnd);
                }
            }
            Event::Start(Tag::Item) => {
                let depth = list_stack.len();
                if let Some((ordered, number)) = list_stack.last_mut() {
                    segments.push(StyledSegment::ListItemStart {
                        ordered: *ordered,
                        number: *number,
                        depth,
                    });
                    *number += 1;
                }
            }
            Event::End(TagEnd::Item) => {
                segments.push(StyledSegment::ListItemEnd);
            }

            Event::Start(Tag::Strong) => modifier.insert(Modifier::BOLD),
            Event::End(TagEnd::Strong) => modifier.remove(Modifier::BOLD),
            Event::Start(Tag::Emphasis) => modifier.insert(Modifier::ITALIC),
            Event::End(TagEnd::Emphasis) => modifier.remove(Modifier::ITALIC),
            Event::Start(Tag::Strikethrough) => modifier.insert(Modifier::CROSSED_OUT),
            Event::End(TagEnd::Strikethrough) => modifier.remove(Modifier::CROSSED_OUT),

            Event::Start(Tag::BlockQuote) => {
                segments.push(StyledSegment::BlockQuoteStart);
            }
            Event::End(TagEnd::BlockQuote) => {
                segments.push(StyledSegment::BlockQuoteEnd);
            }

            Event::Rule => {
                segments.push(StyledSegment::Rule);
            }

            Event::Start(Tag::Link { dest_url, .. }) => {
                in_link = true;
                link_url = dest_url.to_string();
                link_text.clear();
            }
            Event::End(TagEnd::Link) => {
                let text = std::mem::take(&mut link_text);
                let url = std::mem::take(&mut link_url);
                if in_table {
                    current_cell.push_str(&text);
                } else if in_heading.is_some() {
                    heading_content.push_str(&text);
                } else {
                    segments.push(StyledSegment::Link { text, url });
                }
                in_link = false;
            }

            Event::Start(Tag::Table(_)) => {
                in_table = true;
                table_head.clear();
                table_rows.clear();
            }
            Event::End(TagEnd::Table) => {
                segments.push(StyledSegment::Table {
                    head: std::mem::take(&mut table_head),
                    rows: std::mem::take(&mut table_rows),
                });
                in_table = false;
            }
            Event::Start(Tag::TableHead) => {
                in_table_head = true;
                current_row.clear();
            }
            Event::End(TagEnd::TableHead) => {
                table_head = std::mem::take(&mut current_row);
                in_table_head = false;
            }
            Event::Start(Tag::TableRow) => {
                current_row.clear();
            }
            Event::End(TagEnd::TableRow) => {
                if !in_table_head {
                    table_rows.push(std::mem::take(&mut current_row));
                }
            }
            Event::Start(Tag::TableCell) => {
                current_cell.clear();
            }
            Event::End(TagEnd::TableCell) => {
                current_row.push(std::mem::take(&mut current_cell));
            }

            _ => {}
        }
    }

    segments
}

/// Wrap text to fit within width, breaking at word boundaries
/// Preserves leading/trailing whitespace to maintain spacing between segments
///
/// Uses unicode display width for correct handling of emojis, CJK, etc.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let leading_space = text.starts_with(char::is_whitespace);
    let trailing_space = text.ends_with(char::is_whitespace);

    let mut result = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0usize;

    if leading_space {
        current_line.push(' ');
        current_width = 1;
    }

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_line.is_empty() || (current_width == 1 && leading_space && result.is_empty()) {
            current_line.push_str(word);
            current_width += word_width;
        } else if current_width + 1 + word_width <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
        } else {
            result.push(current_line);
            current_line = word.to_string();
            current_width = word_width;
        }
    }

    if trailing_space && !current_line.is_empty() {
        current_line.push(' ');
    }

    if !current_line.is_empty() {
        result.push(current_line);
    }

    // Whitespace-only input
    if result.is_empty() {
        result.push(text.to_string());
    }

    result
}

/// Accumulates spans into wrapped lines
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    current_width: usize,
    max_width: usize,
}

impl LineBuilder {
    fn new(max_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            current_width: 0,
            max_width,
        }
    }

    /// Finish the current line, if it has anything on it
    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
        self.current_width = 0;
    }

    fn blank(&mut self) {
        self.flush();
        self.lines.push(Line::from(""));
    }

    /// Push a whole line, flushing first
    fn line(&mut self, line: Line<'static>) {
        self.flush();
        self.lines.push(line);
    }

    /// Push text that must not be split
    fn atom(&mut self, text: String, style: Style) {
        self.current_width += text.width();
        self.spans.push(Span::styled(text, style));
    }

    /// Push flowing text, wrapping at word boundaries
    fn text(&mut self, text: &str, style: Style) {
        let parts: Vec<&str> = text.split('\n').collect();
        for (i, part) in parts.iter().enumerate() {
            if !part.is_empty() {
                for (j, wrapped) in wrap_text(part, self.max_width).into_iter().enumerate() {
                    let line_width = wrapped.width();
                    let overflow =
                        self.current_width > 0 && self.current_width + line_width > self.max_width;
                    if j > 0 || overflow {
                        self.flush();
                    }
                    self.current_width += line_width;
                    self.spans.push(Span::styled(wrapped, style));
                }
            }
            if i < parts.len() - 1 {
                self.flush();
            }
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}

/// Convert parsed segments to ratatui Lines for rendering
///
/// Width controls text wrapping so the caller can compute scroll extents.
pub fn segments_to_lines(
    segments: &[StyledSegment],
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut out = LineBuilder::new(width);
    let base = Style::default().fg(theme.fg);
    let border = Style::default().fg(theme.border);

    for segment in segments {
        match segment {
            StyledSegment::Text(text) => out.text(text, base),

            StyledSegment::Emphasis { text, modifier } => {
                let mut style = base.add_modifier(*modifier);
                if modifier.contains(Modifier::CROSSED_OUT) {
                    style = style.add_modifier(Modifier::DIM);
                }
                out.text(text, style);
            }

            StyledSegment::InlineCode(code) => {
                out.atom(code.clone(), Style::default().fg(theme.code_inline));
            }

            StyledSegment::CodeBlock { code, .. } => {
                out.flush();
                let style = Style::default()
                    .fg(theme.code_block)
                    .add_modifier(Modifier::DIM);
                for line in code.lines() {
                    out.line(Line::from(Span::styled(format!("  {}", line), style)));
                }
                out.blank();
            }

            // Soft break = single newline in source, rendered as a space
            StyledSegment::SoftBreak => out.atom(" ".to_string(), base),

            StyledSegment::HardBreak => out.flush(),

            StyledSegment::ParagraphEnd => out.blank(),

            StyledSegment::Heading { level, text } => {
                let color = match level {
                    1 => theme.heading_1,
                    2 => theme.heading_2,
                    _ => theme.heading_3,
                };
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                let text = if *level == 1 {
                    text.to_uppercase()
                } else {
                    text.clone()
                };
                out.line(Line::from(Span::styled(text, style)));
                if *level <= 2 {
                    let rule = "─".repeat(width.saturating_sub(2).clamp(3, 40));
                    out.line(Line::from(Span::styled(rule, Style::default().fg(color))));
                }
            }

            StyledSegment::ListItemStart {
                ordered,
                number,
                depth,
            } => {
                out.flush();
                let indent = "  ".repeat(depth.saturating_sub(1));
                let marker = if *ordered {
                    format!("{}{}. ", indent, number)
                } else {
                    format!("{}• ", indent)
                };
                out.atom(marker, border);
            }

            StyledSegment::ListItemEnd => out.flush(),

            StyledSegment::BlockQuoteStart => {
                out.flush();
                out.atom("│ ".to_string(), border);
            }

            StyledSegment::BlockQuoteEnd => out.blank(),

            StyledSegment::Rule => {
                let rule = "─".repeat(width.saturating_sub(4).max(10));
                out.line(Line::from(Span::styled(rule, border)));
            }

            StyledSegment::Link { text, url } => {
                let display = if text.is_empty() || text == url {
                    url.clone()
                } else {
                    format!("{} ({})", text, url)
                };
                out.text(
                    &display,
                    Style::default()
                        .fg(theme.link)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }

            StyledSegment::Table { head, rows } => {
                out.flush();
                for line in render_table(head, rows, theme) {
                    out.line(line);
                }
                out.blank();
            }
        }
    }

    out.finish()
}

/// Strip control characters that can cause TUI rendering artifacts
///
/// Removes carriage returns, backspace, ANSI escape sequences, and other
/// ASCII control characters except tab and newline.
fn sanitize_for_tui(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => {
                // ESC [ <params> <letter>
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\t' | '\n' => result.push(ch),
            c if c.is_ascii_control() => {}
            _ => result.push(ch),
        }
    }

    result
}

/// Parse markdown and convert directly to Lines
pub fn render_markdown(markdown: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let sanitized = sanitize_for_tui(markdown);
    let segments = parse_markdown(&sanitized);
    segments_to_lines(&segments, width, theme)
}

// ============================================================================
// Table Rendering
// ============================================================================

/// Render a table with box-drawing characters and shared column widths
fn render_table(head: &[String], rows: &[Vec<String>], theme: &Theme) -> Vec<Line<'static>> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(head.len()))
        .max()
        .unwrap_or(0);

    // Minimum 3 columns of width for readability
    let mut widths = vec![3usize; columns];
    for row in std::iter::once(head).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let border = Style::default().fg(theme.border);
    let header_style = Style::default()
        .fg(theme.heading_3)
        .add_modifier(Modifier::BOLD);
    let cell_style = Style::default().fg(theme.fg);

    let row_line = |cells: &[String], style: Style| {
        let mut spans = vec![Span::styled("│ ".to_string(), border)];
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.width());
            spans.push(Span::styled(format!("{}{}", cell, " ".repeat(pad)), style));
            spans.push(Span::styled(" │ ".to_string(), border));
        }
        Line::from(spans)
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if !head.is_empty() {
        lines.push(row_line(head, header_style));

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(format!("├─{}─┤", separator), border)));
    }
    for row in rows {
        lines.push(row_line(row, cell_style));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'static>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_parse_heading_and_emphasis() {
        let segments = parse_markdown("## Experience\n\nShipped **three** services");

        assert_eq!(
            segments[0],
            StyledSegment::Heading {
                level: 2,
                text: "Experience".to_string()
            }
        );
        assert!(segments.contains(&StyledSegment::Emphasis {
            text: "three".to_string(),
            modifier: Modifier::BOLD,
        }));
    }

    #[test]
    fn test_parse_nested_emphasis() {
        let segments = parse_markdown("***both***");
        assert!(segments.iter().any(|s| matches!(
            s,
            StyledSegment::Emphasis { modifier, .. }
                if modifier.contains(Modifier::BOLD) && modifier.contains(Modifier::ITALIC)
        )));
    }

    #[test]
    fn test_parse_code_block() {
        let segments = parse_markdown("```rust\nfn main() {}\n```");
        assert!(matches!(
            &segments[0],
            StyledSegment::CodeBlock { lang: Some(l), code } if l == "rust" && code == "fn main() {}\n"
        ));
    }

    #[test]
    fn test_parse_ordered_list_numbers() {
        let segments = parse_markdown("3. one\n4. two");
        let numbers: Vec<u64> = segments
            .iter()
            .filter_map(|s| match s {
                StyledSegment::ListItemStart { number, .. } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec![3, 4]);
    }

    #[test]
    fn test_parse_table_collects_rows() {
        let segments = parse_markdown("| Skill | Years |\n|---|---|\n| Rust | 5 |\n| Go | 2 |");
        assert_eq!(
            segments[0],
            StyledSegment::Table {
                head: vec!["Skill".to_string(), "Years".to_string()],
                rows: vec![
                    vec!["Rust".to_string(), "5".to_string()],
                    vec!["Go".to_string(), "2".to_string()],
                ],
            }
        );
    }

    #[test]
    fn test_render_resume() {
        let md = "# Jane Doe\n\nBackend engineer.\n\n- Rust\n- Tokio\n\n[Site](https://jane.dev)";
        let lines = plain(&render_markdown(md, 80, &Theme::default()));

        assert_eq!(lines[0], "JANE DOE");
        assert!(lines.contains(&"Backend engineer.".to_string()));
        assert!(lines.contains(&"• Rust".to_string()));
        assert!(lines.contains(&"• Tokio".to_string()));
        assert!(lines.contains(&"Site (https://jane.dev)".to_string()));
    }

    #[test]
    fn test_render_wraps_to_width() {
        let md = "alpha beta gamma delta epsilon zeta eta theta";
        let lines = render_markdown(md, 12, &Theme::default());
        for line in plain(&lines) {
            assert!(line.width() <= 12, "line too wide: {:?}", line);
        }
        assert!(lines.len() >= 4);
    }

    #[test]
    fn test_table_columns_align() {
        let md = "| A | B |\n|---|---|\n| long cell | x |";
        let lines = plain(&render_markdown(md, 80, &Theme::default()));
        assert_eq!(lines[0].width(), lines[2].width());
    }

    #[test]
    fn test_sanitize_strips_escapes() {
        assert_eq!(sanitize_for_tui("a\x1b[31mred\x1b[0m\r\nb\x07"), "ared\nb");
    }

    #[test]
    fn test_wrap_text_long_word_kept_whole() {
        assert_eq!(wrap_text("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }
}
