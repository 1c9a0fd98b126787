use crate::calendar::CalendarEvent;
use crate::config::Spacing;
use crate::month::{MONTH_HEIGHT, MONTH_WIDTH};
use textwrap::core::display_width;
use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};

pub const BORDER_THICKNESS: u16 = 2;
pub const MAX_HEIGHT: u16 = MONTH_HEIGHT * 3 - BORDER_THICKNESS / 2;

#[derive(Debug, Clone)]
pub struct Preview {
    spacing: Spacing,
    content: String,
    lines: Vec<String>,
    width: usize,
    height: usize,
    y_offset: usize,
    focused: bool,
}

impl Preview {
    pub fn new(content: &str, spacing: Spacing) -> Self {
        let mut preview = Preview {
            spacing,
            content: String::new(),
            lines: Vec::new(),
            width: 0,
            height: 0,
            y_offset: 0,
            focused: false,
        };
        preview.set_content(content);
        preview
    }

    pub fn update(&mut self, event: &CalendarEvent) {
        match event {
            CalendarEvent::MoveUp | CalendarEvent::ScrollUp if self.focused => self.line_up(1),
            CalendarEvent::MoveDown | CalendarEvent::ScrollDown if self.focused => {
                self.line_down(1)
            }
            CalendarEvent::Resize { width, height } => {
                self.set_width(*width);
                self.set_height(*height);
            }
            _ => {}
        }
    }

    pub fn set_width(&mut self, container_width: u16) {
        let s = self.spacing;
        let chrome = i32::from(MONTH_WIDTH)
            + i32::from(s.preview_left_margin)
            + 2 * i32::from(s.preview_padding)
            + i32::from(s.left_padding)
            + i32::from(s.right_padding)
            + i32::from(BORDER_THICKNESS);
        let width = i32::from(container_width) - chrome;
        let width = width.clamp(0, i32::from(s.preview_max_width));
        self.width = if width < i32::from(s.preview_min_width) {
            0
        } else {
            width as usize
        };
        self.lines = wrap_lines(&self.content, self.width);
        self.set_y_offset(self.y_offset);
    }

    pub fn set_height(&mut self, container_height: u16) {
        let height = container_height.saturating_sub(BORDER_THICKNESS);
        self.height = usize::from(height.min(MAX_HEIGHT));
        self.set_y_offset(self.y_offset);
    }

    pub fn set_content(&mut self, raw: &str) {
        let mut content = String::with_capacity(raw.len());
        let mut last = None;
        for ch in raw.chars() {
            if ch == '\n' {
                if last == Some('\n') {
                    content.push_str("\n\n");
                } else {
                    content.push(' ');
                }
            } else {
                content.push(ch);
            }
            last = Some(ch);
        }
        self.content = content;
        self.y_offset = 0;
        self.lines = wrap_lines(&self.content, self.width);
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn unfocus(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    fn max_y_offset(&self) -> usize {
        self.line_count().saturating_sub(self.height)
    }

    pub fn set_y_offset(&mut self, offset: usize) {
        self.y_offset = offset.min(self.max_y_offset());
    }

    pub fn line_up(&mut self, n: usize) {
        if self.at_top() || n == 0 {
            return;
        }
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    pub fn line_down(&mut self, n: usize) {
        if self.at_bottom() || n == 0 {
            return;
        }
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    pub fn visible_lines(&self) -> &[String] {
        let top = self.y_offset.min(self.lines.len());
        let bottom = (self.y_offset + self.height).clamp(top, self.lines.len());
        &self.lines[top..bottom]
    }

    pub fn view(&self) -> Vec<String> {
        if self.width == 0 || self.width < usize::from(self.spacing.preview_min_width) {
            return Vec::new();
        }
        let mut rows = self.visible_lines().to_vec();
        rows.resize(self.height.max(rows.len()), " ".repeat(self.width));
        rows
    }
}

// Word-wraps to `width - 2`, hard-wraps leftovers to `width`, and pads every
// line to `width`.
fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    if content.is_empty() {
        return vec![" ".repeat(width)];
    }
    let soft = Options::new(width.saturating_sub(2).max(1))
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .break_words(false);
    let hard = Options::new(width)
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .break_words(true);
    content
        .split('\n')
        .flat_map(|paragraph| textwrap::wrap(paragraph, &soft))
        .flat_map(|line| {
            textwrap::wrap(&line, &hard)
                .into_iter()
                .map(|l| l.into_owned())
                .collect::<Vec<_>>()
        })
        .map(|line| pad(line, width))
        .collect()
}

fn pad(mut line: String, width: usize) -> String {
    let used = display_width(&line);
    if used < width {
        line.push_str(&" ".repeat(width - used));
    }
    line
}
