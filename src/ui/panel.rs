//! Bordered panel layout
//!
//! Layout works on plain text and display widths; styling is applied by the
//! caller when the rows are written out.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MIN_WIDTH: usize = 8;
const TAB: &str = "    ";

/// A block of body text. The first `emphasis` bytes of its first row are
/// rendered with emphasis.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub emphasis: usize,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: 0,
        }
    }

    pub fn labeled(label: &str, text: &str) -> Self {
        Self {
            text: format!("{label} {text}"),
            emphasis: label.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub emphasis: usize,
    pub pad: usize,
}

#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub title: Option<String>,
    /// Rule lengths left and right of the title on the top border.
    pub rule_left: usize,
    pub rule_right: usize,
    pub rows: Vec<Row>,
    pub width: usize,
}

impl PanelLayout {
    pub fn new(title: Option<&str>, paragraphs: &[Paragraph], width: usize) -> Self {
        let width = width.max(MIN_WIDTH);
        let inner = width - 4;
        let span = width - 2;

        let title = title
            .map(|t| truncate_to_width(t, span - 2))
            .filter(|t| !t.is_empty());
        let (rule_left, rule_right) = match &title {
            Some(t) => {
                let fill = span - (t.width() + 2);
                (fill / 2, fill - fill / 2)
            }
            None => (span, 0),
        };

        let mut rows = Vec::new();
        for paragraph in paragraphs {
            let text = paragraph.text.replace('\t', TAB).replace('\r', "");
            let mut emphasis = paragraph.emphasis;
            for line in text.split('\n') {
                for row in wrap(line, inner) {
                    let pad = inner.saturating_sub(row.width());
                    let row_emphasis = floor_char_boundary(&row, emphasis);
                    rows.push(Row {
                        text: row,
                        emphasis: row_emphasis,
                        pad,
                    });
                    emphasis = 0;
                }
            }
        }

        Self {
            title,
            rule_left,
            rule_right,
            rows,
            width,
        }
    }

    /// Every terminal line of the panel as a sequence of segments.
    pub fn lines(&self) -> Vec<Vec<Segment<'_>>> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        lines.push(match &self.title {
            Some(title) => vec![
                Segment::border(format!("╭{} ", "─".repeat(self.rule_left))),
                Segment::new(SegmentKind::Title, title.as_str()),
                Segment::border(format!(" {}╮", "─".repeat(self.rule_right))),
            ],
            None => vec![Segment::border(format!("╭{}╮", "─".repeat(self.rule_left)))],
        });

        for row in &self.rows {
            let (head, tail) = row.text.split_at(row.emphasis);
            let mut line = vec![Segment::border("│ ")];
            if !head.is_empty() {
                line.push(Segment::new(SegmentKind::Emphasis, head));
            }
            line.push(Segment::new(SegmentKind::Body, tail));
            line.push(Segment::new(SegmentKind::Body, " ".repeat(row.pad)));
            line.push(Segment::border(" │"));
            lines.push(line);
        }

        lines.push(vec![Segment::border(format!("╰{}╯", "─".repeat(self.width - 2)))]);
        lines
    }

    /// Unstyled rendering, one string per terminal line.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines()
            .iter()
            .map(|line| line.iter().map(|segment| segment.text.as_ref()).collect())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Border,
    Title,
    Emphasis,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: Cow<'a, str>,
}

impl<'a> Segment<'a> {
    fn new(kind: SegmentKind, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn border(text: impl Into<Cow<'a, str>>) -> Self {
        Self::new(SegmentKind::Border, text)
    }
}

/// Greedy word wrap by display width; words wider than a row are broken.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width = word.width();
        let visible_width = word.trim_end_matches(' ').width();

        if current_width + visible_width > width && !current.is_empty() {
            rows.push(current.trim_end().to_string());
            current.clear();
            current_width = 0;
        }

        if visible_width > width {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    rows.push(current.trim_end().to_string());
                    current.clear();
                    current_width = 0;
                }
                if ch == ' ' && current.is_empty() {
                    continue;
                }
                current.push(ch);
                current_width += ch_width;
            }
        } else {
            current.push_str(word);
            current_width += word_width;
        }
    }

    rows.push(current.trim_end().to_string());
    rows
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
