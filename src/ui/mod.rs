//! Terminal rendering
//!
//! This is the only module that knows about crossterm.

mod panel;
mod prompt;

use std::io::{self, Write};

use crossterm::style::{ContentStyle, Stylize};

use crate::conversation::Conversation;
use crate::core::Transcript;

pub use panel::{PanelLayout, Paragraph, Segment, SegmentKind};
pub use prompt::{spawn_stdin_lines, Interrupts, LinePrompt};

const FALLBACK_WIDTH: usize = 80;

pub const WELCOME: &str = "Welcome to the LLM TUI Chat";
pub const GOODBYE: &str = "Exiting... Goodbye!";

#[derive(Debug, Clone, Copy, Default)]
struct PanelStyle {
    border: ContentStyle,
    title: ContentStyle,
    body: ContentStyle,
}

impl PanelStyle {
    fn uniform(style: ContentStyle) -> Self {
        Self {
            border: style,
            title: style,
            body: style,
        }
    }
}

/// Transcript written to a terminal (or any writer) as styled panels.
pub struct Terminal<W> {
    out: W,
    width: Option<usize>,
}

impl Terminal<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: None }
    }

    /// Pin the panel width instead of following the terminal size.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    fn width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(FALLBACK_WIDTH)
        })
    }

    fn panel(
        &mut self,
        title: Option<&str>,
        paragraphs: &[Paragraph],
        style: PanelStyle,
    ) -> io::Result<()> {
        let layout = PanelLayout::new(title, paragraphs, self.width());
        let emphasis = style.body.bold();

        for line in layout.lines() {
            for segment in &line {
                let segment_style = match segment.kind {
                    SegmentKind::Border => style.border,
                    SegmentKind::Title => style.title,
                    SegmentKind::Emphasis => emphasis,
                    SegmentKind::Body => style.body,
                };
                write!(self.out, "{}", segment_style.apply(&segment.text))?;
            }
            writeln!(self.out)?;
        }

        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Transcript for Terminal<W> {
    fn welcome(&mut self) -> io::Result<()> {
        let style = PanelStyle::uniform(ContentStyle::new().green().bold());
        self.panel(None, &[Paragraph::plain(WELCOME)], style)
    }

    fn context(&mut self, conversation: &Conversation) -> io::Result<()> {
        let paragraphs: Vec<Paragraph> = conversation
            .messages()
            .iter()
            .map(|m| Paragraph::labeled(&format!("{}:", m.role.label()), &m.content))
            .collect();
        let style = PanelStyle::uniform(ContentStyle::new().magenta());
        self.panel(Some("Context Window"), &paragraphs, style)
    }

    fn reply(&mut self, text: &str) -> io::Result<()> {
        let style = PanelStyle {
            title: ContentStyle::new().green().bold(),
            ..PanelStyle::default()
        };
        self.panel(Some("Assistant"), &[Paragraph::plain(text)], style)
    }

    fn goodbye(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", GOODBYE.red().bold())?;
        self.out.flush()
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            format!("An error occurred: {message}").red().bold()
        )?;
        self.out.flush()
    }
}
