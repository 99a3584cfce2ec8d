//! Line prompt on stdin
//!
//! Stdin is read on a dedicated thread: a blocking read cannot be cancelled,
//! and leaving one inside the runtime would hold up shutdown after Ctrl-C.

use std::io::{self, BufRead, Write};
use std::thread;

use async_trait::async_trait;
use crossterm::style::Stylize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::{InputSource, UserInput};

/// Lines read from stdin, newline stripped. The channel closes at end of input.
pub fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
        debug!("stdin reader finished");
    });

    rx
}

/// One Ctrl-C listener for the whole session.
///
/// The listener is installed once and kept; an interrupt that arrives while
/// nothing is waiting stays queued until the next `recv`.
pub struct Interrupts {
    source: InterruptSource,
}

enum InterruptSource {
    #[cfg(unix)]
    Unix(tokio::signal::unix::Signal),
    #[cfg(windows)]
    Windows(tokio::signal::windows::CtrlC),
    Channel(mpsc::UnboundedReceiver<()>),
}

impl Interrupts {
    /// Install the process Ctrl-C handler.
    #[cfg(unix)]
    pub fn ctrl_c() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            source: InterruptSource::Unix(signal(SignalKind::interrupt())?),
        })
    }

    #[cfg(windows)]
    pub fn ctrl_c() -> io::Result<Self> {
        Ok(Self {
            source: InterruptSource::Windows(tokio::signal::windows::ctrl_c()?),
        })
    }

    /// Interrupts delivered by hand, one per `()` sent.
    pub fn from_channel(rx: mpsc::UnboundedReceiver<()>) -> Self {
        Self {
            source: InterruptSource::Channel(rx),
        }
    }

    /// Wait for the next interrupt. Never resolves once the source is gone.
    pub async fn recv(&mut self) {
        let received = match &mut self.source {
            #[cfg(unix)]
            InterruptSource::Unix(signal) => signal.recv().await,
            #[cfg(windows)]
            InterruptSource::Windows(ctrl_c) => ctrl_c.recv().await,
            InterruptSource::Channel(rx) => rx.recv().await,
        };
        if received.is_none() {
            futures::future::pending::<()>().await
        }
    }
}

pub struct LinePrompt<W> {
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
    interrupts: Interrupts,
    out: W,
}

impl<W: Write + Send> LinePrompt<W> {
    pub fn new(
        lines: mpsc::UnboundedReceiver<io::Result<String>>,
        interrupts: Interrupts,
        out: W,
    ) -> Self {
        Self {
            lines,
            interrupts,
            out,
        }
    }

    fn show_prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{}: ", "You".bold().blue())?;
        self.out.flush()
    }
}

#[async_trait]
impl<W: Write + Send> InputSource for LinePrompt<W> {
    async fn read_line(&mut self) -> io::Result<UserInput> {
        self.show_prompt()?;

        tokio::select! {
            biased;
            _ = self.interrupts.recv() => Ok(UserInput::Interrupted),
            line = self.lines.recv() => match line {
                Some(line) => Ok(UserInput::Line(line?.trim_end_matches('\r').to_string())),
                None => Ok(UserInput::Interrupted),
            },
        }
    }

    async fn interrupted(&mut self) {
        self.interrupts.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready};

    fn prompt(lines: &[&str]) -> LinePrompt<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            tx.send(Ok(line.to_string())).unwrap();
        }
        drop(tx);
        LinePrompt::new(rx, quiet(), Vec::new())
    }

    fn quiet() -> Interrupts {
        let (_tx, rx) = mpsc::unbounded_channel();
        Interrupts::from_channel(rx)
    }

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let mut prompt = prompt(&["hello", "second\r"]);

        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Line("hello".into()));
        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Line("second".into()));
    }

    #[tokio::test]
    async fn test_end_of_input_is_interrupt() {
        let mut prompt = prompt(&[]);
        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Interrupted);
    }

    #[tokio::test]
    async fn test_empty_line_is_a_message() {
        let mut prompt = prompt(&[""]);
        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Line(String::new()));
    }

    #[tokio::test]
    async fn test_prints_prompt_label() {
        let mut prompt = prompt(&["x"]);
        prompt.read_line().await.unwrap();
        let printed = String::from_utf8(prompt.out.clone()).unwrap();
        assert!(printed.contains("You"));
        assert!(printed.ends_with(": "));
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Err(io::Error::new(io::ErrorKind::InvalidData, "not utf-8")))
            .unwrap();
        let mut prompt = LinePrompt::new(rx, quiet(), Vec::new());

        let err = prompt.read_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_waits_for_input() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut prompt = LinePrompt::new(rx, quiet(), Vec::new());

        {
            let mut task = tokio_test::task::spawn(prompt.read_line());
            assert_pending!(task.poll());

            tx.send(Ok("late".to_string())).unwrap();
            assert!(task.is_woken());
            let line = assert_ready!(task.poll()).unwrap();
            assert_eq!(line, UserInput::Line("late".into()));
        }
    }

    #[tokio::test]
    async fn test_interrupt_before_wait_is_kept() {
        let (_lines_tx, lines) = mpsc::unbounded_channel();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut prompt = LinePrompt::new(lines, Interrupts::from_channel(rx), Vec::new());

        // Both land while nobody is listening.
        tx.send(()).unwrap();
        tx.send(()).unwrap();

        let mut task = tokio_test::task::spawn(prompt.interrupted());
        assert_ready!(task.poll());
        drop(task);
        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Interrupted);
    }

    #[tokio::test]
    async fn test_interrupt_wins_over_queued_line() {
        let (lines_tx, lines) = mpsc::unbounded_channel();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut prompt = LinePrompt::new(lines, Interrupts::from_channel(rx), Vec::new());

        lines_tx.send(Ok("typed".to_string())).unwrap();
        tx.send(()).unwrap();

        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Interrupted);
        assert_eq!(prompt.read_line().await.unwrap(), UserInput::Line("typed".into()));
    }

    #[tokio::test]
    async fn test_closed_interrupt_source_never_fires() {
        let (_lines_tx, lines) = mpsc::unbounded_channel();
        let (tx, rx) = mpsc::unbounded_channel::<()>();
        drop(tx);
        let mut prompt = LinePrompt::new(lines, Interrupts::from_channel(rx), Vec::new());

        let mut task = tokio_test::task::spawn(prompt.interrupted());
        assert_pending!(task.poll());
    }
}
