//! The interactive loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use switchback_foundation::{Error, Result};

use crate::editor::{CommandCompleter, LineEditor, ReadResult, RustylineEditor};
use crate::session::Session;

/// The interactive console.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Router, queue, and sender.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL whose tab completion asks the session's router.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(session: Session) -> Result<Self> {
        let completer = CommandCompleter::new(Arc::clone(session.router()), Arc::clone(session.sender()));
        let editor = RustylineEditor::new(completer)?;
        Ok(Self::with_editor(editor, session))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor.
    pub fn with_editor(editor: E, session: Session) -> Self {
        Self {
            editor,
            session,
            show_banner: true,
            prompt: "> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the loop until EOF, writing command output to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }
        let stdout = io::stdout();
        while self.step(&mut stdout.lock())? {}
        println!("\nGoodbye!");
        Ok(())
    }

    /// Reads and runs one line. Returns `Ok(false)` at EOF.
    fn step(&mut self, out: &mut impl Write) -> Result<bool> {
        let line = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => return Ok(false),
        };
        if line.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&line);
        match self.session.execute(&line) {
            Ok(messages) => write_lines(out, &messages)?,
            Err(e) => print_error(&e),
        }
        Ok(true)
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        let sender = self.session.sender();
        println!("\x1b[1;36mSwitchback\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Issuing commands as {} ({}).", sender.name(), sender.kind());
        println!("Try /help or /commands. Tab completes. Ctrl+D exits.\n");
        let _ = io::stdout().flush();
    }
}

/// Runs every line of `input` through `session`, writing what it says to
/// `out`. Returns the number of lines executed.
///
/// # Errors
///
/// Fails if reading input or writing output fails.
pub fn run_batch(session: &Session, input: impl BufRead, out: &mut impl Write) -> Result<usize> {
    let mut executed = 0;
    for line in input.lines() {
        let line = line.map_err(|e| Error::internal(e.to_string()))?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        match session.execute(&line) {
            Ok(messages) => write_lines(out, &messages)?,
            Err(e) => print_error(&e),
        }
        executed += 1;
    }
    Ok(executed)
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}").map_err(|e| Error::internal(e.to_string()))?;
    }
    Ok(())
}

fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
}
