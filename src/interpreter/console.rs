//! Where program output goes and where `inquire` reads from.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

pub trait Console {
    /// Emits one full line of program output.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Shows an `inquire` prompt, without a line break.
    fn prompt(&mut self, text: &str) -> io::Result<()>;

    /// Reads one line without its terminator. `None` means end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Process stdout/stdin, with an optional copy of all output in a run log.
#[derive(Default)]
pub struct StdConsole {
    log: Option<BufWriter<File>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: File) -> Self {
        Self {
            log: Some(BufWriter::new(log)),
        }
    }
}

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        if let Some(log) = self.log.as_mut() {
            writeln!(log, "{}", line)?;
            log.flush()?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", text)?;
        stdout.flush()?;
        if let Some(log) = self.log.as_mut() {
            write!(log, "{}", text)?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = strip_terminator(line);
        if let Some(log) = self.log.as_mut() {
            writeln!(log, "{}", line)?;
            log.flush()?;
        }
        Ok(Some(line))
    }
}

/// In-memory console: scripted input lines, captured output.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    input: VecDeque<String>,
    pub output: String,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push_str(line);
        self.output.push('\n');
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        (**self).prompt(text)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("42\n".to_string()), "42");
        assert_eq!(strip_terminator("42\r\n".to_string()), "42");
        assert_eq!(strip_terminator("42".to_string()), "42");
        assert_eq!(strip_terminator(" a \n".to_string()), " a ");
    }

    #[test]
    fn test_buffer_console() {
        let mut console = BufferConsole::with_input(["first"]);
        console.prompt("name? ").unwrap();
        assert_eq!(console.read_line().unwrap(), Some("first".to_string()));
        assert_eq!(console.read_line().unwrap(), None);
        console.write_line("hello").unwrap();
        assert_eq!(console.output, "name? hello\n");
    }
}
