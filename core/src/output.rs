use std::io::{self, Write};

/// Where the interpreter writes its response, one line at a time.
pub trait OutputSink {
    fn print_line(&mut self, line: &str);
}

/// Prints straight to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn print_line(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        // write errors (closed pipe) are ignored
        let _ = writeln!(stdout, "{}", line);
    }
}

/// Keeps lines in memory so a front end can show them as one response.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Joins everything captured so far and empties the buffer.
    pub fn take_response(&mut self) -> String {
        let response = self.lines.join("\n");
        self.lines.clear();
        response
    }
}

impl OutputSink for BufferSink {
    fn print_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
