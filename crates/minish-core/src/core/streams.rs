//! Input and output streams handed to commands.

use crate::models::FileStream;

/// A sink for command output.
pub trait OutputStream {
    fn write(&mut self, text: &str);

    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }
}

/// A source of command input.
pub trait InputStream {
    /// Consume everything that is left.
    fn read(&mut self) -> String;

    /// Everything that is left, without consuming it.
    fn peek(&self) -> &str;

    /// Consume up to and including the next newline; the newline is dropped.
    fn read_line(&mut self) -> Option<String>;

    /// The next line without consuming it.
    fn peek_line(&self) -> Option<&str>;
}

/// Collects output in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferOutputStream {
    buffer: String,
}

impl BufferOutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn into_contents(self) -> String {
        self.buffer
    }
}

impl OutputStream for BufferOutputStream {
    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

impl OutputStream for FileStream<'_> {
    fn write(&mut self, text: &str) {
        self.push(text);
    }
}

/// Input served from an in-memory string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferInputStream {
    buffer: String,
    pos: usize,
}

impl BufferInputStream {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            buffer: contents.into(),
            pos: 0,
        }
    }
}

impl InputStream for BufferInputStream {
    fn read(&mut self) -> String {
        let rest = self.buffer[self.pos..].to_string();
        self.pos = self.buffer.len();
        rest
    }

    fn peek(&self) -> &str {
        &self.buffer[self.pos..]
    }

    fn read_line(&mut self) -> Option<String> {
        let line = self.peek_line()?.to_string();
        let rest = &self.buffer[self.pos..];
        self.pos += match rest.find('\n') {
            Some(idx) => idx + 1,
            None => rest.len(),
        };
        Some(line)
    }

    fn peek_line(&self) -> Option<&str> {
        let rest = self.peek();
        if rest.is_empty() {
            return None;
        }
        Some(rest.split('\n').next().unwrap_or(rest))
    }
}

/// The three standard streams of one command invocation.
pub struct StreamSet<'a> {
    pub ins: &'a mut dyn InputStream,
    pub out: &'a mut dyn OutputStream,
    pub err: &'a mut dyn OutputStream,
}

impl<'a> StreamSet<'a> {
    pub fn new(
        ins: &'a mut dyn InputStream,
        out: &'a mut dyn OutputStream,
        err: &'a mut dyn OutputStream,
    ) -> Self {
        Self { ins, out, err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{File, FileMode};

    #[test]
    fn test_buffer_output() {
        let mut out = BufferOutputStream::new();
        out.write("a");
        out.write_line("b");
        assert_eq!(out.contents(), "ab\n");
    }

    #[test]
    fn test_file_stream_as_output() {
        let mut file = File::new("x");
        {
            let mut stream = file.open(FileMode::Append);
            stream.write_line("y");
        }
        assert_eq!(file.contents(), "xy\n");
    }

    #[test]
    fn test_input_lines() {
        let mut input = BufferInputStream::new("one\ntwo\nthree");
        assert_eq!(input.peek_line(), Some("one"));
        assert_eq!(input.read_line().as_deref(), Some("one"));
        assert_eq!(input.read_line().as_deref(), Some("two"));
        assert_eq!(input.peek(), "three");
        assert_eq!(input.read_line().as_deref(), Some("three"));
        assert_eq!(input.read_line(), None);
    }

    #[test]
    fn test_input_read_all() {
        let mut input = BufferInputStream::new("rest\nof it");
        input.read_line();
        assert_eq!(input.read(), "of it");
        assert_eq!(input.read(), "");
    }
}
