//! Key cleanup helpers and a bounded line reader.

use std::io::{self, BufRead};

/// `s` without trailing whitespace.
pub fn trim_tail(s: &str) -> &str {
    s.trim_end()
}

/// Copy of `s` holding only its ASCII letters and digits.
pub fn strip_non_alnum(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Reads one line per call with the terminator removed, keeping at most
/// `max_len` bytes of each line (cut back to a character boundary).
pub struct LineReader<R> {
    reader: R,
    max_len: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R, max_len: usize) -> Self {
        Self {
            reader,
            max_len,
            buf: Vec::new(),
        }
    }

    /// Next line, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        let mut line = String::from_utf8_lossy(&self.buf).into_owned();
        if line.len() > self.max_len {
            let mut end = self.max_len;
            while !line.is_char_boundary(end) {
                end -= 1;
            }
            line.truncate(end);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
