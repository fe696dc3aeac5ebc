//! Line feeder: supplies the tokenizer with input one line at a time.

use std::io::{BufRead, BufReader, Read};

use crate::error::Result;

/// One physical input line, without its terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    /// Line content, with `\n` and a preceding `\r` stripped
    pub text: String,
}

/// Reads `\n`-terminated lines from a byte stream.
pub struct LineFeeder<R> {
    reader: BufReader<R>,
    line: usize,
    exhausted: bool,
}

impl<R: Read> LineFeeder<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: 0,
            exhausted: false,
        }
    }

    /// Number of physical lines read so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Next line that holds something other than whitespace or a comment.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        while let Some(line) = self.next_continuation()? {
            let trimmed = line.text.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                tracing::trace!(line = line.number, "skipping blank or comment line");
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    /// Next physical line, whatever it contains.
    pub fn next_continuation(&mut self) -> Result<Option<Line>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut text = String::new();
        if self.reader.read_line(&mut text)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        self.line += 1;

        Ok(Some(Line {
            number: self.line,
            text,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<(usize, String)> {
        let mut feeder = LineFeeder::new(input.as_bytes());
        let mut out = Vec::new();
        while let Some(line) = feeder.next_line().unwrap() {
            out.push((line.number, line.text));
        }
        out
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let input = "# header\n\n   \n<a> <b> <c> .\n\t# indented comment\n<d> <e> <f> .";
        assert_eq!(
            lines(input),
            vec![
                (4, "<a> <b> <c> .".to_string()),
                (6, "<d> <e> <f> .".to_string()),
            ]
        );
    }

    #[test]
    fn test_strips_crlf() {
        assert_eq!(
            lines("one\r\ntwo\r\n"),
            vec![(1, "one".to_string()), (2, "two".to_string())]
        );
    }

    #[test]
    fn test_continuation_keeps_blank_lines() {
        let mut feeder = LineFeeder::new("a\n\n# not a comment here\n".as_bytes());
        assert_eq!(feeder.next_line().unwrap().unwrap().text, "a");
        assert_eq!(feeder.next_continuation().unwrap().unwrap().text, "");
        assert_eq!(
            feeder.next_continuation().unwrap().unwrap().text,
            "# not a comment here"
        );
        assert_eq!(feeder.next_continuation().unwrap(), None);
        assert_eq!(feeder.next_line().unwrap(), None);
        assert_eq!(feeder.line(), 3);
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = b"<a> <b> \"\xff\" .\n";
        let mut feeder = LineFeeder::new(bytes);
        assert!(matches!(
            feeder.next_line(),
            Err(crate::DecodeError::Io(_))
        ));
    }
}
