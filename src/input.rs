use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Supplies one line per prompt cycle. `Ok(None)` means end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Prints the prompt to `W` and reads newline-terminated lines from `R`.
pub struct LineReader<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineReader<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl LineReader<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineSource for LineReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.writer.write_all(prompt.as_bytes())?;
        self.writer.flush()?;

        let mut bytes = Vec::new();
        loop {
            match self.reader.read_until(b'\n', &mut bytes) {
                Ok(0) if bytes.is_empty() => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        // stray non-UTF-8 bytes become U+FFFD instead of failing the read
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_and_prompts() {
        let mut out = Vec::new();
        {
            let mut source = LineReader::new(Cursor::new("ls -la\n\nlast"), &mut out);
            assert_eq!(source.read_line(": ").unwrap().as_deref(), Some("ls -la"));
            assert_eq!(source.read_line(": ").unwrap().as_deref(), Some(""));
            assert_eq!(source.read_line(": ").unwrap().as_deref(), Some("last"));
            assert_eq!(source.read_line(": ").unwrap(), None);
        }
        assert_eq!(String::from_utf8(out).unwrap(), ": : : : ");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut source = LineReader::new(Cursor::new(b"echo \xff\xfe\nnext\n".to_vec()), Vec::new());
        assert_eq!(
            source.read_line("").unwrap().as_deref(),
            Some("echo \u{FFFD}\u{FFFD}")
        );
        assert_eq!(source.read_line("").unwrap().as_deref(), Some("next"));
    }

    #[test]
    fn test_strips_crlf() {
        let mut source = LineReader::new(Cursor::new("echo hi\r\n"), Vec::new());
        assert_eq!(source.read_line("").unwrap().as_deref(), Some("echo hi"));
    }
}
