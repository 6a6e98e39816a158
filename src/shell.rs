use std::io::{Read, Write};

use anyhow::{Context, Result};
use bytes::{Buf, BytesMut};
use log::{debug, info};

use crate::pattern::CompiledPattern;

const READ_CHUNK: usize = 4096;

/// Splits a byte stream into lines, buffering partial reads in a `BytesMut`.
struct LineReader<R> {
    inner: R,
    buf: BytesMut,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK),
            eof: false,
        }
    }

    /// Next line without its `\n` or `\r\n`, or `None` once input is exhausted.
    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
                let mut line = self.buf.split_to(newline + 1);
                line.truncate(newline);
                if line.last() == Some(&b'\r') {
                    line.truncate(newline - 1);
                }
                return decode(&line).map(Some);
            }

            if self.eof {
                if !self.buf.has_remaining() {
                    return Ok(None);
                }
                let rest = self.buf.split();
                return decode(&rest).map(Some);
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = self.inner.read(&mut chunk).context("failed to read input")?;
            if n == 0 {
                self.eof = true;
            } else {
                self.buf.extend_from_slice(&chunk[..n]);
            }
        }
    }
}

fn decode(line: &[u8]) -> Result<String> {
    String::from_utf8(line.to_vec()).context("input line is not valid UTF-8")
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit")
}

/// Interactive loop: compile a pattern once, then report a match result for
/// every input line until `exit` or end of input.
pub struct Shell<R, W> {
    input: LineReader<R>,
    output: W,
    dump: bool,
}

impl<R: Read, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: LineReader::new(input),
            output,
            dump: false,
        }
    }

    /// Print the postfix form and the automaton after compiling.
    pub fn dump(mut self, dump: bool) -> Self {
        self.dump = dump;
        self
    }

    /// Run the loop. When `pattern` is `None`, the first input line is taken
    /// as the pattern. A pattern that fails to compile is returned as an error
    /// before any input is matched.
    pub fn run(&mut self, pattern: Option<&str>) -> Result<()> {
        let pattern = match pattern {
            Some(p) => p.to_owned(),
            None => {
                self.prompt("Enter a regular expression: ")?;
                match self.input.next_line()? {
                    Some(line) => line,
                    None => return Ok(()),
                }
            }
        };

        let compiled = CompiledPattern::new(&pattern)
            .with_context(|| format!("failed to compile pattern `{pattern}`"))?;
        info!("pattern `{compiled}` compiled to {} states", compiled.state_count());

        if self.dump {
            writeln!(self.output, "postfix: {}", compiled.postfix())?;
            write!(self.output, "{}", compiled.nfa())?;
        }

        loop {
            self.prompt("Enter a string to match (or `exit`): ")?;
            let Some(line) = self.input.next_line()? else {
                debug!("end of input");
                break;
            };
            if is_exit(&line) {
                break;
            }
            writeln!(self.output, "{}", compiled.matches(&line))?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }
}
