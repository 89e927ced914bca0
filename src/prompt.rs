use anyhow::{bail, Result};
use std::io::{BufRead, Write};

/// Reads whitespace-delimited tokens from an input stream, one line at a time.
pub struct TokenReader<R> {
    reader: R,
    pending: Vec<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        TokenReader {
            reader,
            pending: Vec::new(),
        }
    }

    /// Returns the next token, reading further lines until one is found.
    pub fn next_token(&mut self) -> Result<String> {
        loop {
            if !self.pending.is_empty() {
                return Ok(self.pending.remove(0));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                bail!("Input ended before a value was entered");
            }
            self.pending = line.split_whitespace().map(str::to_owned).collect();
        }
    }
}

/// Prints `question` and reads the answer token.
pub fn ask<R: BufRead, W: Write>(
    tokens: &mut TokenReader<R>,
    out: &mut W,
    question: &str,
) -> Result<String> {
    writeln!(out, "{}", question)?;
    out.flush()?;
    tokens.next_token()
}
