//! Line-numbered source listings for compiler diagnostics

use std::fmt;

use crate::header::SHADER_HEADER;

/// A line-numbered rendering of one or more source pieces.
///
/// Pieces are numbered as one continuous text, the way the compiler sees the
/// concatenated source: the counter carries over piece boundaries, and a
/// piece that does not end in a newline continues on the same line into the
/// next one. Each line renders as `"{:4}| {line}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing<'a> {
    pieces: Vec<&'a str>,
}

impl<'a> SourceListing<'a> {
    pub fn new(pieces: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
        }
    }

    /// Listing of [`SHADER_HEADER`] followed by `body`
    pub fn with_header(body: &'a str) -> Self {
        Self::new([SHADER_HEADER, body])
    }

    /// Numbered lines, 1-based
    pub fn lines(&self) -> Vec<(usize, String)> {
        let text = self.pieces.concat();
        split_lines(&text)
            .enumerate()
            .map(|(i, line)| (i + 1, line.to_owned()))
            .collect()
    }

    /// Text of line `number`, if the listing has that many lines
    pub fn line(&self, number: usize) -> Option<String> {
        let index = number.checked_sub(1)?;
        let text = self.pieces.concat();
        split_lines(&text).nth(index).map(str::to_owned)
    }
}

/// Lines of `text` without terminators; a final newline opens no extra line
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_terminator('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

impl fmt::Display for SourceListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (number, line) in self.lines() {
            writeln!(f, "{:4}| {}", number, line)?;
        }
        Ok(())
    }
}

/// Render [`SHADER_HEADER`] + `body` as a numbered listing
pub fn annotate_with_header(body: &str) -> String {
    SourceListing::with_header(body).to_string()
}
