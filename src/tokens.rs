// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Cursors over the tokens being parsed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Source-agnostic view of the tokens being parsed.
pub trait TokenStream {
    /// Move to the next token. Returns `false` once the tokens are exhausted.
    fn advance(&mut self) -> bool;

    /// Raw text of the token at the current position (empty if there is
    /// none).
    fn current(&self) -> &str;

    /// Stash the part of the current token being interpreted.
    fn set_peeked(&mut self, value: &str);

    /// The value last stashed by [TokenStream::set_peeked].
    fn peeked(&self) -> &str;

    /// Tokens not yet consumed, including the current one.
    fn remaining(&self) -> Vec<String>;
}

/// Cursor over the program arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgsCursor {
    tokens: Vec<String>,
    // None until the first advance().
    pos: Option<usize>,
    peeked: String,
}

impl ArgsCursor {
    /// Create a cursor positioned before the first token.
    pub fn new(tokens: Vec<String>) -> Self {
        ArgsCursor {
            tokens,
            pos: None,
            peeked: String::new(),
        }
    }
}

impl TokenStream for ArgsCursor {
    fn advance(&mut self) -> bool {
        let next = self.pos.map_or(0, |p| p + 1).min(self.tokens.len());

        self.pos = Some(next);

        next < self.tokens.len()
    }

    fn current(&self) -> &str {
        self.pos
            .and_then(|p| self.tokens.get(p))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    fn set_peeked(&mut self, value: &str) {
        self.peeked = value.into();
    }

    fn peeked(&self) -> &str {
        &self.peeked
    }

    fn remaining(&self) -> Vec<String> {
        let start = self.pos.unwrap_or(0).min(self.tokens.len());

        self.tokens[start..].to_vec()
    }
}

/// Cursor over the lines of an answer file.
///
/// Every line that is not entirely whitespace is one token, taken
/// literally: there is no quoting or escaping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileCursor {
    path: PathBuf,
    lines: ArgsCursor,
}

impl FileCursor {
    /// Read the answer file at `path`.
    ///
    /// Fails with [io::ErrorKind::InvalidData] if the file is not valid
    /// UTF-8.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;

        Ok(FileCursor::from_contents(path, &contents))
    }

    fn from_contents<P: AsRef<Path>>(path: P, contents: &str) -> Self {
        let lines = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(String::from)
            .collect();

        FileCursor {
            path: path.as_ref().to_path_buf(),
            lines: ArgsCursor::new(lines),
        }
    }

    /// Path the tokens were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStream for FileCursor {
    fn advance(&mut self) -> bool {
        self.lines.advance()
    }

    fn current(&self) -> &str {
        self.lines.current()
    }

    fn set_peeked(&mut self, value: &str) {
        self.lines.set_peeked(value)
    }

    fn peeked(&self) -> &str {
        self.lines.peeked()
    }

    fn remaining(&self) -> Vec<String> {
        self.lines.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_args_cursor() {
        let mut cursor = ArgsCursor::new(strings(&["-a", "foo", "bar"]));

        assert_eq!(cursor.current(), "");
        assert_eq!(cursor.remaining(), strings(&["-a", "foo", "bar"]));

        assert!(cursor.advance());
        assert_eq!(cursor.current(), "-a");
        assert_eq!(cursor.remaining(), strings(&["-a", "foo", "bar"]));

        assert!(cursor.advance());
        assert_eq!(cursor.current(), "foo");
        assert_eq!(cursor.remaining(), strings(&["foo", "bar"]));

        assert!(cursor.advance());
        assert_eq!(cursor.current(), "bar");

        assert!(!cursor.advance());
        assert_eq!(cursor.current(), "");
        assert!(cursor.remaining().is_empty());

        // Stays exhausted.
        assert!(!cursor.advance());
        assert!(cursor.remaining().is_empty());
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = ArgsCursor::default();

        assert!(!cursor.advance());
        assert_eq!(cursor.current(), "");
        assert!(cursor.remaining().is_empty());
    }

    #[test]
    fn test_peeked() {
        let mut cursor = ArgsCursor::new(strings(&["--opt=value"]));

        assert_eq!(cursor.peeked(), "");

        cursor.set_peeked("value");
        assert_eq!(cursor.peeked(), "value");
    }

    #[test]
    fn test_file_cursor_skips_blank_lines() {
        let cursor = FileCursor::from_contents("answers", "--opt\nVALUE\n\n  \n\t\n--flag\n");

        let mut cursor = cursor;
        let mut tokens = Vec::new();

        while cursor.advance() {
            tokens.push(cursor.current().to_string());
        }

        assert_eq!(tokens, strings(&["--opt", "VALUE", "--flag"]));
    }

    #[test]
    fn test_file_cursor_keeps_lines_literally() {
        let mut cursor = FileCursor::from_contents("answers", "  spaced value \r\n\"quoted\"\n");

        assert!(cursor.advance());
        assert_eq!(cursor.current(), "  spaced value ");
        assert!(cursor.advance());
        assert_eq!(cursor.current(), "\"quoted\"");
        assert!(!cursor.advance());
    }

    #[test]
    fn test_file_cursor_open() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "second").unwrap();

        let mut cursor = FileCursor::open(file.path()).unwrap();
        assert_eq!(cursor.path(), file.path());

        assert!(cursor.advance());
        assert_eq!(cursor.current(), "first");
        assert_eq!(cursor.remaining(), strings(&["first", "second"]));
        assert!(cursor.advance());
        assert_eq!(cursor.current(), "second");
        assert!(!cursor.advance());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        assert!(FileCursor::open(missing).is_err());
    }

    #[test]
    fn test_file_cursor_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"--opt\n\xff\xfe\n").unwrap();

        let err = FileCursor::open(file.path()).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
