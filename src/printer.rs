// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Word-wrapping output for the usage and help statements.
//!
//! A width of zero means "unlimited": nothing is wrapped.

use std::env;
use std::io::{self, Write};

#[cfg(any(unix, windows))]
use terminal_size::Width;

/// Below this width the argument list is not wrapped at all.
const MIN_LIST_WIDTH: usize = 20;

/// A titled group of `(name, description)` rows in the help statement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Section title (without the trailing colon).
    pub title: String,
    /// Rows of the section.
    pub items: Vec<(String, String)>,
}

/// Width of the terminal attached to `stream`, or zero if it is not a
/// terminal or the width is unknown.
///
/// The width is queried from the stream, falling back to `COLUMNS`.
pub(crate) fn terminal_width(stream: atty::Stream) -> usize {
    if !atty::is(stream) {
        return 0;
    }

    stream_width(stream)
        .or_else(columns)
        .unwrap_or(0)
}

fn columns() -> Option<usize> {
    env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
}

#[cfg(unix)]
fn stream_width(stream: atty::Stream) -> Option<usize> {
    use std::os::unix::io::AsRawFd;

    let fd = match stream {
        atty::Stream::Stdout => io::stdout().as_raw_fd(),
        atty::Stream::Stderr => io::stderr().as_raw_fd(),
        atty::Stream::Stdin => io::stdin().as_raw_fd(),
    };

    terminal_size::terminal_size_using_fd(fd).map(|(Width(w), _)| usize::from(w))
}

#[cfg(windows)]
fn stream_width(stream: atty::Stream) -> Option<usize> {
    use std::os::windows::io::AsRawHandle;

    let handle = match stream {
        atty::Stream::Stdout => io::stdout().as_raw_handle(),
        atty::Stream::Stderr => io::stderr().as_raw_handle(),
        atty::Stream::Stdin => io::stdin().as_raw_handle(),
    };

    terminal_size::terminal_size_using_handle(handle).map(|(Width(w), _)| usize::from(w))
}

#[cfg(not(any(unix, windows)))]
fn stream_width(_stream: atty::Stream) -> Option<usize> {
    None
}

/// Index at which to end a line of at most `width` characters, preferring
/// to break before a space.
fn split(text: &[char], width: usize) -> usize {
    if text.len() <= width {
        return text.len();
    }

    let mut it = 0;

    loop {
        let prev = it;

        while it != width && text[it] == ' ' {
            it += 1;
        }

        while it != width && text[it] != ' ' {
            it += 1;
        }

        if it == width {
            // A single word longer than the line is cut.
            if prev == 0 || text[width] == ' ' {
                return width;
            }

            return prev;
        }
    }
}

fn skip_ws(text: &[char], from: usize) -> usize {
    text[from..]
        .iter()
        .position(|c| *c != ' ')
        .map_or(text.len(), |offset| from + offset)
}

fn print<W: Write>(out: &mut W, text: &[char]) -> io::Result<()> {
    let line: String = text.iter().collect();

    writeln!(out, "{}", line)
}

/// Write `text` wrapped at `width`, indenting continuation lines by `indent`.
pub(crate) fn format_paragraph<W: Write>(
    out: &mut W,
    text: &str,
    indent: usize,
    width: usize,
) -> io::Result<()> {
    let text: Vec<char> = text.chars().collect();

    let mut width = if width < 2 { text.len() } else { width - 1 };
    let indent = if indent >= width { 0 } else { indent };

    let chunk = split(&text, width);
    print(out, &text[..chunk])?;

    let mut cur = skip_ws(&text, chunk);
    if cur == text.len() {
        return Ok(());
    }

    let pre = " ".repeat(indent);
    width -= indent;

    while cur != text.len() {
        let chunk = cur + split(&text[cur..], width);

        write!(out, "{}", pre)?;
        print(out, &text[cur..chunk])?;

        cur = skip_ws(&text, chunk);
    }

    Ok(())
}

/// Write the sections of `info` as two aligned columns.
pub(crate) fn format_list<W: Write>(out: &mut W, info: &[Chunk], width: usize) -> io::Result<()> {
    let mut len = info
        .iter()
        .flat_map(|chunk| chunk.items.iter())
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    if width < MIN_LIST_WIDTH {
        for chunk in info {
            writeln!(out)?;
            writeln!(out, "{}:", chunk.title)?;

            for (name, descr) in &chunk.items {
                let spaces = len - name.chars().count() + 1;
                writeln!(out, " {}{}{}", name, " ".repeat(spaces), descr)?;
            }
        }

        return Ok(());
    }

    // The name column takes at most a third of the line.
    len = (len + 2).min(width / 3) - 2;

    for chunk in info {
        writeln!(out)?;
        format_paragraph(out, &format!("{}:", chunk.title), 0, width)?;

        for (name, descr) in &chunk.items {
            let spaces = len.saturating_sub(name.chars().count()) + 1;
            let row = format!(" {}{}{}", name, " ".repeat(spaces), descr);

            format_paragraph(out, &row, len + 2, width)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str, indent: usize, width: usize) -> String {
        let mut out = Vec::new();
        format_paragraph(&mut out, text, indent, width).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn list(info: &[Chunk], width: usize) -> String {
        let mut out = Vec::new();
        format_list(&mut out, info, width).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_terminal_width_not_a_terminal() {
        // Test output is captured, so stdin is the only stream that may be a
        // terminal.
        if !atty::is(atty::Stream::Stdin) {
            assert_eq!(terminal_width(atty::Stream::Stdin), 0);
        }
    }

    #[test]
    fn test_split() {
        let text: Vec<char> = "hello world foo".chars().collect();

        assert_eq!(split(&text, 100), text.len());
        assert_eq!(split(&text, 8), 5);
        assert_eq!(split(&text, 11), 11);

        let long: Vec<char> = "abcdefghij klm".chars().collect();
        assert_eq!(split(&long, 4), 4);
    }

    #[test]
    fn test_format_paragraph() {
        #[derive(Debug)]
        struct TestData<'a> {
            text: &'a str,
            indent: usize,
            width: usize,
            result: &'a str,
        }

        let tests = &[
            TestData {
                text: "",
                indent: 0,
                width: 0,
                result: "\n",
            },
            TestData {
                text: "no wrapping at all for unlimited width",
                indent: 4,
                width: 0,
                result: "no wrapping at all for unlimited width\n",
            },
            TestData {
                text: "one two three four",
                indent: 0,
                width: 11,
                result: "one two\nthree four\n",
            },
            TestData {
                text: "usage: tool [-h] [--first ARG ...]",
                indent: 7,
                width: 20,
                result: "usage: tool [-h]\n       [--first ARG\n       ...]\n",
            },
            TestData {
                text: "abcdefghijkl",
                indent: 0,
                width: 6,
                result: "abcde\nfghij\nkl\n",
            },
            TestData {
                // Indent is dropped when it would not leave any room.
                text: "aaa bbb",
                indent: 10,
                width: 5,
                result: "aaa\nbbb\n",
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            assert_eq!(paragraph(d.text, d.indent, d.width), d.result, "{}", msg);
        }
    }

    #[test]
    fn test_format_list_unwrapped() {
        let info = vec![
            Chunk {
                title: "positional arguments".into(),
                items: vec![("INPUT".into(), "input file".into())],
            },
            Chunk {
                title: "optional arguments".into(),
                items: vec![
                    ("-h, --help".into(), "show this help message and exit".into()),
                    ("-o VAR".into(), "output".into()),
                ],
            },
        ];

        let expected = concat!(
            "\n",
            "positional arguments:\n",
            " INPUT      input file\n",
            "\n",
            "optional arguments:\n",
            " -h, --help show this help message and exit\n",
            " -o VAR     output\n",
        );

        assert_eq!(list(&info, 0), expected);
    }

    #[test]
    fn test_format_list_wrapped() {
        let info = vec![Chunk {
            title: "optional arguments".into(),
            items: vec![
                ("-h, --help".into(), "show this help message and exit".into()),
                ("-a".into(), "short".into()),
            ],
        }];

        let expected = concat!(
            "\n",
            "optional arguments:\n",
            " -h, --help show this help message\n",
            "            and exit\n",
            " -a         short\n",
        );

        assert_eq!(list(&info, 36), expected);
    }

    #[test]
    fn test_format_list_caps_name_column() {
        let info = vec![Chunk {
            title: "optional arguments".into(),
            items: vec![(
                "--a-really-long-option-name VALUE".into(),
                "description".into(),
            )],
        }];

        let value = list(&info, 30);

        // The name is longer than a third of the line so the description
        // wraps onto a continuation line.
        assert!(value.contains(" --a-really-long-option-name\n"));
        assert!(value.ends_with("description\n"));
    }
}
