// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to handle arguments with custom handlers and
/// how to return an error from them.
use arglite::{Context, Mode, Parser, Result};

fn main() {
    let mut level = 0u8;
    let mut seen: Vec<String> = Vec::new();

    let mut parser = Parser::new("Accept a level between 1 and 5.");

    // A handler taking a value. Annotate the closure arguments so the
    // right kind of handler is selected.
    parser
        .custom(
            |ctx: &Context, value: &str| -> Result<()> {
                match value.parse::<u8>() {
                    Ok(n) if (1..=5).contains(&n) => {
                        level = n;
                        Ok(())
                    }
                    // Reject any other values.
                    _ => Err(ctx.error(format!(
                        "{}: level must be between 1 and 5, not {:?}",
                        ctx.program(),
                        value
                    ))),
                }
            },
            &["l", "level"],
        )
        .meta("LEVEL")
        .help("level to use");

    // A flag handler that displays the help statement.
    parser
        .custom(|ctx: &Context| -> Result<()> { Err(ctx.help()) }, &["about"])
        .help("same as --help");

    // A handler without a context.
    parser
        .custom(
            |value: &str| -> Result<()> {
                seen.push(value.into());
                Ok(())
            },
            &["tag"],
        )
        .multi()
        .opt()
        .help("tag to record");

    parser.parse(Mode::Exclusive, None);

    drop(parser);

    println!("level: {}, tags: {:?}", level, seen);
}
