// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// A simple example showing options, flags and positional arguments.
use arglite::{Mode, Parser};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Format {
    Text,
    Json,
}

arglite::labeled_enum!(Format {
    "text" => Format::Text,
    "json" => Format::Json,
});

fn main() {
    let mut verbose = false;
    let mut level = 1u32;
    let mut format = Format::Text;
    let mut output: Option<String> = None;
    let mut files: Vec<String> = Vec::new();

    let mut parser = Parser::new("Show what was specified on the command-line.")
        .use_answer_file('@');

    parser
        .set(&mut verbose, true, &["v", "verbose"])
        .help("display more details");
    parser
        .arg(&mut level, &["l", "level"])
        .meta("N")
        .help("level of detail")
        .opt();
    parser
        .arg(&mut format, &["f", "format"])
        .meta("FORMAT")
        .help("output format (text or json)")
        .opt();
    parser
        .opt_arg(&mut output, &["o", "output"])
        .meta("FILE")
        .help("where to write the results");
    parser
        .multi_arg(&mut files, &[])
        .meta("FILE")
        .help("files to process");

    // Displays the help or the error and exits if necessary.
    parser.parse(Mode::Exclusive, None);

    // XXX: essential!
    drop(parser);

    println!("verbose: {}", verbose);
    println!("level: {}", level);
    println!("format: {:?}", format);
    println!("output: {:?}", output);
    println!("files: {:?}", files);
}
