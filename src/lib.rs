// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Small crate for parsing command-line arguments into typed variables.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Quickstart](#quickstart)
//! * [Examples](#examples)
//! * [Details](#details)
//! * [Terminology](#terminology)
//! * [Summary of features and behaviour](#summary-of-features-and-behaviour)
//! * [Limitations](#limitations)
//!
//! ---
//!
//! # Overview
//!
//! Each argument the program supports is declared against a [Parser],
//! together with a mutable reference to the variable that should receive
//! its value. Parsing converts each value to the type of its destination
//! and stores it there.
//!
//! # Quickstart
//!
//! > **Note:** If you are not familiar with command-line handling,
//! > see the [terminology](#terminology) section.
//!
//! 1. Create the variables that will hold the values, initialised to their
//!    defaults.
//!
//!    ```rust
//!    let mut verbose = false;
//!    let mut level = 1u32;
//!    let mut files: Vec<String> = Vec::new();
//!    ```
//!
//! 1. Create a [Parser]. [Parser::new] uses the arguments the program was
//!    started with; [Parser::with_args] takes them explicitly.
//!
//!    ```rust
//!    # use arglite::Parser;
//!    #
//!    let mut parser = Parser::with_args("some text", "myprog", vec!["-v".into()]);
//!    ```
//!
//! 1. Declare each argument. An argument has one or more names: names of a
//!    single character are short options (`-v`), longer names are long
//!    options (`--verbose`). An argument without names is positional.
//!
//!    ```rust
//!    # use arglite::Parser;
//!    #
//!    # let mut verbose = false;
//!    # let mut level = 1u32;
//!    # let mut files: Vec<String> = Vec::new();
//!    # let mut parser = Parser::with_args("some text", "myprog", vec!["-v".into()]);
//!    #
//!    parser.set(&mut verbose, true, &["v", "verbose"]).help("be chatty");
//!    parser.arg(&mut level, &["l", "level"]).meta("N").opt();
//!    parser.multi_arg(&mut files, &[]).meta("FILE").opt();
//!    ```
//!
//! 1. Parse the command-line. [Parser::parse] displays the help statement
//!    or the error and terminates the program as necessary; [Parser::try_parse]
//!    returns the error instead.
//!
//!    ```rust
//!    # use arglite::{Mode, Parser};
//!    #
//!    # let mut verbose = false;
//!    # let mut parser = Parser::with_args("some text", "myprog", vec!["-v".into()]);
//!    # parser.set(&mut verbose, true, &["v", "verbose"]).help("be chatty");
//!    #
//!    let result = parser.try_parse(Mode::Exclusive);
//!
//!    // The variables are borrowed by the parser until it is dropped.
//!    drop(parser);
//!
//!    assert!(result.is_ok());
//!    assert!(verbose);
//!    ```
//!
//! # Examples
//!
//! ```rust
//! use arglite::{Mode, Parser, Result};
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! enum Color {
//!     Red,
//!     Green,
//! }
//!
//! arglite::labeled_enum!(Color {
//!     "red" => Color::Red,
//!     "green" => Color::Green,
//! });
//!
//! fn main() -> Result<()> {
//!     let args = vec!["-c", "red", "--size=3", "input.txt", "-q"];
//!
//!     let mut color = Color::Green;
//!     let mut size: Option<u8> = None;
//!     let mut quiet = false;
//!     let mut input = String::new();
//!
//!     let mut parser = Parser::with_args(
//!         "paint a file",
//!         "paint",
//!         args.iter().map(|a| a.to_string()).collect(),
//!     );
//!
//!     parser.arg(&mut color, &["c", "color"]).help("colour to use");
//!     parser.opt_arg(&mut size, &["size"]).meta("N");
//!     parser.set(&mut quiet, true, &["q"]);
//!     parser.arg(&mut input, &[]).meta("INPUT");
//!
//!     parser.try_parse(Mode::Exclusive)?;
//!
//!     drop(parser);
//!
//!     assert_eq!(color, Color::Red);
//!     assert_eq!(size, Some(3));
//!     assert!(quiet);
//!     assert_eq!(input, "input.txt");
//!
//!     Ok(())
//! }
//! ```
//!
//! For further examples, try out the programs in the `demos/` directory:
//!
//! ```bash
//! $ cargo run --example simple -- -v --level 3 one two
//! $ cargo run --example subcommands -- --verbose build --release
//! $ cargo run --example custom-handler -- --level 7
//! ```
//!
//! # Details
//!
//! ## Terminology
//!
//! - An "argument" is a value passed to a program on the command-line.
//!
//! - An "option" is an argument that starts with a dash. A "short option"
//!   has a single character name (`-v`), a "long option" a longer one
//!   (`--verbose`).
//!
//! - An "option argument" is the value bound to an option: the next
//!   argument (`-l 3`, `--level 3`), the rest of the short option
//!   (`-l3`) or the text following `=` (`--level=3`).
//!
//! - A "flag" is an option that does not take a value.
//!
//! - A "positional argument" is an argument that is not an option.
//!
//! - An "answer file" is a file whose lines are parsed as if they had been
//!   specified on the command-line in place of its name (see
//!   [Parser::use_answer_file]).
//!
//! ## Actions
//!
//! How an argument is handled depends on how it was declared:
//!
//! | Method | Effect | Required by default |
//! |-|-|-|
//! | [Parser::arg] | Store the converted value | yes |
//! | [Parser::opt_arg] | Store `Some(value)` | no |
//! | [Parser::multi_arg] | Add each value to a collection | yes |
//! | [Parser::set] | Store a constant, no value taken | no |
//! | [Parser::custom] | Call a handler (see [Handler]) | flag: no, value: yes |
//!
//! The [Builder] returned by each method changes the defaults.
//!
//! ## Conversions
//!
//! Values are converted by the [Convert] trait, implemented for strings,
//! paths, all integer types and [Option]. Enumerations can be supported
//! with the [labeled_enum!] macro. Any other type can implement [Convert]
//! directly.
//!
//! ## Sub-commands
//!
//! In [Mode::AllowSubcommands] mode, parsing stops at the first argument
//! that is not recognised, and that argument and all following ones are
//! returned. They can then be handed to another [Parser].
//!
//! # Summary of features and behaviour
//!
//! - Short and long options, clusters of short options (`-vq`).
//! - Options and positional arguments can be intermingled.
//! - Values are converted to the type of their destination.
//! - Required arguments are checked.
//! - Automatically generates help / usage statement (`-h`, `--help`).
//!   Asking for help leaves the variables untouched, unless a custom
//!   handler or an invalid value comes before it.
//! - Output is wrapped to the width of the terminal.
//! - All messages can be translated (see [Translator]).
//!
//! # Limitations
//!
//! - `--` is not special: it is reported as an unrecognised option.
//! - Options cannot have an optional value.
//! - Answer files contain one argument per line with no quoting.

mod actions;
mod convert;
mod error;
mod help;
mod parser;
mod printer;
mod tokens;
mod translator;

pub use actions::{shape, Builder, Callback, Collection, Context, Handler};
pub use convert::{convert_enum, Convert, LabeledEnum};
pub use error::{ConversionError, Error, Result, ERROR_EXIT_CODE};
pub use parser::{get_args, program_name, Exit, Mode, Parser, ProcessExit, Settings};
pub use printer::Chunk;
pub use tokens::{ArgsCursor, FileCursor, TokenStream};
pub use translator::{DefaultTranslator, Lng, Translator};
