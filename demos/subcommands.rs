// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how to hand the remaining arguments to the parser of
/// a sub-command.
use arglite::{program_name, Mode, Parser};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Command {
    Build,
    Clean,
}

arglite::labeled_enum!(Command {
    "build" => Command::Build,
    "clean" => Command::Clean,
});

fn build(program: &str, args: Vec<String>) {
    let mut release = false;
    let mut jobs = 1usize;

    let mut parser = Parser::with_args("Build the project.", &format!("{} build", program), args);

    parser
        .set(&mut release, true, &["r", "release"])
        .help("build with optimisations");
    parser
        .arg(&mut jobs, &["j", "jobs"])
        .meta("N")
        .help("number of parallel jobs")
        .opt();

    parser.parse(Mode::Exclusive, None);

    drop(parser);

    println!("building (release: {}, jobs: {})", release, jobs);
}

fn clean(program: &str, args: Vec<String>) {
    let mut parser = Parser::with_args("Remove build results.", &format!("{} clean", program), args);

    parser.parse(Mode::Exclusive, None);

    println!("cleaning");
}

fn main() {
    let program = std::env::args()
        .next()
        .map(|a| program_name(&a))
        .unwrap_or_default();

    let mut verbose = false;
    let mut command = Command::Build;

    let mut parser = Parser::new("Build tool with sub-commands.").usage("[-v] COMMAND [ARGS...]");

    parser
        .set(&mut verbose, true, &["v", "verbose"])
        .help("display more details");
    parser
        .arg(&mut command, &[])
        .meta("COMMAND")
        .help("command to run (build or clean)");

    // Everything after the command is returned.
    let remaining = parser.parse(Mode::AllowSubcommands, None);

    drop(parser);

    if verbose {
        println!("command: {:?}, arguments: {:?}", command, remaining);
    }

    // The command consumed the first positional, so the rest belong to it.
    match command {
        Command::Build => build(&program, remaining),
        Command::Clean => clean(&program, remaining),
    }
}
