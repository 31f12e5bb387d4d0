// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, trace, warn};

use crate::actions::{Action, Builder, Collection, Context, Handler};
use crate::convert::Convert;
use crate::error::{Error, Result};
use crate::help;
use crate::printer::{self, Chunk};
use crate::tokens::{ArgsCursor, FileCursor, TokenStream};
use crate::translator::{DefaultTranslator, Lng, Translator};

const OPT_PREFIX: char = '-';
const LONG_OPT_PREFIX: &str = "--";
const HELP_LONG: &str = "help";
const HELP_SHORT: char = 'h';

/// Answer files may include other answer files up to this depth.
const MAX_ANSWER_FILE_DEPTH: usize = 16;

/// What to do with a token that does not match any declared argument.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    /// Fail with [Error::UnrecognizedArgument].
    Exclusive,
    /// Stop parsing and return the unmatched token and everything after it,
    /// so that they can be handed to the parser of a sub-command.
    AllowSubcommands,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Exclusive
    }
}

/// Settings used to control the parsers behaviour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Handle `-h` and `--help` automatically.
    provide_help: bool,

    /// If set, a token starting with this character names an answer file
    /// whose lines are parsed as if they had been specified instead.
    answer_file_marker: Option<char>,

    /// Width to wrap the usage, help and error output at. Detected from the
    /// terminal if not set.
    width: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            provide_help: true,
            answer_file_marker: None,
            width: None,
        }
    }
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Specify whether `-h` and `--help` are handled automatically.
    pub fn provide_help(self, provide_help: bool) -> Self {
        Settings {
            provide_help,
            ..self
        }
    }

    /// Enable answer files, introduced by `marker` (usually `@`).
    pub fn answer_file_marker(self, marker: char) -> Self {
        Settings {
            answer_file_marker: Some(marker),
            ..self
        }
    }

    /// Wrap output at `width` columns (zero: never wrap).
    pub fn width(self, width: usize) -> Self {
        Settings {
            width: Some(width),
            ..self
        }
    }
}

/// Terminates the program once the help or an error has been displayed.
pub trait Exit {
    /// Terminate with the specified status.
    fn exit(&self, code: i32) -> !;
}

impl<'a> fmt::Debug for dyn Exit + 'a {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Exit: {:p}", self)
    }
}

/// Terminates the process.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessExit;

impl Exit for ProcessExit {
    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// Get a list of all command-line arguments specified to the program with
/// the program name (the first argument) removed.
pub fn get_args() -> Vec<String> {
    env::args().skip(1).collect()
}

/// Program name as displayed in the usage line: `arg0` without its
/// directory (and, on Windows, without its extension).
pub fn program_name(arg0: &str) -> String {
    let path = Path::new(arg0);

    let name = if cfg!(windows) {
        path.file_stem()
    } else {
        path.file_name()
    };

    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg0.into())
}

/// State of one pass over the tokens.
#[derive(Debug)]
struct Pass {
    // Visit the actions. If unset, only look for a help request.
    apply: bool,
    // Positionals that already have a value.
    claimed: Vec<bool>,
    ctx: Context,
}

impl Pass {
    fn new(apply: bool, actions: usize, ctx: Context) -> Self {
        Pass {
            apply,
            claimed: vec![false; actions],
            ctx,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Unmatched input handed back to the caller.
    Stop(Vec<String>),
    /// End of a check pass: what follows depends on a custom handler.
    Halt,
}

/// The command-line parser.
///
/// Arguments are declared against the parser, which writes the values it
/// parses through the references it was given. The parser must be dropped
/// before those destinations can be read again.
#[derive(Debug)]
pub struct Parser<'a> {
    actions: Vec<Action<'a>>,
    program: String,
    usage: String,
    description: String,
    settings: Settings,
    args: Vec<String>,
    translator: Box<dyn Translator + 'a>,
    exit: Box<dyn Exit + 'a>,
}

impl<'a> Parser<'a> {
    /// Create a parser for the arguments the program was started with.
    pub fn new(description: &str) -> Self {
        let mut args = env::args();
        let program = args.next().map(|a| program_name(&a)).unwrap_or_default();

        Parser::with_args(description, &program, args.collect())
    }

    /// Create a parser for an explicit set of arguments (without the
    /// program name).
    pub fn with_args(description: &str, program: &str, args: Vec<String>) -> Self {
        Parser {
            actions: Vec::new(),
            program: program.into(),
            usage: String::new(),
            description: description.into(),
            settings: Settings::default(),
            args,
            translator: Box::new(DefaultTranslator),
            exit: Box::new(ProcessExit),
        }
    }

    /// Specify the program name shown in the usage line.
    pub fn program(self, program: &str) -> Self {
        Parser {
            program: program.into(),
            ..self
        }
    }

    /// Replace the generated argument list of the usage line.
    pub fn usage(self, usage: &str) -> Self {
        Parser {
            usage: usage.into(),
            ..self
        }
    }

    /// Specify the description shown in the help statement.
    pub fn description(self, description: &str) -> Self {
        Parser {
            description: description.into(),
            ..self
        }
    }

    /// Specify any settings for the parser.
    pub fn settings(self, settings: Settings) -> Self {
        Parser { settings, ..self }
    }

    /// Specify whether `-h` and `--help` are handled automatically.
    ///
    /// # Note
    ///
    /// This is an alternative to calling the `settings()` method.
    pub fn provide_help(self, provide_help: bool) -> Self {
        let settings = self.settings.provide_help(provide_help);

        Parser { settings, ..self }
    }

    /// Enable answer files introduced by `marker`.
    ///
    /// # Note
    ///
    /// This is an alternative to calling the `settings()` method.
    pub fn use_answer_file(self, marker: char) -> Self {
        let settings = self.settings.answer_file_marker(marker);

        Parser { settings, ..self }
    }

    /// Specify the translator used for all messages.
    pub fn translator(self, translator: Box<dyn Translator + 'a>) -> Self {
        Parser { translator, ..self }
    }

    /// Specify how the program is terminated after displaying the help
    /// statement or an error.
    pub fn exit_with(self, exit: Box<dyn Exit + 'a>) -> Self {
        Parser { exit, ..self }
    }

    /// Program name shown in the usage line.
    pub fn get_program(&self) -> &str {
        &self.program
    }

    /// Usage override (empty if the usage line is generated).
    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    /// Description shown in the help statement.
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Current settings.
    pub fn get_settings(&self) -> Settings {
        self.settings
    }

    fn add(&mut self, action: Action<'a>) -> Builder<'_, 'a> {
        let index = self.actions.len();

        self.actions.push(action);

        Builder::new(&mut self.actions[index])
    }

    /// Declare an argument whose value is converted and stored in `dst`.
    ///
    /// An empty `names` declares a positional argument. Names of one
    /// character are short options (`-n`), longer ones long options
    /// (`--name`). The argument is required unless `opt()` is called on the
    /// returned builder.
    pub fn arg<T: Convert + 'a>(&mut self, dst: &'a mut T, names: &[&str]) -> Builder<'_, 'a> {
        self.add(Action::store(dst, names, true))
    }

    /// Declare an optional argument. `dst` is only set if the argument is
    /// specified.
    pub fn opt_arg<T: Convert + 'a>(
        &mut self,
        dst: &'a mut Option<T>,
        names: &[&str],
    ) -> Builder<'_, 'a> {
        self.add(Action::store(dst, names, false))
    }

    /// Declare an argument that may be given several times, each value
    /// being added to `dst`.
    pub fn multi_arg<C: Collection + 'a>(
        &mut self,
        dst: &'a mut C,
        names: &[&str],
    ) -> Builder<'_, 'a> {
        self.add(Action::collect(dst, names))
    }

    /// Declare a flag that stores `value` in `dst` when specified.
    pub fn set<T: Clone + 'a>(&mut self, dst: &'a mut T, value: T, names: &[&str]) -> Builder<'_, 'a> {
        self.add(Action::set_constant(dst, value, names))
    }

    /// Declare an argument handled by `handler`.
    ///
    /// Handlers taking a `&str` consume a value; handlers taking no
    /// argument (other than an optional [Context]) are flags.
    pub fn custom<S, H: Handler<'a, S>>(&mut self, handler: H, names: &[&str]) -> Builder<'_, 'a> {
        self.add(Action::custom(handler.into_callback(), names))
    }

    fn context(&self) -> Context {
        Context {
            program: self.program.clone(),
            description: self.description.clone(),
            width: self.settings.width,
        }
    }

    fn find<F: Fn(&Action<'a>) -> bool>(&self, pred: F) -> Option<usize> {
        self.actions.iter().position(pred)
    }

    /// Only the last positional may take multiple values.
    fn validate_positionals(&self) -> Result<()> {
        let positionals: Vec<&Action> = self.actions.iter().filter(|a| a.is_positional()).collect();

        let multiple = positionals.iter().filter(|a| a.multiple()).count();

        match positionals.last() {
            _ if multiple > 1 => Err(Error::AmbiguousPositionals),
            Some(last) if multiple == 1 && !last.multiple() => Err(Error::AmbiguousPositionals),
            _ => Ok(()),
        }
    }

    fn unmatched(&self, mode: Mode, argument: String, rest: Vec<String>) -> Result<Flow> {
        match mode {
            Mode::Exclusive => Err(Error::UnrecognizedArgument(argument)),
            Mode::AllowSubcommands => {
                debug!("stopping at {:?}, {} argument(s) left", argument, rest.len());

                Ok(Flow::Stop(rest))
            }
        }
    }

    fn scan(
        &mut self,
        tokens: &mut dyn TokenStream,
        mode: Mode,
        pass: &mut Pass,
        depth: usize,
    ) -> Result<Flow> {
        while tokens.advance() {
            let token = tokens.current().to_string();

            let flow = if token.len() > 2 && token.starts_with(LONG_OPT_PREFIX) {
                trace!("long option: {:?}", token);
                tokens.set_peeked(&token[LONG_OPT_PREFIX.len()..]);
                self.scan_long(tokens, mode, pass)?
            } else if token.len() > 1 && token.starts_with(OPT_PREFIX) {
                trace!("short options: {:?}", token);
                tokens.set_peeked(&token[OPT_PREFIX.len_utf8()..]);
                self.scan_short(tokens, mode, pass)?
            } else if let Some(path) = self.answer_file_path(&token) {
                trace!("answer file: {:?}", path);
                self.scan_answer_file(path, tokens, mode, pass, depth)?
            } else {
                trace!("positional: {:?}", token);
                self.scan_positional(tokens, mode, pass)?
            };

            if flow != Flow::Continue {
                return Ok(flow);
            }
        }

        Ok(Flow::Continue)
    }

    /// Visit the action at `index`, or just check its value in a check pass.
    fn dispatch(&mut self, index: usize, value: Option<String>, pass: &Pass) -> Result<Flow> {
        let tr = self.translator.as_ref();
        let action = &mut self.actions[index];

        if !pass.apply {
            if action.has_effects() {
                return Ok(Flow::Halt);
            }

            if let Some(value) = value {
                action.check_value(tr, &value)?;
            }

            return Ok(Flow::Continue);
        }

        debug!("visiting {} with {:?}", action.display_name(tr), value);

        match value {
            Some(value) => action.visit_value(&pass.ctx, tr, &value)?,
            None => action.visit(&pass.ctx, tr)?,
        }

        Ok(Flow::Continue)
    }

    fn scan_long(&mut self, tokens: &mut dyn TokenStream, mode: Mode, pass: &mut Pass) -> Result<Flow> {
        let body = tokens.peeked().to_string();

        let (name, value) = match body.find('=') {
            Some(pos) => (&body[..pos], Some(body[pos + 1..].to_string())),
            None => (body.as_str(), None),
        };

        if self.settings.provide_help && name == HELP_LONG {
            return Err(Error::HelpRequested);
        }

        let argument = format!("{}{}", LONG_OPT_PREFIX, name);

        let index = match self.find(|a| a.is_long(name)) {
            Some(index) => index,
            None => return self.unmatched(mode, argument, tokens.remaining()),
        };

        if !self.actions[index].needs_arg() {
            if value.is_some() {
                return Err(Error::UnexpectedValue(argument));
            }

            return self.dispatch(index, None, pass);
        }

        let value = match value {
            Some(value) => value,
            None => {
                if !tokens.advance() {
                    return Err(Error::MissingParameter(argument));
                }

                tokens.current().to_string()
            }
        };

        self.dispatch(index, Some(value), pass)
    }

    fn scan_short(&mut self, tokens: &mut dyn TokenStream, mode: Mode, pass: &mut Pass) -> Result<Flow> {
        let cluster: Vec<char> = tokens.peeked().chars().collect();

        for (i, c) in cluster.iter().enumerate() {
            if self.settings.provide_help && *c == HELP_SHORT {
                return Err(Error::HelpRequested);
            }

            let argument = format!("{}{}", OPT_PREFIX, c);

            let index = match self.find(|a| a.is_short(*c)) {
                Some(index) => index,
                None => {
                    // Options before this one in the cluster have been
                    // handled: only hand back the rest.
                    let mut rest = tokens.remaining();
                    if let Some(first) = rest.first_mut() {
                        *first = format!("{}{}", OPT_PREFIX, cluster[i..].iter().collect::<String>());
                    }

                    return self.unmatched(mode, argument, rest);
                }
            };

            if !self.actions[index].needs_arg() {
                match self.dispatch(index, None, pass)? {
                    Flow::Continue => continue,
                    flow => return Ok(flow),
                }
            }

            // The rest of the cluster is the value ("-ovalue").
            let value = if i + 1 < cluster.len() {
                cluster[i + 1..].iter().collect()
            } else {
                if !tokens.advance() {
                    return Err(Error::MissingParameter(argument));
                }

                tokens.current().to_string()
            };

            return self.dispatch(index, Some(value), pass);
        }

        Ok(Flow::Continue)
    }

    fn scan_positional(
        &mut self,
        tokens: &mut dyn TokenStream,
        mode: Mode,
        pass: &mut Pass,
    ) -> Result<Flow> {
        let value = tokens.current().to_string();

        let slot = (0..self.actions.len()).find(|i| {
            let action = &self.actions[*i];
            action.is_positional() && (action.multiple() || !pass.claimed[*i])
        });

        match slot {
            Some(index) => {
                pass.claimed[index] = true;

                self.dispatch(index, Some(value), pass)
            }
            None => self.unmatched(mode, value, tokens.remaining()),
        }
    }

    fn answer_file_path<'t>(&self, token: &'t str) -> Option<&'t str> {
        let marker = self.settings.answer_file_marker?;

        token.strip_prefix(marker).filter(|path| !path.is_empty())
    }

    fn scan_answer_file(
        &mut self,
        path: &str,
        tokens: &mut dyn TokenStream,
        mode: Mode,
        pass: &mut Pass,
        depth: usize,
    ) -> Result<Flow> {
        if depth >= MAX_ANSWER_FILE_DEPTH {
            return Err(Error::AnswerFileNesting(path.into()));
        }

        debug!("reading answer file {:?}", path);

        let mut file = FileCursor::open(path).map_err(|e| {
            debug!("cannot read answer file {:?}: {}", path, e);

            match e.kind() {
                io::ErrorKind::InvalidData => Error::AnswerFileEncoding(path.into()),
                _ => Error::FileNotFound(path.into()),
            }
        })?;

        match self.scan(&mut file, mode, pass, depth + 1)? {
            Flow::Stop(mut rest) => {
                // Whatever followed the answer file reference is left too.
                rest.extend(tokens.remaining().into_iter().skip(1));

                Ok(Flow::Stop(rest))
            }
            flow => Ok(flow),
        }
    }

    fn run(&mut self, mode: Mode, apply: bool) -> Result<Flow> {
        let mut cursor = ArgsCursor::new(self.args.clone());
        let mut pass = Pass::new(apply, self.actions.len(), self.context());

        self.scan(&mut cursor, mode, &mut pass, 0)
    }

    fn check_required(&self) -> Result<()> {
        let tr = self.translator.as_ref();

        match self.actions.iter().find(|a| a.required() && !a.visited()) {
            Some(action) => Err(Error::MissingRequiredArgument(action.display_name(tr))),
            None => Ok(()),
        }
    }

    /// Parse the arguments without displaying anything or terminating.
    ///
    /// Each argument takes effect as soon as it is parsed, so the first
    /// error in command-line order is returned. Returns the arguments left
    /// unparsed in [Mode::AllowSubcommands] mode.
    ///
    /// A request for help is returned as [Error::HelpRequested]. Unless a
    /// custom handler or an error comes first, no destination has been
    /// modified in that case.
    pub fn try_parse(&mut self, mode: Mode) -> Result<Vec<String>> {
        self.validate_positionals()?;

        // Any other error is reported by the real pass, in order.
        if let Err(Error::HelpRequested) = self.run(mode, false) {
            return Err(Error::HelpRequested);
        }

        match self.run(mode, true)? {
            Flow::Stop(rest) => Ok(rest),
            Flow::Continue | Flow::Halt => {
                self.check_required()?;

                Ok(Vec::new())
            }
        }
    }

    /// Parse the arguments.
    ///
    /// If help is requested, it is displayed on standard output and the
    /// program terminates successfully. On error, the usage line and the
    /// error are displayed on standard error and the program terminates
    /// with status 2.
    ///
    /// `width` overrides the detected terminal width for all output.
    pub fn parse(&mut self, mode: Mode, width: Option<usize>) -> Vec<String> {
        if width.is_some() {
            self.settings.width = width;
        }

        let err = match self.try_parse(mode) {
            Ok(rest) => return rest,
            Err(err) => err,
        };

        let result = if err == Error::HelpRequested {
            let width = self.output_width(atty::Stream::Stdout);
            self.write_help(&mut io::stdout(), Some(width))
        } else {
            let width = self.output_width(atty::Stream::Stderr);
            self.write_error(&mut io::stderr(), &err, Some(width))
        };

        if let Err(e) = result {
            warn!("cannot display {:?}: {}", err, e);
        }

        self.exit.exit(err.exit_code())
    }

    fn output_width(&self, stream: atty::Stream) -> usize {
        self.settings
            .width
            .unwrap_or_else(|| printer::terminal_width(stream))
    }

    fn resolve_width(&self, width: Option<usize>) -> usize {
        width.or(self.settings.width).unwrap_or(0)
    }

    /// The usage line, without the "usage: " prefix.
    pub fn usage_line(&self) -> String {
        help::usage_line(
            &self.program,
            &self.usage,
            self.settings.provide_help,
            &self.actions,
            self.translator.as_ref(),
        )
    }

    /// Sections of the help statement.
    pub fn arguments(&self) -> Vec<Chunk> {
        help::arguments(
            self.settings.provide_help,
            &self.actions,
            self.translator.as_ref(),
        )
    }

    /// Write the usage line.
    ///
    /// `width` defaults to the width in the settings, or unlimited.
    pub fn write_short_help<W: Write>(&self, out: &mut W, width: Option<usize>) -> io::Result<()> {
        let prefix = self.translator.translate(Lng::Usage, "", "");
        let line = format!("{}{}", prefix, self.usage_line());

        printer::format_paragraph(
            out,
            &line,
            prefix.chars().count(),
            self.resolve_width(width),
        )
    }

    /// Write the full help statement.
    pub fn write_help<W: Write>(&self, out: &mut W, width: Option<usize>) -> io::Result<()> {
        let width = self.resolve_width(width);

        self.write_short_help(out, Some(width))?;

        if !self.description.is_empty() {
            writeln!(out)?;
            printer::format_paragraph(out, &self.description, 0, width)?;
        }

        printer::format_list(out, &self.arguments(), width)
    }

    /// Write the usage line followed by the error message.
    pub fn write_error<W: Write>(&self, out: &mut W, err: &Error, width: Option<usize>) -> io::Result<()> {
        let width = self.resolve_width(width);
        let tr = self.translator.as_ref();

        self.write_short_help(out, Some(width))?;

        let msg = tr.translate(Lng::ErrorMsg, &self.program, &err.message(tr));

        printer::format_paragraph(out, &msg, 0, width)
    }
}
