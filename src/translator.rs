// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

/// Identifies every user-visible string the parser produces.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Lng {
    /// Prefix of the usage line.
    Usage,
    /// Default placeholder for an argument value.
    DefMeta,
    /// Title of the positional arguments section.
    Positionals,
    /// Title of the optional arguments section.
    Optionals,
    /// Description of the built-in `-h, --help` option.
    HelpDescription,
    /// `arg1`: argument.
    Unrecognized,
    /// `arg1`: argument.
    NeedsParam,
    /// `arg1`: argument.
    UnexpectedValue,
    /// `arg1`: argument.
    NeedsNumber,
    /// `arg1`: argument.
    NeededNumberExceeded,
    /// `arg1`: argument, `arg2`: value.
    NeededEnumUnknown,
    /// `arg1`: argument, `arg2`: known values.
    NeededEnumKnownValues,
    /// `arg1`: argument.
    Required,
    /// `arg1`: path.
    FileNotFound,
    /// `arg1`: path.
    FileEncoding,
    /// `arg1`: program name, `arg2`: message.
    ErrorMsg,
}

/// Looks up a message by id, substituting up to two arguments.
pub trait Translator {
    /// Return the text for `id`.
    fn translate(&self, id: Lng, arg1: &str, arg2: &str) -> String;
}

impl<'a> fmt::Debug for dyn Translator + 'a {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Translator: {:p}", self)
    }
}

/// English messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn translate(&self, id: Lng, arg1: &str, arg2: &str) -> String {
        match id {
            Lng::Usage => "usage: ".into(),
            Lng::DefMeta => "ARG".into(),
            Lng::Positionals => "positional arguments".into(),
            Lng::Optionals => "optional arguments".into(),
            Lng::HelpDescription => "show this help message and exit".into(),
            Lng::Unrecognized => format!("unrecognized argument: {}", arg1),
            Lng::NeedsParam => format!("argument {}: expected one argument", arg1),
            Lng::UnexpectedValue => format!("argument {}: unexpected value", arg1),
            Lng::NeedsNumber => format!("argument {}: expected a number", arg1),
            Lng::NeededNumberExceeded => {
                format!("argument {}: number outside of expected bounds", arg1)
            }
            Lng::NeededEnumUnknown => {
                format!("argument {}: value {} is not recognized", arg1, arg2)
            }
            Lng::NeededEnumKnownValues => format!("known values for {}: {}", arg1, arg2),
            Lng::Required => format!("argument {} is required", arg1),
            Lng::FileNotFound => format!("cannot open answer file: {}", arg1),
            Lng::FileEncoding => format!("answer file is not valid UTF-8: {}", arg1),
            Lng::ErrorMsg => format!("{}: error: {}", arg1, arg2),
        }
    }
}
