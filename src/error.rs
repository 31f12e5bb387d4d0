use thiserror::Error;

use crate::translator::{Lng, Translator};

/// Exit status used when the command-line could not be parsed.
pub const ERROR_EXIT_CODE: i32 = 2;

/// Failure to convert an argument value into the destination type.
///
/// Every variant carries the display name of the argument (`--name`, `-n`
/// or the positional's meta name) the value was supplied for.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ConversionError {
    /// Value is not a base-10 integer.
    #[error("argument {argument}: expected a number")]
    NotANumber {
        /// Argument display name.
        argument: String,
    },

    /// Value is an integer, but does not fit the destination type.
    #[error("argument {argument}: number outside of expected bounds")]
    OutOfRange {
        /// Argument display name.
        argument: String,
    },

    /// Value does not match any label registered for the enumeration.
    #[error("argument {argument}: value {value} is not recognized\nknown values for {argument}: {known}")]
    UnknownEnumValue {
        /// Argument display name.
        argument: String,
        /// Value specified by the user.
        value: String,
        /// All accepted labels, in declaration order, joined by `", "`.
        known: String,
    },
}

/// The error type.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    //------------------------------
    // Incorrect API usage errors (programmer error)
    //------------------------------
    /// More than one positional accepts multiple values, or the one that
    /// does is not the last positional declared.
    #[error("ambiguous positional arguments: only the last positional may accept multiple values")]
    AmbiguousPositionals,

    /// Answer files reference each other too deeply (probably a cycle).
    #[error("answer file nested too deeply: {0}")]
    AnswerFileNesting(String),

    //------------------------------
    // Runtime errors (user error)
    //------------------------------
    /// User specified an unknown option or a positional argument that no
    /// declared positional can accept.
    #[error("unrecognized argument: {0}")]
    UnrecognizedArgument(String),

    /// Option needs a value but the input ended.
    #[error("argument {0}: expected one argument")]
    MissingParameter(String),

    /// A value was attached (`--name=value`) to an option that takes none.
    #[error("argument {0}: unexpected value")]
    UnexpectedValue(String),

    /// An argument that must be specified was not specified.
    #[error("argument {0} is required")]
    MissingRequiredArgument(String),

    /// Answer file could not be opened.
    #[error("cannot open answer file: {0}")]
    FileNotFound(String),

    /// Answer file is not valid UTF-8.
    #[error("answer file is not valid UTF-8: {0}")]
    AnswerFileEncoding(String),

    /// Argument value could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Failure reported by a custom action handler.
    #[error("{0}")]
    Custom(String),

    //------------------------------
    // Control flow
    //------------------------------
    /// User asked for the help statement.
    #[error("help requested")]
    HelpRequested,
}

impl Error {
    /// Exit status the program should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::HelpRequested => 0,
            _ => ERROR_EXIT_CODE,
        }
    }

    /// Render the error message through a translator.
    pub fn message(&self, tr: &dyn Translator) -> String {
        match self {
            Error::UnrecognizedArgument(arg) => tr.translate(Lng::Unrecognized, arg, ""),
            Error::MissingParameter(arg) => tr.translate(Lng::NeedsParam, arg, ""),
            Error::UnexpectedValue(arg) => tr.translate(Lng::UnexpectedValue, arg, ""),
            Error::MissingRequiredArgument(arg) => tr.translate(Lng::Required, arg, ""),
            Error::FileNotFound(path) => tr.translate(Lng::FileNotFound, path, ""),
            Error::AnswerFileEncoding(path) => tr.translate(Lng::FileEncoding, path, ""),
            Error::Conversion(ConversionError::NotANumber { argument }) => {
                tr.translate(Lng::NeedsNumber, argument, "")
            }
            Error::Conversion(ConversionError::OutOfRange { argument }) => {
                tr.translate(Lng::NeededNumberExceeded, argument, "")
            }
            Error::Conversion(ConversionError::UnknownEnumValue {
                argument,
                value,
                known,
            }) => format!(
                "{}\n{}",
                tr.translate(Lng::NeededEnumUnknown, argument, value),
                tr.translate(Lng::NeededEnumKnownValues, argument, known)
            ),
            _ => self.to_string(),
        }
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
