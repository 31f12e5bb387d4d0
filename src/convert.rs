// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Conversion of raw argument values into typed destinations.

use std::ffi::OsString;
use std::num::IntErrorKind;
use std::path::PathBuf;

use crate::error::ConversionError;

/// A type an argument value can be converted into.
///
/// `name` is the display name of the argument the value was given for and
/// is only used to build the error.
pub trait Convert: Sized {
    /// Convert the raw token.
    fn convert(raw: &str, name: &str) -> Result<Self, ConversionError>;
}

impl Convert for String {
    fn convert(raw: &str, _name: &str) -> Result<Self, ConversionError> {
        Ok(raw.into())
    }
}

impl Convert for PathBuf {
    fn convert(raw: &str, _name: &str) -> Result<Self, ConversionError> {
        Ok(raw.into())
    }
}

impl Convert for OsString {
    fn convert(raw: &str, _name: &str) -> Result<Self, ConversionError> {
        Ok(raw.into())
    }
}

/// An absent option leaves the destination `None`; a present one always
/// yields `Some`.
impl<T: Convert> Convert for Option<T> {
    fn convert(raw: &str, name: &str) -> Result<Self, ConversionError> {
        T::convert(raw, name).map(Some)
    }
}

macro_rules! integral_convert {
    ($($ty:ty),+) => {
        $(
            impl Convert for $ty {
                fn convert(raw: &str, name: &str) -> Result<Self, ConversionError> {
                    // FromStr accepts a leading '+', plain base-10 does not.
                    if raw.starts_with('+') {
                        return Err(ConversionError::NotANumber {
                            argument: name.into(),
                        });
                    }

                    raw.parse::<$ty>().map_err(|e| match e.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            ConversionError::OutOfRange {
                                argument: name.into(),
                            }
                        }
                        _ => ConversionError::NotANumber {
                            argument: name.into(),
                        },
                    })
                }
            }
        )+
    };
}

integral_convert!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// An enumeration whose values are selected by label on the command-line.
///
/// Usually implemented with [labeled_enum!](crate::labeled_enum), which
/// also implements [Convert].
pub trait LabeledEnum: Sized + Clone + 'static {
    /// Ordered `(label, value)` pairs. Labels are matched case-sensitively.
    const LABELS: &'static [(&'static str, Self)];
}

/// Generic converter for a [LabeledEnum].
pub fn convert_enum<T: LabeledEnum>(raw: &str, name: &str) -> Result<T, ConversionError> {
    if let Some((_, value)) = T::LABELS.iter().find(|(label, _)| *label == raw) {
        return Ok(value.clone());
    }

    let known = T::LABELS
        .iter()
        .map(|(label, _)| *label)
        .collect::<Vec<&str>>()
        .join(", ");

    Err(ConversionError::UnknownEnumValue {
        argument: name.into(),
        value: raw.into(),
        known,
    })
}

/// Register the labels of an enumeration, implementing [LabeledEnum] and
/// [Convert] for it.
///
/// ```rust
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// arglite::labeled_enum!(Color {
///     "red" => Color::Red,
///     "green" => Color::Green,
/// });
///
/// use arglite::Convert;
/// assert_eq!(Color::convert("green", "--color"), Ok(Color::Green));
/// ```
#[macro_export]
macro_rules! labeled_enum {
    ($ty:ty { $($label:expr => $value:expr),+ $(,)? }) => {
        impl $crate::LabeledEnum for $ty {
            const LABELS: &'static [(&'static str, Self)] = &[$(($label, $value)),+];
        }

        impl $crate::Convert for $ty {
            fn convert(
                raw: &str,
                name: &str,
            ) -> ::std::result::Result<Self, $crate::ConversionError> {
                $crate::convert_enum(raw, name)
            }
        }
    };
}
