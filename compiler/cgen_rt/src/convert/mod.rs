//! Typed string-to-value conversion.
//!
//! The conversion set is closed: integers (`i8`..`i64`, `u8`..`u64`),
//! `f32`, `f64`, `bool`, and `String`, plus generated enums. There is no
//! fallback for other types; asking for one is a compile error.
//!
//! # Integer Parsing
//!
//! Surrounding whitespace is ignored. An optional sign comes first, then an
//! optional radix prefix matching the requested radix (`0x`/`0X` for 16,
//! `0o`/`0O` for 8, `0b`/`0B` for 2), then at least one digit. Anything after
//! the digits is an [`ConversionError::InvalidArgument`]. A well-formed number
//! that does not fit the target is [`ConversionError::OutOfRange`].

use std::borrow::Cow;

use thiserror::Error;

/// Failure converting text to a typed value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The text is not a valid spelling of the target type.
    #[error("invalid {target} value `{input}`")]
    InvalidArgument { input: String, target: &'static str },
    /// The text is well-formed but the value does not fit the target type.
    #[error("value `{input}` is out of range for {target}")]
    OutOfRange { input: String, target: &'static str },
    /// The requested radix is not between 2 and 36.
    #[error("unsupported radix {0}")]
    InvalidRadix(u32),
}

impl ConversionError {
    #[cold]
    pub fn invalid(input: &str, target: &'static str) -> Self {
        ConversionError::InvalidArgument {
            input: input.to_owned(),
            target,
        }
    }

    #[cold]
    pub fn out_of_range(input: &str, target: &'static str) -> Self {
        ConversionError::OutOfRange {
            input: input.to_owned(),
            target,
        }
    }
}

/// Types that can be parsed from configuration text.
pub trait FromText: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    fn from_text(text: &str) -> Result<Self, ConversionError>;

    /// Parse an unquoted YAML number, spelled as in the document.
    fn from_number(text: &str) -> Result<Self, ConversionError> {
        Self::from_text(&number_text(text, 10).0)
    }
}

/// Integer types that can be parsed in an explicit radix.
pub trait FromTextRadix: FromText {
    fn from_text_radix(text: &str, radix: u32) -> Result<Self, ConversionError>;
}

/// Convert `text` to `T`.
pub fn from_string<T: FromText>(text: &str) -> Result<T, ConversionError> {
    T::from_text(text)
}

/// Convert `text` to the integer type `T`, reading digits in `radix`.
pub fn from_string_radix<T: FromTextRadix>(
    text: &str,
    radix: u32,
) -> Result<T, ConversionError> {
    T::from_text_radix(text, radix)
}

/// Convert `"true"` or `"false"` (any case) to a `bool`.
pub fn stob(text: &str) -> Result<bool, ConversionError> {
    bool::from_text(text)
}

/// Convert hexadecimal text, with or without a `0x` prefix, to a `u64`.
pub fn stohex(text: &str) -> Result<u64, ConversionError> {
    u64::from_text_radix(text, 16)
}

/// Text and radix for reading an unquoted YAML number.
///
/// Integers with a radix prefix (`0x1F`, `-0o17`, `0b101`) become decimal
/// text in radix 10, and `.inf`/`.nan` become spellings `str::parse` reads.
/// Other text is kept as written, to be read in `radix`: in a hex field an
/// unquoted `1001` is `0x1001`, as with [`stohex`].
pub fn number_text(text: &str, radix: u32) -> (Cow<'_, str>, u32) {
    let trimmed = text.trim();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    if rest.eq_ignore_ascii_case(".inf") {
        return (Cow::Owned(format!("{sign}inf")), 10);
    }
    if rest.eq_ignore_ascii_case(".nan") {
        return (Cow::Borrowed("NaN"), 10);
    }

    let prefixed = match rest.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return (Cow::Borrowed(text), radix),
    };
    match parse_integer(trimmed, prefixed, "integer") {
        Ok(value) => (Cow::Owned(value.to_string()), 10),
        Err(_) => (Cow::Borrowed(text), radix),
    }
}

/// Splits integer text into its sign and bare digits.
fn split_integer<'a>(
    text: &'a str,
    radix: u32,
    target: &'static str,
) -> Result<(bool, &'a str), ConversionError> {
    if !(2..=36).contains(&radix) {
        return Err(ConversionError::InvalidRadix(radix));
    }

    let trimmed = text.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let prefix = match radix {
        16 => Some(['x', 'X']),
        8 => Some(['o', 'O']),
        2 => Some(['b', 'B']),
        _ => None,
    };
    let digits = prefix
        .and_then(|letters| rest.strip_prefix('0')?.strip_prefix(letters))
        .unwrap_or(rest);

    // `from_str_radix` accepts its own leading sign; a second one is garbage.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(ConversionError::invalid(text, target));
    }
    Ok((negative, digits))
}

fn parse_integer(text: &str, radix: u32, target: &'static str) -> Result<i128, ConversionError> {
    use std::num::IntErrorKind;

    let (negative, digits) = split_integer(text, radix, target)?;
    let magnitude = u128::from_str_radix(digits, radix).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::out_of_range(text, target)
        }
        _ => ConversionError::invalid(text, target),
    })?;
    let magnitude =
        i128::try_from(magnitude).map_err(|_| ConversionError::out_of_range(text, target))?;
    Ok(if negative { -magnitude } else { magnitude })
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl FromText for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn from_text(text: &str) -> Result<Self, ConversionError> {
                Self::from_text_radix(text, 10)
            }
        }

        impl FromTextRadix for $ty {
            fn from_text_radix(text: &str, radix: u32) -> Result<Self, ConversionError> {
                let wide = parse_integer(text, radix, Self::TYPE_NAME)?;
                <$ty>::try_from(wide)
                    .map_err(|_| ConversionError::out_of_range(text, Self::TYPE_NAME))
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {$(
        impl FromText for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn from_text(text: &str) -> Result<Self, ConversionError> {
                let trimmed = text.trim();
                let value: $ty = trimmed
                    .parse()
                    .map_err(|_| ConversionError::invalid(text, Self::TYPE_NAME))?;
                // Finite text that overflows parses as infinity.
                if value.is_infinite() && !trimmed.to_ascii_lowercase().contains("inf") {
                    return Err(ConversionError::out_of_range(text, Self::TYPE_NAME));
                }
                Ok(value)
            }
        }
    )*};
}

impl_float!(f32, f64);

impl FromText for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConversionError::invalid(text, Self::TYPE_NAME))
        }
    }
}

impl FromText for String {
    const TYPE_NAME: &'static str = "string";

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_owned())
    }

    fn from_number(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_owned())
    }
}

/// Formats an integer in `radix` with the prefix the parser accepts.
///
/// Hex digits are upper case (`0xE001`). Radix 10 and unsupported radixes
/// produce plain decimal.
pub fn format_radix(value: i128, radix: u32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    match radix {
        16 => format!("{sign}0x{magnitude:X}"),
        8 => format!("{sign}0o{magnitude:o}"),
        2 => format!("{sign}0b{magnitude:b}"),
        _ => value.to_string(),
    }
}
