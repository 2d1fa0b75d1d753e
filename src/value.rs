use std::borrow::Cow;
use std::fmt;

/// A value that can be written with the default value encoder.
///
/// Non-string variants are rendered to text before being percent-encoded:
/// numbers are formatted the way a JavaScript host would print them, while
/// `Null` and `Undefined` become the literal strings `null` and `undefined`.
///
/// ```rust
/// use crumbs::CookieValue;
///
/// assert_eq!(CookieValue::from("v").to_string(), "v");
/// assert_eq!(CookieValue::from(1234).to_string(), "1234");
/// assert_eq!(CookieValue::from(0.5).to_string(), "0.5");
/// assert_eq!(CookieValue::from(false).to_string(), "false");
/// assert_eq!(CookieValue::from(None::<&str>).to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CookieValue<'v> {
    String(Cow<'v, str>),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
}

impl fmt::Display for CookieValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieValue::String(s) => f.write_str(s),
            CookieValue::Number(n) => fmt_number(*n, f),
            CookieValue::Bool(b) => write!(f, "{b}"),
            CookieValue::Null => f.write_str("null"),
            CookieValue::Undefined => f.write_str("undefined"),
        }
    }
}

/// Formats `n` like `Number.prototype.toString()` does.
pub(crate) fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        return write!(f, "{sign}Infinity");
    }
    if n == 0.0 {
        // Covers `-0` as well.
        return f.write_str("0");
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exponential = format!("{n:e}");
        return match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&exponential),
        };
    }
    write!(f, "{n}")
}

impl<'v> From<&'v str> for CookieValue<'v> {
    fn from(value: &'v str) -> Self {
        CookieValue::String(value.into())
    }
}

impl From<String> for CookieValue<'_> {
    fn from(value: String) -> Self {
        CookieValue::String(value.into())
    }
}

impl<'v> From<Cow<'v, str>> for CookieValue<'v> {
    fn from(value: Cow<'v, str>) -> Self {
        CookieValue::String(value)
    }
}

impl From<bool> for CookieValue<'_> {
    fn from(value: bool) -> Self {
        CookieValue::Bool(value)
    }
}

impl From<f64> for CookieValue<'_> {
    fn from(value: f64) -> Self {
        CookieValue::Number(value)
    }
}

impl From<i32> for CookieValue<'_> {
    fn from(value: i32) -> Self {
        CookieValue::Number(value.into())
    }
}

impl From<u32> for CookieValue<'_> {
    fn from(value: u32) -> Self {
        CookieValue::Number(value.into())
    }
}

impl From<i64> for CookieValue<'_> {
    fn from(value: i64) -> Self {
        CookieValue::Number(value as f64)
    }
}

impl From<u64> for CookieValue<'_> {
    fn from(value: u64) -> Self {
        CookieValue::Number(value as f64)
    }
}

impl<'v, T: Into<CookieValue<'v>>> From<Option<T>> for CookieValue<'v> {
    /// `None` maps to [`CookieValue::Null`].
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => CookieValue::Null,
        }
    }
}
