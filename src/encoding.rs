//! Percent-encoding and decoding of cookie names and values.
//!
//! These are the functions behind the default [`Encoding`] and [`Decoding`].
//!
//! [`Encoding`]: crate::Encoding
//! [`Decoding`]: crate::Decoding
use anyhow::{anyhow, Context};
use percent_encoding::{percent_decode, AsciiSet, CONTROLS};

use crate::CookieValue;

/// https://www.rfc-editor.org/rfc/rfc6265#section-4.1.1, `cookie-octet` + `%`
const VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

/// https://www.rfc-editor.org/rfc/rfc2616#section-2.2, `token` + `%`
const NAME: &AsciiSet = &VALUE
    .add(b'(')
    .add(b')')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b'{')
    .add(b'}');

/// Percent-encode a cookie name.
///
/// Every byte that is not allowed in an RFC 6265 `token` is escaped, as well as
/// `%` itself and all non-ASCII bytes.
///
/// ```rust
/// use crumbs::encoding::encode_name;
///
/// assert_eq!(encode_name("(())"), "%28%28%29%29");
/// assert_eq!(encode_name("c#$&+^`|"), "c#$&+^`|");
/// ```
pub fn encode_name(name: &str) -> String {
    percent_encoding::utf8_percent_encode(name, NAME).to_string()
}

/// Percent-encode a cookie value.
///
/// Non-string values are rendered to text first. Only bytes outside of the
/// RFC 6265 `cookie-octet` grammar, `%` and non-ASCII bytes are escaped.
///
/// ```rust
/// use crumbs::{encoding::encode_value, CookieValue};
///
/// assert_eq!(encode_value(&"a;b".into()), "a%3Bb");
/// assert_eq!(encode_value(&1234.into()), "1234");
/// assert_eq!(encode_value(&CookieValue::Null), "null");
/// ```
pub fn encode_value(value: &CookieValue) -> String {
    percent_encoding::utf8_percent_encode(&value.to_string(), VALUE).to_string()
}

/// Percent-decode a cookie name.
///
/// Decoding is strict: every `%` must start a well-formed `%XX` escape and the
/// decoded bytes must be valid UTF-8.
pub fn decode_name(raw: &str) -> Result<String, DecodingError> {
    if let Some(offset) = stray_percent(raw) {
        return Err(DecodingError {
            raw_value: raw.to_string(),
            source: anyhow!("`%` at offset {offset} is not followed by two hex digits"),
        });
    }
    percent_decode(raw.as_bytes())
        .decode_utf8()
        .map(|name| name.into_owned())
        .context("Failed to percent-decode the cookie name")
        .map_err(|e| DecodingError {
            raw_value: raw.to_string(),
            source: e,
        })
}

/// Percent-decode a cookie value.
///
/// A value starting with `"` has its first and last characters removed before
/// decoding. Each run of consecutive `%XX` escapes is decoded as UTF-8, while a
/// `%` that does not start an escape is kept as is.
///
/// ```rust
/// use crumbs::encoding::decode_value;
///
/// assert_eq!(decode_value("\"v\"").unwrap(), "v");
/// assert_eq!(decode_value("foo%").unwrap(), "foo%");
/// assert_eq!(decode_value("%d0%96").unwrap(), "Ж");
/// ```
pub fn decode_value(raw: &str) -> Result<String, DecodingError> {
    let unquoted = strip_quotes(raw);
    let bytes = unquoted.as_bytes();

    let mut decoded = String::with_capacity(unquoted.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !is_escape(bytes, i) {
            i += 1;
            continue;
        }
        let start = i;
        while is_escape(bytes, i) {
            i += 3;
        }
        // Escapes are pure ASCII, so both offsets sit on char boundaries.
        decoded.push_str(&unquoted[copied..start]);
        let run = &unquoted[start..i];
        let text = percent_decode(run.as_bytes())
            .decode_utf8()
            .with_context(|| format!("`{run}` is not a valid percent-encoded UTF-8 sequence"))
            .map_err(|e| DecodingError {
                raw_value: raw.to_string(),
                source: e,
            })?;
        decoded.push_str(&text);
        copied = i;
    }
    decoded.push_str(&unquoted[copied..]);
    Ok(decoded)
}

#[derive(Debug, thiserror::Error)]
#[error("{source}")]
/// An error that occurred while percent-decoding a cookie name or value.
pub struct DecodingError {
    pub(crate) raw_value: String,
    #[source]
    pub(crate) source: anyhow::Error,
}

impl DecodingError {
    /// The raw name or value that couldn't be decoded.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}

fn strip_quotes(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix('"') else {
        return raw;
    };
    let mut chars = rest.chars();
    chars.next_back();
    chars.as_str()
}

fn is_escape(bytes: &[u8], i: usize) -> bool {
    matches!(
        bytes.get(i..i + 3),
        Some([b'%', hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
    )
}

/// Returns the offset of the first `%` that doesn't start a `%XX` escape.
fn stray_percent(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|(i, b)| **b == b'%' && !is_escape(bytes, *i))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::{decode_name, decode_value, encode_name, encode_value};
    use crate::CookieValue;

    const NAME_FORBIDDEN: [(&str, &str); 19] = [
        ("(", "%28"),
        (")", "%29"),
        ("<", "%3C"),
        (">", "%3E"),
        ("@", "%40"),
        (",", "%2C"),
        (";", "%3B"),
        (":", "%3A"),
        ("\\", "%5C"),
        ("\"", "%22"),
        ("/", "%2F"),
        ("[", "%5B"),
        ("]", "%5D"),
        ("?", "%3F"),
        ("=", "%3D"),
        ("{", "%7B"),
        ("}", "%7D"),
        (" ", "%20"),
        ("\t", "%09"),
    ];

    const VALUE_FORBIDDEN: [(&str, &str); 5] = [
        (" ", "%20"),
        ("\"", "%22"),
        (",", "%2C"),
        (";", "%3B"),
        ("\\", "%5C"),
    ];

    #[test]
    fn name_forbidden_characters_are_encoded() {
        for (input, expected) in NAME_FORBIDDEN {
            assert_eq!(encode_name(input), expected, "Failed for {input:?}");
        }
        assert_eq!(encode_name("(())"), "%28%28%29%29");
    }

    #[test]
    fn name_forbidden_characters_are_decoded() {
        for (expected, input) in NAME_FORBIDDEN {
            assert_eq!(decode_name(input).unwrap(), expected, "Failed for {input:?}");
        }
    }

    #[test]
    fn name_keeps_token_punctuation() {
        assert_eq!(encode_name("!#$&'*+-.^_`|~"), "!#$&'*+-.^_`|~");
        assert_eq!(encode_name("100%"), "100%25");
        assert_eq!(encode_name("北"), "%E5%8C%97");
    }

    #[test]
    fn name_decoding_is_strict() {
        assert!(decode_name("%A1").is_err());
        assert!(decode_name("foo%").is_err());
        assert!(decode_name("%zz").is_err());
        assert_eq!(decode_name("c%5B%5D").unwrap(), "c[]");
    }

    #[test]
    fn value_forbidden_characters_are_encoded() {
        for (input, expected) in VALUE_FORBIDDEN {
            assert_eq!(encode_value(&input.into()), expected, "Failed for {input:?}");
        }
        assert_eq!(encode_value(&";;".into()), "%3B%3B");
    }

    #[test]
    fn value_forbidden_characters_are_decoded() {
        for (expected, input) in VALUE_FORBIDDEN {
            assert_eq!(decode_value(input).unwrap(), expected, "Failed for {input:?}");
        }
        assert_eq!(decode_value("%3B%3B").unwrap(), ";;");
    }

    #[test]
    fn value_keeps_cookie_octets() {
        let octets = "!#$&'()*+-./:<=>?@[]^_`{|}~";
        assert_eq!(encode_value(&octets.into()), octets);
        assert_eq!(encode_value(&"[object Object]".into()), "[object%20Object]");
        assert_eq!(encode_value(&"50%".into()), "50%25");
    }

    #[test]
    fn non_string_values() {
        assert_eq!(encode_value(&1234.into()), "1234");
        assert_eq!(encode_value(&1.5.into()), "1.5");
        assert_eq!(encode_value(&true.into()), "true");
        assert_eq!(encode_value(&CookieValue::Null), "null");
        assert_eq!(encode_value(&CookieValue::Undefined), "undefined");
    }

    #[test]
    fn value_decoding_is_tolerant() {
        assert_eq!(decode_value("foo%").unwrap(), "foo%");
        assert_eq!(decode_value("100%25").unwrap(), "100%");
        assert_eq!(decode_value("%d0%96").unwrap(), "Ж");
        assert_eq!(decode_value("a%2").unwrap(), "a%2");
        assert_eq!(decode_value("%u5317").unwrap(), "%u5317");
    }

    #[test]
    fn value_quotes_are_stripped() {
        assert_eq!(decode_value("\"v\"").unwrap(), "v");
        assert_eq!(decode_value("\"%3B\"").unwrap(), ";");
        assert_eq!(decode_value("\"").unwrap(), "");
        assert_eq!(decode_value("v\"").unwrap(), "v\"");
    }

    #[test]
    fn value_with_invalid_utf8_escape_is_rejected() {
        let err = decode_value("%A1").unwrap_err();
        assert_eq!(err.raw_value(), "%A1");
        assert!(decode_value("ok%F1%F2%F3%C0%C1%C2").is_err());
        assert!(decode_value("foo%bar%22baz%qux").is_err());
    }
}
