//! Per-call codec overrides.
//!
//! A [`Decoding`] bundles the two functions used when reading cookies, an
//! [`Encoding`] the two used when writing them. Both start out with the
//! functions in [`crate::encoding`] and let you replace either of them.
//!
//! ```rust
//! use crumbs::{Cookies, Decoding, MemoryStore};
//!
//! let mut cookies = Cookies::new(MemoryStore::new());
//! cookies.set("c", "v", None);
//!
//! let upper = Decoding::new().decode_value(|value, _name| Ok(value.to_uppercase()));
//! assert_eq!(cookies.get_with("c", &upper), Some("V".to_string()));
//! ```
use std::fmt;
use std::sync::Arc;

use crate::{encoding, CookieValue};

type NameFn = Arc<dyn Fn(&str) -> anyhow::Result<String> + Send + Sync>;
type DecodeValueFn<R> = Arc<dyn Fn(&str, &str) -> anyhow::Result<R> + Send + Sync>;
type EncodeValueFn<W> = Arc<dyn Fn(&W, &str) -> anyhow::Result<String> + Send + Sync>;

/// The functions used to turn a raw cookie name and value into `R`.
///
/// The value decoder receives the raw value and the *decoded* cookie name,
/// which allows name-dependent decoding.
pub struct Decoding<R = String> {
    name: NameFn,
    value: DecodeValueFn<R>,
}

impl Decoding<String> {
    /// The default decoding: [`encoding::decode_name`] and [`encoding::decode_value`].
    pub fn new() -> Self {
        Decoding {
            name: Arc::new(|raw: &str| -> anyhow::Result<String> {
                Ok(encoding::decode_name(raw)?)
            }),
            value: Arc::new(|raw: &str, _name: &str| -> anyhow::Result<String> {
                Ok(encoding::decode_value(raw)?)
            }),
        }
    }
}

impl Default for Decoding<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Decoding<R> {
    /// Replaces the name decoder.
    pub fn decode_name<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Decoding {
            name: Arc::new(f),
            value: self.value,
        }
    }

    /// Replaces the value decoder, possibly changing the decoded type.
    pub fn decode_value<T, F>(self, f: F) -> Decoding<T>
    where
        F: Fn(&str, &str) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Decoding {
            name: self.name,
            value: Arc::new(f),
        }
    }

    pub(crate) fn name(&self, raw: &str) -> anyhow::Result<String> {
        (self.name)(raw)
    }

    pub(crate) fn value(&self, raw: &str, name: &str) -> anyhow::Result<R> {
        (self.value)(raw, name)
    }
}

impl<R> Clone for Decoding<R> {
    fn clone(&self) -> Self {
        Decoding {
            name: Arc::clone(&self.name),
            value: Arc::clone(&self.value),
        }
    }
}

impl<R> fmt::Debug for Decoding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoding").finish_non_exhaustive()
    }
}

/// The functions used to turn a cookie name and a `W` into their encoded form.
///
/// The value encoder receives the value and the cookie name, as passed by the
/// caller (i.e. before encoding).
pub struct Encoding<W = CookieValue<'static>> {
    name: NameFn,
    value: EncodeValueFn<W>,
}

impl<'v> Encoding<CookieValue<'v>> {
    /// The default encoding: [`encoding::encode_name`] and [`encoding::encode_value`].
    pub fn new() -> Self {
        Encoding {
            name: Arc::new(|name: &str| -> anyhow::Result<String> {
                Ok(encoding::encode_name(name))
            }),
            value: Arc::new(
                |value: &CookieValue<'v>, _name: &str| -> anyhow::Result<String> {
                    Ok(encoding::encode_value(value))
                },
            ),
        }
    }
}

impl<'v> Default for Encoding<CookieValue<'v>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Encoding<W> {
    /// Replaces the name encoder.
    pub fn encode_name<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Encoding {
            name: Arc::new(f),
            value: self.value,
        }
    }

    /// Replaces the value encoder, possibly changing the accepted type.
    pub fn encode_value<T, F>(self, f: F) -> Encoding<T>
    where
        F: Fn(&T, &str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Encoding {
            name: self.name,
            value: Arc::new(f),
        }
    }

    pub(crate) fn name(&self, name: &str) -> anyhow::Result<String> {
        (self.name)(name)
    }

    pub(crate) fn value(&self, value: &W, name: &str) -> anyhow::Result<String> {
        (self.value)(value, name)
    }
}

impl<W> Clone for Encoding<W> {
    fn clone(&self) -> Self {
        Encoding {
            name: Arc::clone(&self.name),
            value: Arc::clone(&self.value),
        }
    }
}

impl<W> fmt::Debug for Encoding<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding").finish_non_exhaustive()
    }
}
