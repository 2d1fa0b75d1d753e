use std::collections::HashMap;

use crate::encoding::{encode_name, encode_value};
use crate::{jar, Attributes, CookieStore, CookieValue, Decoding, Encoding, DEFAULT_ATTRIBUTES};

/// Reads and writes cookies through a [`CookieStore`].
///
/// Every read rescans the store's current cookie string: nothing is cached.
/// Every write hands exactly one directive to the store.
///
/// # Default vs custom codecs
///
/// [`Cookies::get`], [`Cookies::get_all`] and [`Cookies::set`] use the
/// default percent-encoding codec. Their `_with` counterparts accept a
/// [`Decoding`] or an [`Encoding`] that replaces part or all of it, which is
/// also how non-string values are read and written.
///
/// # Example
///
/// ```rust
/// use crumbs::{Cookies, MemoryStore};
///
/// let mut cookies = Cookies::new(MemoryStore::new());
///
/// let directive = cookies.set("name", "a value; with a semicolon", None);
/// assert!(directive.starts_with("name=a%20value%3B%20with%20a%20semicolon; expires="));
/// assert_eq!(
///     cookies.get("name").as_deref(),
///     Some("a value; with a semicolon")
/// );
///
/// cookies.remove("name", None);
/// assert_eq!(cookies.get("name"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Cookies<S> {
    store: S,
    attributes: Attributes<'static>,
    decoding: Decoding,
}

impl<S: CookieStore> Cookies<S> {
    /// Creates a handle over `store` that writes [`DEFAULT_ATTRIBUTES`] unless
    /// told otherwise.
    pub fn new(store: S) -> Self {
        Cookies {
            store,
            attributes: DEFAULT_ATTRIBUTES.clone(),
            decoding: Decoding::new(),
        }
    }

    /// Replaces the attributes used by writes that don't provide their own.
    ///
    /// ```rust
    /// use crumbs::{Attributes, Cookies, MemoryStore};
    ///
    /// let mut cookies = Cookies::new(MemoryStore::new())
    ///     .with_attributes(Attributes::new().set("path", "/app"));
    /// assert_eq!(cookies.set("c", "v", None), "c=v; path=/app");
    /// ```
    pub fn with_attributes(mut self, attributes: Attributes<'static>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The attributes used by writes that don't provide their own.
    pub fn attributes(&self) -> &Attributes<'static> {
        &self.attributes
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the decoded value of the first readable cookie named `name`.
    ///
    /// Cookies that can't be decoded are skipped; a missing cookie is `None`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.get_with(name, &self.decoding)
    }

    /// Like [`Cookies::get`], decoding with `decoding`.
    ///
    /// ```rust
    /// use crumbs::{CookieStore, Cookies, Decoding, MemoryStore};
    ///
    /// let mut store = MemoryStore::new();
    /// store.write("c[]=v");
    /// let cookies = Cookies::new(store);
    ///
    /// // `[` and `]` are not valid in a cookie name, so the default codec
    /// // would look for `c%5B%5D` instead.
    /// let verbatim = Decoding::new().decode_name(|raw| Ok(raw.to_string()));
    /// assert_eq!(cookies.get_with("c[]", &verbatim).as_deref(), Some("v"));
    /// ```
    pub fn get_with<R>(&self, name: &str, decoding: &Decoding<R>) -> Option<R> {
        jar::find(&self.store.read(), name, decoding)
    }

    /// Returns every readable cookie, keyed by decoded name.
    ///
    /// Cookies that can't be decoded are left out.
    pub fn get_all(&self) -> HashMap<String, String> {
        self.get_all_with(&self.decoding)
    }

    /// Like [`Cookies::get_all`], decoding with `decoding`.
    pub fn get_all_with<R>(&self, decoding: &Decoding<R>) -> HashMap<String, R> {
        jar::scan(&self.store.read(), decoding)
    }

    /// Writes a cookie and returns the directive handed to the store.
    ///
    /// When `attributes` is `None`, the handle's default attributes are used.
    /// Otherwise `attributes` is used as is, without merging in the defaults.
    pub fn set<'v, V>(&mut self, name: &str, value: V, attributes: Option<&Attributes<'_>>) -> String
    where
        V: Into<CookieValue<'v>>,
    {
        let value = value.into();
        let directive = format!(
            "{}={}{}",
            encode_name(name),
            encode_value(&value),
            self.stringify(attributes)
        );
        self.write(name, directive)
    }

    /// Like [`Cookies::set`], encoding with `encoding`.
    ///
    /// Fails, without writing anything, if one of the encoding functions fails.
    ///
    /// ```rust
    /// use crumbs::{Attributes, Cookies, Encoding, MemoryStore};
    ///
    /// let mut cookies = Cookies::new(MemoryStore::new());
    /// let as_hex = Encoding::new().encode_value(|n: &u32, _name| Ok(format!("{n:x}")));
    ///
    /// let directive = cookies.set_with("n", &255, Some(&Attributes::new()), &as_hex).unwrap();
    /// assert_eq!(directive, "n=ff");
    /// ```
    pub fn set_with<W>(
        &mut self,
        name: &str,
        value: &W,
        attributes: Option<&Attributes<'_>>,
        encoding: &Encoding<W>,
    ) -> Result<String, EncodingError> {
        let encoded_name = encoding.name(name).map_err(|e| EncodingError {
            name: name.to_string(),
            source: e,
        })?;
        let encoded_value = encoding.value(value, name).map_err(|e| EncodingError {
            name: name.to_string(),
            source: e,
        })?;
        let directive = format!(
            "{encoded_name}={encoded_value}{}",
            self.stringify(attributes)
        );
        Ok(self.write(name, directive))
    }

    /// Removes a cookie by overwriting it with an empty value that expired
    /// yesterday.
    ///
    /// `attributes` must match the `path` and `domain` the cookie was written
    /// with; `None` uses the handle's default attributes. Whatever `expires`
    /// they carry is overridden.
    pub fn remove(&mut self, name: &str, attributes: Option<&Attributes<'_>>) {
        let mut attributes = attributes.map_or_else(
            || self.attributes.clone(),
            |attributes| attributes.clone().into_owned(),
        );
        attributes.insert("expires", -1);
        self.set(name, "", Some(&attributes));
    }

    fn stringify(&self, attributes: Option<&Attributes<'_>>) -> String {
        match attributes {
            Some(attributes) => attributes.stringify(),
            None => self.attributes.stringify(),
        }
    }

    fn write(&mut self, name: &str, directive: String) -> String {
        tracing::trace!(name, "Writing a cookie");
        self.store.write(&directive);
        directive
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to encode the `{name}` cookie")]
/// An error returned by [`Cookies::set_with`] when an encoding function fails.
pub struct EncodingError {
    name: String,
    #[source]
    source: anyhow::Error,
}

impl EncodingError {
    /// The name of the cookie that couldn't be encoded.
    pub fn name(&self) -> &str {
        &self.name
    }
}
