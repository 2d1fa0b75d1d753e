//! The host's cookie storage.
//!
//! [`CookieStore`] is the boundary between this crate and whatever owns the
//! cookies: a browser's `document.cookie`, a headless user agent, or the
//! in-memory [`MemoryStore`].
use time::{Duration, OffsetDateTime};

use crate::attributes::parse_http_date;

/// A `document.cookie`-like storage primitive.
///
/// Both operations are synchronous and infallible.
pub trait CookieStore {
    /// Returns every visible cookie as `name=value` pairs joined by `; `.
    fn read(&self) -> String;

    /// Applies a single `name=value; attr=value; flag` directive.
    ///
    /// Directives are merged by name, domain and path: the last one wins.
    fn write(&mut self, directive: &str);
}

impl<S: CookieStore + ?Sized> CookieStore for &mut S {
    fn read(&self) -> String {
        (**self).read()
    }

    fn write(&mut self, directive: &str) {
        (**self).write(directive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    name: String,
    value: String,
    domain: Option<String>,
    path: String,
    expires: Option<OffsetDateTime>,
}

impl StoredCookie {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }

    fn same_identity(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

/// An in-memory [`CookieStore`] that behaves like a browser's cookie jar for a
/// single document.
///
/// It understands the `path`, `domain`, `expires` and `max-age` attributes
/// (case-insensitively) and ignores everything else. Cookies whose expiry is
/// in the past are deleted, and only cookies whose path matches the
/// document's path are visible when reading.
///
/// ```rust
/// use crumbs::{CookieStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.write("a=1; path=/");
/// store.write("b=2; path=/admin");
/// store.write("a=3; path=/");
/// assert_eq!(store.read(), "a=3");
///
/// store.write("a=; expires=Thu, 01 Jan 1970 00:00:00 GMT");
/// assert_eq!(store.read(), "");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    document_path: String,
    cookies: Vec<StoredCookie>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store for a document served at `/`.
    pub fn new() -> Self {
        Self::at_path("/")
    }

    /// Creates an empty store for a document served at `document_path`.
    pub fn at_path<P: Into<String>>(document_path: P) -> Self {
        MemoryStore {
            document_path: document_path.into(),
            cookies: Vec::new(),
        }
    }

    /// The path of the document this store serves cookies to.
    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    /// The number of stored, unexpired cookies, including those not visible
    /// from the document's path.
    pub fn len(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.cookies.iter().filter(|c| !c.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every cookie.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    fn parse(&self, directive: &str, now: OffsetDateTime) -> StoredCookie {
        let mut parts = directive.split(';');
        let pair = parts.next().unwrap_or_default();
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => ("", pair.trim()),
        };

        let mut cookie = StoredCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: None,
            path: default_path(&self.document_path).to_string(),
            expires: None,
        };
        let mut max_age = None;

        for part in parts {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "path" if value.starts_with('/') => cookie.path = value.to_string(),
                "domain" if !value.is_empty() => {
                    let domain = value.strip_prefix('.').unwrap_or(value);
                    cookie.domain = Some(domain.to_ascii_lowercase());
                }
                "expires" => {
                    if let Ok(at) = parse_http_date(value) {
                        cookie.expires = Some(at);
                    }
                }
                "max-age" => {
                    if let Ok(seconds) = value.parse::<i64>() {
                        max_age = Some(seconds);
                    }
                }
                _ => {}
            }
        }

        if let Some(seconds) = max_age {
            let at = if seconds <= 0 {
                OffsetDateTime::UNIX_EPOCH
            } else {
                now.saturating_add(Duration::seconds(seconds))
            };
            cookie.expires = Some(at);
        }
        cookie
    }
}

impl CookieStore for MemoryStore {
    fn read(&self) -> String {
        let now = OffsetDateTime::now_utc();
        let mut visible: Vec<_> = self
            .cookies
            .iter()
            .filter(|c| !c.is_expired(now) && path_matches(&self.document_path, &c.path))
            .collect();
        // Longer paths first, then creation order.
        visible.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        visible
            .iter()
            .map(|c| {
                if c.name.is_empty() {
                    c.value.clone()
                } else {
                    format!("{}={}", c.name, c.value)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&mut self, directive: &str) {
        let now = OffsetDateTime::now_utc();
        let cookie = self.parse(directive, now);
        let existing = self.cookies.iter().position(|c| c.same_identity(&cookie));

        if cookie.is_expired(now) {
            if let Some(index) = existing {
                tracing::trace!(name = %cookie.name, path = %cookie.path, "Deleting an expired cookie");
                self.cookies.remove(index);
            }
            return;
        }
        match existing {
            Some(index) => self.cookies[index] = cookie,
            None => self.cookies.push(cookie),
        }
    }
}

/// https://www.rfc-editor.org/rfc/rfc6265#section-5.1.4
fn default_path(document_path: &str) -> &str {
    if !document_path.starts_with('/') {
        return "/";
    }
    match document_path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &document_path[..i],
    }
}

/// https://www.rfc-editor.org/rfc/rfc6265#section-5.1.4
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}
