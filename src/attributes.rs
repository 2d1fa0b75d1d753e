use std::borrow::Cow;
use std::fmt;

use time::format_description::FormatItem;
use time::macros::{datetime, format_description};
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::value::fmt_number;
use crate::SameSite;

// From http://tools.ietf.org/html/rfc2616#section-3.3.1.
static HTTP_DATE: &[FormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The latest expiry that can be rendered as an HTTP-date.
const MAX_EXPIRY: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

static DEFAULT_ENTRIES: [Attribute<'static>; 2] = [
    Attribute {
        key: Cow::Borrowed("expires"),
        value: AttributeValue::Number(30.0),
    },
    Attribute {
        key: Cow::Borrowed("path"),
        value: AttributeValue::Text(Cow::Borrowed("/")),
    },
];

/// The attributes used when a write doesn't specify any: the cookie expires
/// in 30 days and is visible on every path (`expires=30`, `path=/`).
pub static DEFAULT_ATTRIBUTES: Attributes<'static> = Attributes {
    entries: Cow::Borrowed(&DEFAULT_ENTRIES),
};

/// The value of a cookie attribute.
///
/// The `expires` key gets special treatment: a [`AttributeValue::Number`] is
/// interpreted as a number of days from now, while a
/// [`AttributeValue::DateTime`] is used as is. Both are rendered as HTTP-dates.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    DateTime(OffsetDateTime),
    /// `true` renders the bare key (e.g. `; secure`), `false` omits the attribute.
    Flag(bool),
    /// The attribute is omitted.
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    key: Cow<'a, str>,
    value: AttributeValue<'a>,
}

impl<'a> Attribute<'a> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &AttributeValue<'a> {
        &self.value
    }
}

/// An ordered set of cookie attributes, rendered as the `; key=value` suffix of
/// a cookie directive.
///
/// # Example
///
/// ```rust
/// use crumbs::Attributes;
///
/// let attributes = Attributes::new()
///     .set("path", "/;domain=evil.com")
///     .set("domain", "site.com")
///     .set("secure", true)
///     .set("partitioned", false);
/// assert_eq!(attributes.stringify(), "; path=/; domain=site.com; secure");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes<'a> {
    entries: Cow<'a, [Attribute<'a>]>,
}

impl Default for Attributes<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Attributes<'a> {
    /// Creates an empty attribute set.
    pub const fn new() -> Self {
        Attributes {
            entries: Cow::Borrowed(&[]),
        }
    }

    /// Sets `key` to `value`, returning the modified set.
    ///
    /// An existing key keeps its position, a new one is appended.
    pub fn set<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<AttributeValue<'a>>,
    {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value` in place.
    ///
    /// Returns the previous value, if `key` was already present.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<AttributeValue<'a>>
    where
        K: Into<Cow<'a, str>>,
        V: Into<AttributeValue<'a>>,
    {
        let key = key.into();
        let value = value.into();
        let entries = self.entries.to_mut();
        match entries.iter_mut().find(|a| a.key == key) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                entries.push(Attribute { key, value });
                None
            }
        }
    }

    /// Returns the value associated with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&AttributeValue<'a>> {
        self.entries
            .iter()
            .find(|a| a.key == key)
            .map(|a| &a.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts `self` into a set with a `'static` lifetime.
    pub fn into_owned(self) -> Attributes<'static> {
        let entries = self
            .entries
            .iter()
            .map(|a| Attribute {
                key: Cow::Owned(a.key.clone().into_owned()),
                value: a.value.clone().into_owned(),
            })
            .collect::<Vec<_>>();
        Attributes {
            entries: Cow::Owned(entries),
        }
    }

    /// Renders the attribute directives, using the current time to resolve
    /// an `expires` expressed in days.
    pub fn stringify(&self) -> String {
        self.stringify_at(OffsetDateTime::now_utc())
    }

    /// Renders the attribute directives, resolving an `expires` expressed in
    /// days relative to `now`.
    ///
    /// Attribute values are never percent-encoded. To prevent attribute
    /// injection, each value is cut at its first `;`.
    ///
    /// ```rust
    /// use crumbs::Attributes;
    /// use crumbs::time::macros::datetime;
    ///
    /// let now = datetime!(2015-10-21 07:28:00 UTC);
    /// let attributes = Attributes::new().set("expires", 1).set("path", "/");
    /// assert_eq!(
    ///     attributes.stringify_at(now),
    ///     "; expires=Thu, 22 Oct 2015 07:28:00 GMT; path=/"
    /// );
    /// ```
    pub fn stringify_at(&self, now: OffsetDateTime) -> String {
        let mut directives = String::new();
        for Attribute { key, value } in self.entries.iter() {
            let value = if key == "expires" {
                match value {
                    AttributeValue::Number(days) => match expiry_from_days(now, *days) {
                        Some(at) => AttributeValue::DateTime(at),
                        None => AttributeValue::Absent,
                    },
                    other => other.clone(),
                }
            } else {
                value.clone()
            };

            let text = match value {
                AttributeValue::Absent | AttributeValue::Flag(false) => continue,
                AttributeValue::Flag(true) => {
                    directives.push_str("; ");
                    directives.push_str(key);
                    continue;
                }
                AttributeValue::Text(text) => text,
                AttributeValue::Number(n) => Cow::Owned(DisplayNumber(n).to_string()),
                AttributeValue::DateTime(at) => match http_date(at) {
                    Ok(date) => Cow::Owned(date),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Failed to format a cookie date attribute");
                        continue;
                    }
                },
            };
            let sanitized = text.split(';').next().unwrap_or_default();
            directives.push_str("; ");
            directives.push_str(key);
            directives.push('=');
            directives.push_str(sanitized);
        }
        directives
    }
}

impl<'a> AttributeValue<'a> {
    /// Converts `self` into a value with a `'static` lifetime.
    pub fn into_owned(self) -> AttributeValue<'static> {
        match self {
            AttributeValue::Text(text) => AttributeValue::Text(Cow::Owned(text.into_owned())),
            AttributeValue::Number(n) => AttributeValue::Number(n),
            AttributeValue::DateTime(at) => AttributeValue::DateTime(at),
            AttributeValue::Flag(flag) => AttributeValue::Flag(flag),
            AttributeValue::Absent => AttributeValue::Absent,
        }
    }
}

/// `now + days`, truncated to the millisecond.
///
/// Returns `None` when `days` is NaN. The result is clamped with
/// [`clamp_expiry`].
pub(crate) fn expiry_from_days(now: OffsetDateTime, days: f64) -> Option<OffsetDateTime> {
    if days.is_nan() {
        return None;
    }
    let millis = (days * MILLIS_PER_DAY).trunc();
    // `as` saturates out-of-range floats.
    let offset = Duration::milliseconds(millis as i64);
    let at = now.checked_add(offset).unwrap_or(if days > 0.0 {
        MAX_EXPIRY
    } else {
        OffsetDateTime::UNIX_EPOCH
    });
    Some(clamp_expiry(at))
}

/// Clamps `at` to the range an HTTP-date can express: from the Unix epoch to
/// the end of year 9999.
pub(crate) fn clamp_expiry(at: OffsetDateTime) -> OffsetDateTime {
    at.clamp(OffsetDateTime::UNIX_EPOCH, MAX_EXPIRY)
}

/// Formats `at` as an HTTP-date, e.g. `Wed, 21 Oct 2015 07:28:00 GMT`.
///
/// `at` is clamped with [`clamp_expiry`] first, so the conversion to UTC
/// can't overflow.
pub(crate) fn http_date(at: OffsetDateTime) -> Result<String, time::error::Format> {
    clamp_expiry(at).to_offset(UtcOffset::UTC).format(&HTTP_DATE)
}

/// Parses an HTTP-date produced by [`http_date`].
pub(crate) fn parse_http_date(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(s.trim(), &HTTP_DATE).map(PrimitiveDateTime::assume_utc)
}

struct DisplayNumber(f64);

impl fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_number(self.0, f)
    }
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(value: &'a str) -> Self {
        AttributeValue::Text(value.into())
    }
}

impl From<String> for AttributeValue<'_> {
    fn from(value: String) -> Self {
        AttributeValue::Text(value.into())
    }
}

impl<'a> From<Cow<'a, str>> for AttributeValue<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<f64> for AttributeValue<'_> {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i32> for AttributeValue<'_> {
    fn from(value: i32) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<i64> for AttributeValue<'_> {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<bool> for AttributeValue<'_> {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

impl From<OffsetDateTime> for AttributeValue<'_> {
    fn from(value: OffsetDateTime) -> Self {
        AttributeValue::DateTime(value)
    }
}

impl From<SameSite> for AttributeValue<'_> {
    fn from(value: SameSite) -> Self {
        AttributeValue::Text(Cow::Borrowed(value.as_str()))
    }
}

impl<'a, T: Into<AttributeValue<'a>>> From<Option<T>> for AttributeValue<'a> {
    /// `None` maps to [`AttributeValue::Absent`].
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => AttributeValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use time::macros::{datetime, offset};
    use time::{Date, Duration, OffsetDateTime};

    use super::{expiry_from_days, http_date, parse_http_date, AttributeValue, DEFAULT_ATTRIBUTES};
    use crate::{Attributes, SameSite};

    #[test]
    fn format() {
        let now = datetime!(2015-10-21 07:28:00 UTC);
        let cases = [
            (Attributes::new(), ""),
            (Attributes::new().set("path", "/"), "; path=/"),
            (Attributes::new().set("secure", true), "; secure"),
            (Attributes::new().set("secure", false), ""),
            (Attributes::new().set("path", None::<&str>), ""),
            (Attributes::new().set("arbitrary", "foo"), "; arbitrary=foo"),
            (Attributes::new().set("max-age", 3600), "; max-age=3600"),
            (Attributes::new().set("sameSite", SameSite::Lax), "; sameSite=Lax"),
            (
                Attributes::new().set("expires", 0.5),
                "; expires=Wed, 21 Oct 2015 19:28:00 GMT",
            ),
            (
                Attributes::new().set("expires", datetime!(1970-01-01 0:00 UTC)),
                "; expires=Thu, 01 Jan 1970 00:00:00 GMT",
            ),
            (
                Attributes::new()
                    .set("expires", datetime!(2015-10-21 09:28:00 +2)),
                "; expires=Wed, 21 Oct 2015 07:28:00 GMT",
            ),
        ];
        for (attributes, expected) in cases {
            assert_eq!(attributes.stringify_at(now), expected, "Failed for {attributes:?}");
        }
    }

    #[test]
    fn values_are_truncated_at_the_first_semicolon() {
        let attributes = Attributes::new()
            .set("path", "/;domain=sub.domain.com")
            .set("domain", "site.com;remove_this")
            .set("customAttribute", "value;;remove_this");
        assert_eq!(
            attributes.stringify(),
            "; path=/; domain=site.com; customAttribute=value"
        );
    }

    #[test]
    fn expires_in_days() {
        let now = OffsetDateTime::now_utc();
        let expected = http_date(now + Duration::milliseconds(200 * 86_400_000)).unwrap();
        let attributes = Attributes::new().set("expires", 200);
        assert_eq!(attributes.stringify_at(now), format!("; expires={expected}"));
    }

    #[test]
    fn expires_in_a_fraction_of_a_day() {
        let now = datetime!(2024-02-28 12:00:00.999 UTC);
        let at = expiry_from_days(now, 0.5).unwrap();
        assert_eq!(at, datetime!(2024-02-29 00:00:00.999 UTC));
        let at = expiry_from_days(now, 1.0 / 86_400_000.0 / 2.0).unwrap();
        assert_eq!(at, now);
    }

    #[test]
    fn expires_is_clamped() {
        let now = datetime!(2024-01-01 0:00 UTC);
        assert_eq!(
            expiry_from_days(now, 1e12),
            Some(datetime!(9999-12-31 23:59:59 UTC))
        );
        assert_eq!(expiry_from_days(now, f64::NEG_INFINITY), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(expiry_from_days(now, f64::NAN), None);
        assert_eq!(expiry_from_days(now, -1e6), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(
            Attributes::new().set("expires", -1e6).stringify_at(now),
            "; expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
        assert_eq!(Attributes::new().set("expires", f64::NAN).stringify_at(now), "");
    }

    #[test]
    fn explicit_dates_are_clamped() {
        let cases = [
            (
                datetime!(9999-12-31 23:00 -5),
                "; expires=Fri, 31 Dec 9999 23:59:59 GMT",
            ),
            (
                Date::MIN.midnight().assume_offset(offset!(+5)),
                "; expires=Thu, 01 Jan 1970 00:00:00 GMT",
            ),
            (
                datetime!(1960-06-01 12:00 UTC),
                "; expires=Thu, 01 Jan 1970 00:00:00 GMT",
            ),
        ];
        for (at, expected) in cases {
            let attributes = Attributes::new().set("expires", at);
            assert_eq!(attributes.stringify(), expected, "Failed for {at}");
        }
    }

    #[test]
    fn other_keys_are_not_treated_as_expiry() {
        let now = datetime!(2024-01-01 0:00 UTC);
        let attributes = Attributes::new().set("Expires", 1).set("max-age", 0.5);
        assert_eq!(attributes.stringify_at(now), "; Expires=1; max-age=0.5");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let attributes = Attributes::new()
            .set("path", "/")
            .set("domain", "example.com")
            .set("path", "/sub");
        assert_that!(
            attributes.iter().map(|a| a.key()).collect::<Vec<_>>(),
            elements_are![eq("path"), eq("domain")]
        );
        assert_eq!(
            attributes.get("path"),
            Some(&AttributeValue::Text("/sub".into()))
        );
    }

    #[test]
    fn defaults_are_never_mutated() {
        let mut attributes = DEFAULT_ATTRIBUTES.clone();
        attributes.insert("expires", -1);
        attributes.insert("secure", true);

        assert_eq!(DEFAULT_ATTRIBUTES.len(), 2);
        assert_eq!(DEFAULT_ATTRIBUTES.get("expires"), Some(&AttributeValue::Number(30.0)));
        assert_eq!(attributes.get("expires"), Some(&AttributeValue::Number(-1.0)));
        assert_that!(
            DEFAULT_ATTRIBUTES.stringify(),
            ends_with("; path=/")
        );
    }

    #[test]
    fn http_dates_round_trip() {
        let at = datetime!(2015-10-21 07:28:00 UTC);
        let rendered = http_date(at).unwrap();
        assert_eq!(rendered, "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_http_date(&rendered).unwrap(), at);
    }
}
