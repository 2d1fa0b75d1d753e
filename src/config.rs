//! Configuration for the default attributes of a [`Cookies`] handle.
//!
//! Check out the [`Config`] struct for more information.
//!
//! [`Cookies`]: crate::Cookies
use crate::{Attributes, SameSite};

/// `Config` specifies the attributes applied to every cookie written without
/// explicit attributes.
///
/// The default configuration matches [`DEFAULT_ATTRIBUTES`]: cookies expire
/// after 30 days and are visible on every path.
///
/// ```rust
/// use crumbs::config::Config;
/// use crumbs::{Cookies, MemoryStore, SameSite};
///
/// let mut config = Config::default();
/// config.secure = true;
/// config.same_site = Some(SameSite::Lax);
///
/// let mut cookies = Cookies::new(MemoryStore::new()).with_attributes(config.into());
/// let directive = cookies.set("c", "v", None);
/// assert!(directive.ends_with("; path=/; secure; sameSite=Lax"));
/// ```
///
/// [`DEFAULT_ATTRIBUTES`]: crate::DEFAULT_ATTRIBUTES
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The number of days after which cookies expire.
    ///
    /// `None` produces session cookies. By default, this field is `Some(30.0)`.
    pub expires: Option<f64>,
    /// The `path` attribute. By default, this field is `Some("/")`.
    pub path: Option<String>,
    /// The `domain` attribute. By default, this field is `None`.
    pub domain: Option<String>,
    /// Whether cookies are marked `secure`. By default, this field is `false`.
    pub secure: bool,
    /// The `sameSite` attribute. By default, this field is `None`.
    pub same_site: Option<SameSite>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            expires: Some(30.0),
            path: Some("/".to_string()),
            domain: None,
            secure: false,
            same_site: None,
        }
    }
}

impl From<Config> for Attributes<'static> {
    fn from(config: Config) -> Self {
        Attributes::new()
            .set("expires", config.expires)
            .set("path", config.path)
            .set("domain", config.domain)
            .set("secure", config.secure)
            .set("sameSite", config.same_site)
    }
}
