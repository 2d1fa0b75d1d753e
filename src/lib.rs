//! A crate to read and write cookies through a `document.cookie`-like store.
//!
//! # Overview
//!
//! The host exposes all of its cookies as a single string (`a=1; b=2`) and
//! accepts one `Set-Cookie`-style directive per write. `crumbs` sits on top of
//! that interface.
//!
//! It has support for:
//!
//! - Reading one or all cookies, via [`Cookies::get`] and [`Cookies::get_all`]
//! - Writing and removing cookies, via [`Cookies::set`] and [`Cookies::remove`]
//! - Replacing the default percent-encoding, via [`Decoding`] and [`Encoding`]
//!
//! In particular:
//!
//! - Names and values are percent-encoded with the smallest set of escapes that
//!   keeps them valid under RFC 6265
//! - A malformed cookie never prevents the others from being read
//! - Attribute values are cut at their first `;`, so they can't inject extra
//!   directives
//!
//! # Non-goals
//!
//! `crumbs` doesn't enforce cookie size limits and doesn't parse `Set-Cookie`
//! headers returned by a server.
//!
//! # Quickstart
//!
//! ```rust
//! use crumbs::{Attributes, Cookies, MemoryStore};
//!
//! // `MemoryStore` plays the part of `document.cookie`.
//! let mut cookies = Cookies::new(MemoryStore::new());
//!
//! // Cookies are written with the default attributes (`expires=30` days,
//! // `path=/`) unless you provide your own.
//! cookies.set("name", "a value", None);
//! cookies.set("other", "value", Some(&Attributes::new().set("secure", true)));
//!
//! assert_eq!(cookies.get("name").as_deref(), Some("a value"));
//! assert_eq!(cookies.get_all().len(), 2);
//!
//! // A cookie is removed with the same `path` and `domain` it was written with.
//! cookies.remove("other", Some(&Attributes::new()));
//! assert_eq!(cookies.get("other"), None);
//! ```
//!
//! [`Cookies::get`]: crate::Cookies::get
//! [`Cookies::get_all`]: crate::Cookies::get_all
//! [`Cookies::set`]: crate::Cookies::set
//! [`Cookies::remove`]: crate::Cookies::remove

mod attributes;
mod codec;
pub mod config;
mod cookies;
pub mod encoding;
pub mod jar;
mod same_site;
mod store;
mod value;

pub use crate::same_site::*;
pub use attributes::{Attribute, AttributeValue, Attributes, DEFAULT_ATTRIBUTES};
pub use codec::{Decoding, Encoding};
pub use cookies::Cookies;
pub use store::{CookieStore, MemoryStore};
pub use time;
pub use value::CookieValue;

/// Errors that can occur when using `crumbs`.
pub mod errors {
    pub use crate::cookies::EncodingError;
    pub use crate::encoding::DecodingError;
}
