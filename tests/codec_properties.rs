//! Property-based tests for the default cookie codec

use crumbs::encoding::{decode_name, decode_value, encode_name, encode_value};
use crumbs::{Attributes, CookieValue, Cookies, MemoryStore};
use proptest::prelude::*;

const NAME_ESCAPED: &str = " \"(),/:;<=>?@[\\]{}%";
const VALUE_ESCAPED: &str = " \",;\\%";

/// Printable ASCII, i.e. everything but control characters.
fn printable_ascii() -> impl Strategy<Value = char> {
    (0x20u8..0x7f).prop_map(char::from)
}

proptest! {
    #[test]
    fn value_roundtrip_property(value in any::<String>()) {
        let encoded = encode_value(&CookieValue::from(value.as_str()));
        prop_assert_eq!(decode_value(&encoded).unwrap(), value);
    }

    #[test]
    fn name_roundtrip_property(name in any::<String>()) {
        let encoded = encode_name(&name);
        prop_assert_eq!(decode_name(&encoded).unwrap(), name);
    }

    #[test]
    fn encoded_names_and_values_never_contain_delimiters(text in any::<String>()) {
        let name = encode_name(&text);
        prop_assert!(!name.contains(['=', ';', ' ', ',']));
        let value = encode_value(&CookieValue::from(text.as_str()));
        prop_assert!(!value.contains([';', ' ', ',', '"']));
    }

    #[test]
    fn allowed_ascii_is_kept_as_is(c in printable_ascii()) {
        let text = c.to_string();
        let name = encode_name(&text);
        if NAME_ESCAPED.contains(c) {
            prop_assert_eq!(name.len(), 3);
        } else {
            prop_assert_eq!(name, text.clone());
        }
        let value = encode_value(&CookieValue::from(text.as_str()));
        if VALUE_ESCAPED.contains(c) {
            prop_assert_eq!(value.len(), 3);
        } else {
            prop_assert_eq!(value, text);
        }
    }

    #[test]
    fn non_ascii_is_always_escaped(c in any::<char>().prop_filter("non-ASCII", |c| !c.is_ascii())) {
        let text = c.to_string();
        prop_assert_eq!(encode_name(&text).len(), 3 * c.len_utf8());
        prop_assert_eq!(encode_value(&CookieValue::from(text.as_str())).len(), 3 * c.len_utf8());
    }

    #[test]
    fn written_cookies_read_back_property(name in ".+", value in any::<String>()) {
        let mut cookies = Cookies::new(MemoryStore::new());
        cookies.set(&name, value.as_str(), Some(&Attributes::new()));
        prop_assert_eq!(cookies.get(&name), Some(value));
    }
}
