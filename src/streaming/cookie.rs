//! Session personalization cookie.

use std::fmt;

use rand::Rng;

/// Cookie name used by the stream endpoints.
pub const PERSONALIZATION_COOKIE: &str = "personalization_id";

const VALUE_PREFIX: &str = "v1_";
const MARKER: &[u8; 2] = b"3A";
const SUFFIX_LEN: usize = 10;
const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A cookie presented on every request of a stream session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    value: String,
}

impl SessionCookie {
    /// Create a cookie with an explicit name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Generate a fresh `personalization_id` cookie.
    ///
    /// The value is `v1_` followed by ten characters from `[0-9A-Z]`, the
    /// first two of which are always `3A`.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut suffix = Vec::with_capacity(SUFFIX_LEN);
        suffix.extend_from_slice(MARKER);
        while suffix.len() < SUFFIX_LEN {
            suffix.push(CHARSET[rng.gen_range(0..CHARSET.len())]);
        }

        // CHARSET and MARKER are ASCII
        let suffix: String = suffix.into_iter().map(char::from).collect();
        Self::new(PERSONALIZATION_COOKIE, format!("{VALUE_PREFIX}{suffix}"))
    }

    /// Cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The `Cookie` header value, `name=value`.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_cookie_format() {
        for _ in 0..64 {
            let cookie = SessionCookie::generate();
            assert_eq!(cookie.name(), "personalization_id");

            let suffix = cookie
                .value()
                .strip_prefix("v1_")
                .expect("value starts with v1_");
            assert_eq!(suffix.len(), 10);
            assert!(suffix.starts_with("3A"));
            assert!(suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_header_value() {
        let cookie = SessionCookie::new("personalization_id", "v1_3AABCDEFGH");
        assert_eq!(cookie.header_value(), "personalization_id=v1_3AABCDEFGH");
        assert_eq!(cookie.to_string(), cookie.header_value());
    }
}
