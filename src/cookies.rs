use indexmap::IndexMap;

/// Cookies extracted from a captured request, in capture order.
///
/// Only the header-string format (`key=val; key2=val2`) exists in a
/// captured curl command, so that is the only format parsed here.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: IndexMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` header value: `key=val; key2=val2`.
    ///
    /// A fragment without `=` is kept with an empty value rather than
    /// dropped, matching what the forum actually sets for flag-style
    /// cookies.
    pub fn parse_header_string(input: &str) -> Self {
        let mut jar = Self::new();

        let cookie_str = input.trim();
        let cookie_str = if cookie_str.to_lowercase().starts_with("cookie:") {
            cookie_str[7..].trim()
        } else {
            cookie_str
        };

        for pair in cookie_str.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            match pair.find('=') {
                Some(idx) => {
                    let name = pair[..idx].trim().to_string();
                    let value = pair[idx + 1..].trim().to_string();
                    if !name.is_empty() {
                        jar.insert(name, value);
                    }
                }
                None => {
                    jar.insert(pair.to_string(), String::new());
                }
            }
        }

        jar
    }

    /// Render back into a `Cookie` header value.
    pub fn to_header_string(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: String, value: String) {
        self.cookies.insert(name, value);
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_string_format() {
        let jar = CookieJar::parse_header_string("session=abc123; token=xyz789");
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("session"), Some("abc123"));
        assert_eq!(jar.get("token"), Some("xyz789"));
    }

    #[test]
    fn test_parse_header_string_with_cookie_prefix() {
        let jar = CookieJar::parse_header_string("Cookie: session=abc123; token=xyz789");
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("session"), Some("abc123"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let jar = CookieJar::parse_header_string("  k1 = v1 ;  k2=v2  ");
        assert_eq!(jar.get("k1"), Some("v1"));
        assert_eq!(jar.get("k2"), Some("v2"));
    }

    #[test]
    fn test_fragment_without_equals_kept_with_empty_value() {
        let jar = CookieJar::parse_header_string("flag; a=b");
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("flag"), Some(""));
        assert_eq!(jar.get("a"), Some("b"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let jar = CookieJar::parse_header_string("token=a=b=c");
        assert_eq!(jar.get("token"), Some("a=b=c"));
    }

    #[test]
    fn test_to_header_string_preserves_order() {
        let jar = CookieJar::parse_header_string("b=2; a=1");
        assert_eq!(jar.to_header_string(), "b=2; a=1");
    }

    #[test]
    fn test_empty_input() {
        let jar = CookieJar::parse_header_string("");
        assert!(jar.is_empty());

        let jar = CookieJar::parse_header_string("   ");
        assert!(jar.is_empty());
    }
}
