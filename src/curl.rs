//! Captured-request parser.
//!
//! The forum credentials arrive as a raw curl command copied out of the
//! browser's network inspector. Only two things in it matter: the `-H`
//! header declarations and the `-b` cookie string.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;
use wreq::header::{HeaderMap, HeaderName, HeaderValue, HOST, USER_AGENT};

use crate::cookies::CookieJar;
use crate::error::{AcresbotError, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; acresbot/0.1)";

lazy_static! {
    static ref HEADER_RE: Regex =
        Regex::new(r#"(?:-H|--header)\s+(?:'([^']*)'|"([^"]*)")"#).expect("header regex");
    static ref COOKIE_RE: Regex =
        Regex::new(r#"(?:-b|--cookie)\s+(?:'([^']*)'|"([^"]*)")"#).expect("cookie regex");
}

/// Parse a captured curl command into a header map and cookie jar.
///
/// Header extraction runs two strategies with fixed precedence: a
/// quote-aware tokenizer first, then a regex sweep over the same raw
/// string when the tokenizer cannot make sense of the quoting. Cookie
/// extraction is always a single regex match; a command without `-b`
/// yields an empty jar.
pub fn parse_descriptor(raw: &str, default_host: &str) -> Result<(HeaderMap, CookieJar)> {
    // Captured commands usually span multiple lines joined with `\`.
    let normalized = raw.replace('\\', " ");

    let pairs = match shell_tokens(&normalized) {
        Ok(tokens) => headers_from_tokens(&tokens),
        Err(err) => {
            warn!(%err, "tokenizer failed, falling back to regex header extraction");
            headers_from_regex(&normalized)
        }
    };

    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        if name.eq_ignore_ascii_case("cookie") {
            continue;
        }
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| AcresbotError::Parse(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(&value)
            .map_err(|_| AcresbotError::Parse(format!("invalid value for header {}", name)))?;
        headers.insert(name, value);
    }

    if !headers.contains_key(HOST) {
        headers.insert(
            HOST,
            HeaderValue::from_str(default_host)
                .map_err(|_| AcresbotError::Parse(format!("invalid host: {}", default_host)))?,
        );
    }
    if !headers.contains_key(USER_AGENT) {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }

    Ok((headers, extract_cookies(&normalized)))
}

/// Split a command line into tokens, honoring single and double quotes.
fn shell_tokens(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(AcresbotError::Parse(
            "unterminated quote in captured request".to_string(),
        ));
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

fn headers_from_tokens(tokens: &[String]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut iter = tokens.iter();
    while let Some(tok) = iter.next() {
        if tok == "-H" || tok == "--header" {
            if let Some(decl) = iter.next() {
                if let Some((name, value)) = decl.split_once(':') {
                    out.push((name.trim().to_string(), value.trim().to_string()));
                }
            }
        }
    }
    out
}

fn headers_from_regex(raw: &str) -> Vec<(String, String)> {
    HEADER_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let decl = caps.get(1).or_else(|| caps.get(2))?.as_str();
            let (name, value) = decl.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn extract_cookies(raw: &str) -> CookieJar {
    COOKIE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| CookieJar::parse_header_string(m.as_str()))
        .unwrap_or_default()
}
