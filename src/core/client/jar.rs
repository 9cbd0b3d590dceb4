//! Cookie store shared by the passport login and every ISS request.
//!
//! reqwest's built-in jar does not expose expiry, so the client plugs in its own
//! `CookieStore` that keeps `Expires`/`Max-Age` next to each cookie.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use std::sync::{Arc, PoisonError, RwLock};
use url::Url;

use crate::core::Clock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredCookie {
    pub(crate) name: String,
    pub(crate) value: String,
    domain: String,
    host_only: bool,
    path: String,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host_ok = if self.host_only {
            host == self.domain
        } else {
            domain_match(&host, &self.domain)
        };
        host_ok && path_match(url.path(), &self.path)
    }

    fn same_slot(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

fn domain_match(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// RFC 6265 path-match: the cookie path must end at a `/` boundary of the request path.
fn path_match(request: &str, cookie: &str) -> bool {
    request.strip_prefix(cookie).is_some_and(|rest| {
        rest.is_empty() || cookie.ends_with('/') || rest.starts_with('/')
    })
}

/// HTTP dates as seen in `Expires`: RFC 1123 plus the older dashed variants.
fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    [
        "%a, %d-%b-%Y %H:%M:%S GMT",
        "%a, %d %b %Y %H:%M:%S GMT",
        "%A, %d-%b-%y %H:%M:%S GMT",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .map(|n| n.and_utc())
}

/// Parses one `Set-Cookie` header value received from `url` at `now`.
pub(crate) fn parse_set_cookie(raw: &str, url: &Url, now: DateTime<Utc>) -> Option<StoredCookie> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();

    let mut cookie = StoredCookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: host.clone(),
        host_only: true,
        path: "/".to_string(),
        expires_at: None,
    };
    let mut max_age: Option<i64> = None;
    let mut expires: Option<DateTime<Utc>> = None;

    for attr in parts {
        let (key, val) = match attr.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (attr.trim(), ""),
        };
        match key.to_ascii_lowercase().as_str() {
            "max-age" => max_age = val.parse().ok(),
            "expires" => expires = parse_http_date(val),
            "domain" => {
                let domain = val.trim_start_matches('.').to_ascii_lowercase();
                // a host may only widen a cookie to one of its parent domains
                if !domain.is_empty() && domain_match(&host, &domain) {
                    cookie.domain = domain;
                    cookie.host_only = false;
                }
            }
            "path" if val.starts_with('/') => cookie.path = val.to_string(),
            _ => {}
        }
    }

    // Max-Age wins over Expires
    cookie.expires_at = match max_age {
        Some(secs) => TimeDelta::try_seconds(secs.max(0)).and_then(|d| now.checked_add_signed(d)),
        None => expires,
    };
    Some(cookie)
}

#[derive(Debug)]
pub(crate) struct SessionJar {
    cookies: RwLock<Vec<StoredCookie>>,
    clock: Arc<dyn Clock>,
}

impl SessionJar {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            cookies: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Inserts or replaces a cookie. A cookie that is already expired deletes its slot.
    pub(crate) fn store(&self, cookie: StoredCookie) {
        let now = self.clock.now();
        let mut guard = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|c| !c.same_slot(&cookie));
        if !cookie.is_expired_at(now) {
            guard.push(cookie);
        }
    }

    /// Latest stored cookie with the given name, expired or not.
    pub(crate) fn get(&self, name: &str) -> Option<StoredCookie> {
        let guard = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        guard.iter().rev().find(|c| c.name == name).cloned()
    }

    pub(crate) fn remove(&self, name: &str) {
        let mut guard = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|c| c.name != name);
    }

    fn header_for(&self, url: &Url) -> Option<HeaderValue> {
        let now = self.clock.now();
        let guard = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        let pairs: Vec<String> = guard
            .iter()
            .filter(|c| !c.is_expired_at(now) && c.matches(url))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        if pairs.is_empty() {
            return None;
        }
        HeaderValue::from_str(&pairs.join("; ")).ok()
    }
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let now = self.clock.now();
        for header in cookie_headers {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            if let Some(cookie) = parse_set_cookie(raw, url, now) {
                self.store(cookie);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.header_for(url)
    }
}
