//! Client Cookie Jar
//!
//! Holds cookies the backends set on us and supports the logout sweep's
//! expiry protocol: a server may have scoped a cookie to the bare host, the
//! exact hostname, or the registrable parent domain, so removal is attempted
//! once per variant for every cookie name.

use std::sync::Mutex;

/// A stored cookie
///
/// `host` is the request host that received the `Set-Cookie`; `domain` is
/// the explicit `Domain` attribute, if the server sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: String,
    pub host: String,
}

/// Error when parsing a `Set-Cookie` header value
#[derive(Debug, Clone, thiserror::Error)]
pub enum CookieParseError {
    #[error("Missing name=value pair")]
    MissingPair,
    #[error("Empty cookie name")]
    EmptyName,
}

/// Parse a `Set-Cookie` header value into a [`Cookie`]
///
/// Only the attributes the jar acts on (`Domain`, `Path`) are retained.
pub fn parse_set_cookie(raw: &str, request_host: &str) -> Result<Cookie, CookieParseError> {
    let mut parts = raw.split(';');

    let pair = parts.next().ok_or(CookieParseError::MissingPair)?;
    let (name, value) = pair.trim().split_once('=').ok_or(CookieParseError::MissingPair)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CookieParseError::EmptyName);
    }

    let mut domain = None;
    let mut path = "/".to_string();

    for attr in parts {
        let attr = attr.trim();
        let (key, attr_value) = attr.split_once('=').unwrap_or((attr, ""));
        match key.to_ascii_lowercase().as_str() {
            "domain" => {
                let normalized = attr_value.trim().trim_start_matches('.').to_lowercase();
                if !normalized.is_empty() {
                    domain = Some(normalized);
                }
            }
            "path" => {
                if !attr_value.trim().is_empty() {
                    path = attr_value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    Ok(Cookie {
        name: name.to_string(),
        value: value.trim().to_string(),
        domain,
        path,
        host: request_host.to_lowercase(),
    })
}

/// Derive the two-label registrable parent of a hostname
///
/// `app.academy.example` -> `academy.example`; a host with two or fewer
/// labels (or an IP-ish host) has no distinct parent.
pub fn registrable_parent(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > 2 {
        Some(labels[labels.len() - 2..].join("."))
    } else {
        None
    }
}

/// Process-wide cookie jar
#[derive(Default)]
pub struct CookieJar {
    cookies: Mutex<Vec<Cookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `Set-Cookie` header received from `request_host`
    ///
    /// A cookie with the same (name, domain, path) tuple is replaced.
    /// Unparseable values are logged and dropped.
    pub fn store(&self, raw: &str, request_host: &str) {
        match parse_set_cookie(raw, request_host) {
            Ok(cookie) => {
                let mut cookies = self.cookies.lock().unwrap();
                cookies.retain(|c| {
                    !(c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path)
                });
                cookies.push(cookie);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unparseable Set-Cookie");
            }
        }
    }

    /// Build a `Cookie` request header for the given host
    pub fn cookie_header(&self, host: &str) -> Option<String> {
        let host = host.to_lowercase();
        let cookies = self.cookies.lock().unwrap();

        let header: Vec<String> = cookies
            .iter()
            .filter(|c| domain_matches(c, &host))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();

        if header.is_empty() {
            None
        } else {
            Some(header.join("; "))
        }
    }

    /// Distinct cookie names currently stored
    pub fn names(&self) -> Vec<String> {
        let cookies = self.cookies.lock().unwrap();
        let mut names: Vec<String> = cookies.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.cookies.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.lock().unwrap().is_empty()
    }

    /// Expire one (name, domain, path) variant; returns how many were removed
    ///
    /// `domain == None` targets host-only cookies, mirroring a browser's
    /// removal rule for an expiry without a `Domain` attribute.
    pub fn expire(&self, name: &str, domain: Option<&str>, path: &str) -> usize {
        let mut cookies = self.cookies.lock().unwrap();
        let before = cookies.len();
        cookies.retain(|c| {
            !(c.name == name
                && c.path == path
                && match domain {
                    None => c.domain.is_none(),
                    Some(d) => c.domain.as_deref() == Some(d),
                })
        });
        before - cookies.len()
    }

    /// Expire every cookie visible to `host` at `path`
    ///
    /// Three attempts per name (bare, exact hostname, registrable parent)
    /// to cover whatever `Domain` attribute the server originally set.
    pub fn expire_all_for_host(&self, host: &str, path: &str) -> usize {
        let host = host.to_lowercase();
        let mut removed = 0;

        for name in self.names() {
            removed += self.expire(&name, None, path);
            removed += self.expire(&name, Some(&host), path);
            if let Some(parent) = registrable_parent(&host) {
                if parent != host {
                    removed += self.expire(&name, Some(&parent), path);
                }
            }
        }

        removed
    }
}

fn domain_matches(cookie: &Cookie, host: &str) -> bool {
    match &cookie.domain {
        None => cookie.host == host,
        Some(domain) => host == domain || host.ends_with(&format!(".{domain}")),
    }
}
