//! URL query-string helpers
//!
//! Centralizes the handful of query-parameter reads the auth layer needs
//! (`?view=`, `?logout=`, `?token=`/`?invite=`).

/// Get a query parameter by key
///
/// Accepts the query with or without a leading `?`. Values are
/// percent-decoded; `+` decodes to a space.
pub fn param(query: &str, key: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            return Some(decode(v));
        }
    }

    None
}

/// Whether a query parameter is present at all (value may be empty)
pub fn has_param(query: &str, key: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .any(|pair| pair.split_once('=').map_or(pair, |(k, _)| k) == key)
}

fn decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match hex_pair(bytes.get(i + 1).copied(), bytes.get(i + 2).copied()) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: Option<u8>, lo: Option<u8>) -> Option<u8> {
    let hi = (hi? as char).to_digit(16)?;
    let lo = (lo? as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_basic() {
        assert_eq!(param("?view=parent", "view").as_deref(), Some("parent"));
        assert_eq!(param("view=admin&logout=123", "logout").as_deref(), Some("123"));
        assert_eq!(param("?view=parent", "token"), None);
    }

    #[test]
    fn test_param_decoding() {
        assert_eq!(
            param("?email=coach%40academy.example", "email").as_deref(),
            Some("coach@academy.example")
        );
        assert_eq!(param("?name=Ravi+Kumar", "name").as_deref(), Some("Ravi Kumar"));
    }

    #[test]
    fn test_has_param() {
        assert!(has_param("?logout=", "logout"));
        assert!(has_param("?logout", "logout"));
        assert!(!has_param("?view=parent", "logout"));
    }

    #[test]
    fn test_malformed_percent_kept_literal() {
        assert_eq!(param("?x=%zz", "x").as_deref(), Some("%zz"));
        assert_eq!(param("?x=50%", "x").as_deref(), Some("50%"));
    }
}
