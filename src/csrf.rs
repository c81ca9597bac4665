//! Double-submit CSRF token: the same random value travels in an HTTP-only
//! cookie and in a hidden form field, and a post is accepted only when both
//! match.

use axum_extra::extract::cookie::CookieJar;
use cookie::{Cookie, SameSite};

use crate::forms::FieldErrors;

pub const COOKIE: &str = "csrf_token";
pub const FIELD: &str = "csrf_token";

const MISSING: &str = "The CSRF token is missing.";
const MISMATCH: &str = "The CSRF tokens do not match.";

/// Returns the jar's token, minting and storing a new one when absent.
pub fn ensure_token(jar: CookieJar) -> (CookieJar, String) {
    if let Some(token) = token(&jar) {
        return (jar, token);
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    let cookie = Cookie::build((COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(12));
    (jar.add(cookie), token)
}

pub fn token(jar: &CookieJar) -> Option<String> {
    jar.get(COOKIE).map(|c| c.value().to_string()).filter(|v| !v.is_empty())
}

pub fn check(expected: Option<&str>, submitted: &str, errors: &mut FieldErrors) {
    match expected {
        _ if submitted.is_empty() => errors.push(FIELD, MISSING),
        None => errors.push(FIELD, MISSING),
        Some(expected) if expected != submitted => errors.push(FIELD, MISMATCH),
        Some(_) => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE as COOKIE_HEADER};

    use super::*;

    #[test]
    fn mints_token_once() {
        let (jar, first) = ensure_token(CookieJar::new());
        assert_eq!(first.len(), 32);
        let (_, second) = ensure_token(jar);
        assert_eq!(first, second);
    }

    #[test]
    fn reuses_token_from_request() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE_HEADER, HeaderValue::from_static("csrf_token=abc"));
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(token(&jar).as_deref(), Some("abc"));
        assert_eq!(ensure_token(jar).1, "abc");
    }

    #[test]
    fn check_messages() {
        let mut errors = FieldErrors::default();
        check(Some("abc"), "abc", &mut errors);
        assert!(errors.is_empty());

        check(Some("abc"), "", &mut errors);
        check(None, "abc", &mut errors);
        check(Some("abc"), "xyz", &mut errors);
        assert_eq!(errors.for_field(FIELD).collect::<Vec<_>>(), vec![MISSING, MISSING, MISMATCH]);
    }
}
