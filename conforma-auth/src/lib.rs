//! conforma-auth: session tokens and password hashing.

pub mod password;
pub mod tokens;

pub use password::{hash_password, verify_password};
pub use tokens::{Claims, SessionTokens};

/// Pull a bearer token out of an `Authorization` style header value.
///
/// Accepts `Bearer <token>` / `JWT <token>` (case-insensitive scheme)
/// or a bare token.
pub fn bearer_token(header_value: &str) -> Option<String> {
    let hv = header_value.trim();
    if hv.is_empty() {
        return None;
    }

    if let Some((scheme, token)) = hv.split_once(' ') {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        let allowed = ["Bearer", "JWT"]
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme.trim()));
        return allowed.then(|| token.to_string());
    }

    // No scheme, treat the whole header as the token.
    Some(hv.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bearer_and_jwt_schemes() {
        assert_eq!(bearer_token("Bearer abc").as_deref(), Some("abc"));
        assert_eq!(bearer_token("bearer abc").as_deref(), Some("abc"));
        assert_eq!(bearer_token("JWT abc").as_deref(), Some("abc"));
        assert_eq!(bearer_token("abc").as_deref(), Some("abc"));
    }

    #[test]
    fn rejects_unknown_schemes_and_empty_tokens() {
        assert!(bearer_token("Basic abc").is_none());
        assert!(bearer_token("Bearer ").is_none());
        assert!(bearer_token("   ").is_none());
    }
}
