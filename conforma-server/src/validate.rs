//! Request payload validation helpers.

use anyhow::Result;
use validator::Validate;

use conforma_core::errors::Error;

/// Run derive-based validation and map failures to the Validation
/// error kind, carrying per-field messages as details.
pub fn check_valid<T: Validate>(value: &T) -> Result<()> {
    value.validate().map_err(|errs| {
        let details = serde_json::to_value(&errs).unwrap_or_default();
        Error::validation("Request validation failed")
            .with_details(details)
            .into_anyhow()
    })
}

/// Tenant slugs: lowercase alphanumeric plus hyphen, no leading or
/// trailing hyphen. Length bounds are checked by the derive.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("acme"));
        assert!(is_valid_slug("acme-co-2"));
        assert!(!is_valid_slug("Acme"));
        assert!(!is_valid_slug("-acme"));
        assert!(!is_valid_slug("acme-"));
        assert!(!is_valid_slug("acme co"));
    }
}
