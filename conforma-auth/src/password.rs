// Password hashing.

use anyhow::Result;
use bcrypt::{hash, verify};

use conforma_core::bail_error;
use conforma_core::errors::Error;

const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String> {
    hash(password, HASH_COST).map_err(|e| anyhow::anyhow!(e.to_string()))
}

/// Constant "Invalid login" on any mismatch so responses do not leak
/// whether the account exists.
pub fn verify_password(password: &str, password_hash: &str) -> Result<()> {
    let ok = verify(password, password_hash)
        .map_err(|_| Error::not_authenticated("Invalid login").into_anyhow())?;
    if !ok {
        bail_error!(not_authenticated, "Invalid login");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conforma_core::errors::ErrorKind;

    #[test]
    fn roundtrip() {
        let hashed = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hashed).is_ok());
    }

    #[test]
    fn wrong_password_is_not_authenticated() {
        let hashed = hash_password("hunter2").unwrap();
        let err = verify_password("hunter3", &hashed).unwrap_err();
        assert_eq!(Error::normalize(err).kind, ErrorKind::NotAuthenticated);
    }

    #[test]
    fn garbage_hash_is_not_authenticated() {
        let err = verify_password("hunter2", "not-a-hash").unwrap_err();
        assert_eq!(Error::normalize(err).kind, ErrorKind::NotAuthenticated);
    }
}
