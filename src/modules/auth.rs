use hmac::{Hmac, Mac};
use log::warn;
use sha2::{Digest, Sha256};

use crate::errors::{CustomResult, Error};
use crate::modules::config::Config;

type HmacSha256 = Hmac<Sha256>;

/// checks a username/password pair. no token or session is issued on success
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// # a single admin account
/// keeps a mac of the username keyed with the password digest, never the password.
/// a login recomputes the mac from the submitted pair and compares it in constant
/// time, so username and password are checked in one comparison.
pub struct StaticCredentials {
    expected_tag: Vec<u8>,
}

impl StaticCredentials {
    /// ## Arguments
    /// * `username` - the admin username
    /// * `password_sha256` - hex encoded sha256 of the admin password
    pub fn new(username: &str, password_sha256: &str) -> StaticCredentials {
        let expected_tag = match hex::decode(password_sha256) {
            Ok(digest) => StaticCredentials::tag(&digest, username),
            Err(e) => {
                warn!(target:"auth:new", "admin password digest is not valid hex, every login will be rejected. (error: {})", e);
                Vec::new()
            }
        };

        StaticCredentials { expected_tag }
    }

    pub fn from_config(config: &Config) -> StaticCredentials {
        StaticCredentials::new(&config.admin_username, &config.admin_password_sha256)
    }

    fn mac(password_digest: &[u8], username: &str) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(password_digest).ok()?;
        mac.update(username.as_bytes());
        Some(mac)
    }

    fn tag(password_digest: &[u8], username: &str) -> Vec<u8> {
        StaticCredentials::mac(password_digest, username)
            .map(|mac| mac.finalize().into_bytes().to_vec())
            .unwrap_or_default()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        let digest = Sha256::digest(password.as_bytes());

        match StaticCredentials::mac(&digest, username) {
            Some(mac) => mac.verify_slice(&self.expected_tag).is_ok(),
            None => false,
        }
    }
}

/// # log in
/// fails with a validation error when either field is missing and with an auth
/// error when the pair is rejected.
pub fn login(verifier: &dyn CredentialVerifier, username: Option<&str>, password: Option<&str>) -> CustomResult<()> {
    let (username, password) = match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(Error::validation("Username and password are required")),
    };

    if !verifier.verify(username, password) {
        warn!(target:"auth:login", "rejected login for {}", username);
        return Err(Error::AuthError);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::config::hash_password;

    fn verifier() -> StaticCredentials {
        StaticCredentials::new("trainer", &hash_password("hunter2"))
    }

    #[test]
    fn accepts_matching_credentials() {
        assert!(verifier().verify("trainer", "hunter2"));
        assert!(login(&verifier(), Some("trainer"), Some("hunter2")).is_ok());
    }

    #[test]
    fn rejects_wrong_username_or_password() {
        assert!(!verifier().verify("trainer", "hunter3"));
        assert!(!verifier().verify("Trainer", "hunter2"));
        assert!(matches!(
            login(&verifier(), Some("trainer"), Some("nope")),
            Err(Error::AuthError)
        ));
    }

    #[test]
    fn accepts_upper_case_digest() {
        let verifier = StaticCredentials::new("trainer", &hash_password("hunter2").to_uppercase());

        assert!(verifier.verify("trainer", "hunter2"));
    }

    #[test]
    fn malformed_digest_rejects_every_login() {
        let verifier = StaticCredentials::new("trainer", "not-hex");

        assert!(!verifier.verify("trainer", "hunter2"));
        assert!(!verifier.verify("trainer", ""));
    }

    #[test]
    fn missing_fields_are_a_validation_error() {
        assert!(matches!(
            login(&verifier(), Some("trainer"), None),
            Err(Error::ValidationError { .. })
        ));
        assert!(matches!(
            login(&verifier(), Some(""), Some("hunter2")),
            Err(Error::ValidationError { .. })
        ));
    }
}
