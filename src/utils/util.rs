use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmailError {
    #[error("mail: no address")]
    Empty,
    #[error("mail: invalid address {0}")]
    Malformed(String),
    #[error("Email cannot contain '")]
    Quote,
}

/// Reads `n` random bytes and returns them URL-safe base64 encoded.
pub fn random_base64(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
            .expect("email pattern compiles")
    })
}

pub fn validate_email(email: &str) -> Result<(), EmailError> {
    if email.is_empty() {
        return Err(EmailError::Empty);
    }
    if !email_pattern().is_match(email) {
        return Err(EmailError::Malformed(email.to_string()));
    }
    // Quotes are legal in addresses but never accepted here.
    if email.contains('\'') {
        return Err(EmailError::Quote);
    }
    Ok(())
}
