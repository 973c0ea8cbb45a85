use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AuthError;

const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

lazy_static! {
    // Deliverable addresses only: the service mails verification codes, so
    // the accepted TLD set is pinned.
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.(com|net|in|org)$").unwrap();
    static ref PASSWORD_CHARSET_RE: Regex = Regex::new(r"^[A-Za-z0-9@$!%*#?&]+$").unwrap();
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.len() < 6 || email.len() > 60 {
        return Err(AuthError::Validation(
            "email must be between 6 and 60 characters".into(),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AuthError::Validation("email must be a valid address".into()));
    }
    Ok(())
}

/// At least 8 characters, one letter, one digit, one symbol from
/// `@$!%*#?&`, and nothing outside that alphabet.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let strong = password.len() >= 8
        && PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if !strong {
        return Err(AuthError::Validation(
            "password must be at least 8 characters with a letter, a digit and a symbol".into(),
        ));
    }
    Ok(())
}

pub fn validate_code(code: &str) -> Result<(), AuthError> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::Validation(
            "verification code must be numeric".into(),
        ));
    }
    Ok(())
}
