// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Input validation for account credentials.
//!
//! These rules are shared by direct registration and artist signup requests,
//! and are applied after case-folding.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{PlatformError, Result},
    model::Credentials,
};

const NICKNAME_MIN_LEN: usize = 3;
const NICKNAME_MAX_LEN: usize = 20;
const PASSWORD_MIN_LEN: usize = 8;

/// Characters a password must draw at least one of, and the only
/// non-alphanumerics it may contain.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+([._+-][A-Za-z0-9]+)*@[A-Za-z0-9-]+(\.[A-Za-z]{2,})+$").unwrap()
});

static NICKNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

static PASSWORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9@$!%*?&]+$").unwrap());

pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(PlatformError::validation("email", "must not be empty"));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(PlatformError::validation("email", format!("{email} is not a valid address")));
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<()> {
    let len = nickname.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return Err(PlatformError::validation(
            "nickname",
            format!("must be {NICKNAME_MIN_LEN} to {NICKNAME_MAX_LEN} characters"),
        ));
    }
    if !NICKNAME_REGEX.is_match(nickname) {
        return Err(PlatformError::validation(
            "nickname",
            "may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(PlatformError::validation(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters"),
        ));
    }
    if !PASSWORD_REGEX.is_match(password) {
        return Err(PlatformError::validation(
            "password",
            format!("may only contain letters, digits and {PASSWORD_SPECIALS}"),
        ));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if !(has_lower && has_upper && has_digit && has_special) {
        return Err(PlatformError::validation(
            "password",
            format!("needs a lowercase letter, an uppercase letter, a digit and one of {PASSWORD_SPECIALS}"),
        ));
    }
    Ok(())
}

pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    validate_email(&credentials.email)?;
    validate_nickname(&credentials.nickname)?;
    validate_password(&credentials.password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for email in ["k@x.com", "first.last@mail.co.uk", "a+b@sub-domain.io", "a_b@x.org"] {
            assert!(validate_email(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "k@x", "k@x.c", ".k@x.com", "k..j@x.com", "k@@x.com", "k@x.com.", "k j@x.com"] {
            assert!(validate_email(email).is_err(), "{email}");
        }
    }

    #[test]
    fn nickname_length_and_charset() {
        assert!(validate_nickname("kdot").is_ok());
        assert!(validate_nickname("k_d-0").is_ok());
        assert!(validate_nickname("kd").is_err());
        assert!(validate_nickname("a".repeat(21).as_str()).is_err());
        assert!(validate_nickname("a".repeat(20).as_str()).is_ok());
        assert!(validate_nickname("k.dot").is_err());
    }

    #[test]
    fn password_complexity() {
        assert!(validate_password("Kdot123!").is_ok());
        assert!(validate_password("Kd12!").is_err());
        assert!(validate_password("kdot123!").is_err());
        assert!(validate_password("KDOT123!").is_err());
        assert!(validate_password("Kdotkdot!").is_err());
        assert!(validate_password("Kdot1234").is_err());
        assert!(validate_password("Kdot123!#").is_err());
    }
}
