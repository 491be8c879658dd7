use chrono::NaiveDate;

use super::{require, ValidationError};
use crate::domain::User;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Shared registration checks, in order: names, email format, password length, and
/// finally email uniqueness across every role. `email` is expected to be normalized.
pub fn ensure_registrable(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
    existing: Option<&User>,
) -> Result<(), ValidationError> {
    require(first_name, "firstName")?;
    require(last_name, "lastName")?;
    require(email, "email")?;
    ensure_email_format(email)?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if existing.is_some() {
        return Err(ValidationError::DuplicateEmail(email.to_string()));
    }
    Ok(())
}

/// `YYYY-MM-DD`; a blank value counts as missing.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    require(raw, "dateOfBirth")?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field: "dateOfBirth",
    })
}

fn ensure_email_format(email: &str) -> Result<(), ValidationError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}
