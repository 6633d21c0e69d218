use chrono::{NaiveDateTime, Timelike, Utc};

use super::error::ValidationError;
use super::requests::{NewUser, UserUpdate};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 5000;

/// Current UTC time truncated to whole seconds, matching `CURRENT_TIMESTAMP`.
pub fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Validates a registration before it is written.
pub fn validate_new_user(user: &NewUser) -> Result<(), ValidationError> {
    validate_account_fields(&user.first_name, &user.last_name, &user.email, &user.password)
}

/// Validates replacement values for an existing user.
pub fn validate_user_update(update: &UserUpdate) -> Result<(), ValidationError> {
    validate_account_fields(
        &update.first_name,
        &update.last_name,
        &update.email,
        &update.password,
    )
}

/// Validates post or comment text.
pub fn validate_content(field: &'static str, content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_CONTENT_LEN,
        });
    }
    Ok(())
}

fn validate_account_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_name("First name", first_name)?;
    validate_name("Last name", last_name)?;
    if email.trim().is_empty() {
        return Err(ValidationError::Empty("Email"));
    }
    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    if password.is_empty() {
        return Err(ValidationError::Empty("Password"));
    }
    Ok(())
}

fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// One `@` with something on both sides and no whitespace.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
