// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates that a person's name is present and of sensible length.
///
/// # Arguments
///
/// * `field` - Field label used in the error message
/// * `name` - The value to check
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is blank or longer than
/// 100 characters.
pub fn validate_person_name(field: &str, name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > 100 {
        return Err(DomainError::InvalidName(format!(
            "{field} must be at most 100 characters"
        )));
    }
    Ok(())
}

/// Validates the shape of an email address.
///
/// This is a structural check only: one `@`, a non-empty local part and a
/// dotted domain without whitespace.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must not contain whitespace",
        )));
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is missing '@'"
        )));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is not a valid address"
        )));
    }
    let has_dotted_domain: bool = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !has_dotted_domain {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' has an invalid domain"
        )));
    }
    Ok(())
}

/// Validates a 10-digit phone number.
///
/// # Errors
///
/// Returns `DomainError::InvalidPhone` if the value is not exactly 10 ASCII digits.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    if !is_digits(phone.trim(), 10) {
        return Err(DomainError::InvalidPhone(String::from(
            "Phone number must be exactly 10 digits",
        )));
    }
    Ok(())
}

/// Validates a 12-digit Aadhaar number.
///
/// # Errors
///
/// Returns `DomainError::InvalidAadhaar` if the value is not exactly 12 ASCII digits.
pub fn validate_aadhaar(aadhaar: &str) -> Result<(), DomainError> {
    if !is_digits(aadhaar.trim(), 12) {
        return Err(DomainError::InvalidAadhaar(String::from(
            "Aadhaar number must be exactly 12 digits",
        )));
    }
    Ok(())
}

/// Validates a PAN of the form `ABCDE1234F`.
///
/// Callers should upper-case the value before storing it; this check is
/// case-insensitive.
///
/// # Errors
///
/// Returns `DomainError::InvalidPan` if the layout does not match.
pub fn validate_pan(pan: &str) -> Result<(), DomainError> {
    let upper: String = pan.trim().to_ascii_uppercase();
    let bytes: &[u8] = upper.as_bytes();
    let valid: bool = bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase();
    if !valid {
        return Err(DomainError::InvalidPan(String::from(
            "PAN must be 5 letters, 4 digits and 1 letter (e.g. ABCDE1234F)",
        )));
    }
    Ok(())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
