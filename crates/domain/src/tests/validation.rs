// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, validate_aadhaar, validate_email, validate_pan, validate_person_name,
    validate_phone,
};

#[test]
fn test_validate_person_name() {
    assert!(validate_person_name("first_name", "Asha").is_ok());
    assert!(matches!(
        validate_person_name("first_name", "   "),
        Err(DomainError::InvalidName(_))
    ));
    assert!(validate_person_name("first_name", &"x".repeat(101)).is_err());
}

#[test]
fn test_validate_email() {
    assert!(validate_email("asha@company.com").is_ok());
    assert!(validate_email("asha.k@mail.example.in").is_ok());
    assert!(validate_email("asha").is_err());
    assert!(validate_email("@company.com").is_err());
    assert!(validate_email("asha@company").is_err());
    assert!(validate_email("asha@@company.com").is_err());
    assert!(validate_email("as ha@company.com").is_err());
}

#[test]
fn test_validate_phone() {
    assert!(validate_phone("9876543210").is_ok());
    assert!(matches!(validate_phone("98765"), Err(DomainError::InvalidPhone(_))));
    assert!(validate_phone("98765432AB").is_err());
}

#[test]
fn test_validate_aadhaar() {
    assert!(validate_aadhaar("123412341234").is_ok());
    assert!(matches!(validate_aadhaar("1234"), Err(DomainError::InvalidAadhaar(_))));
}

#[test]
fn test_validate_pan() {
    assert!(validate_pan("ABCDE1234F").is_ok());
    assert!(validate_pan("abcde1234f").is_ok());
    assert!(matches!(validate_pan("ABCD12345F"), Err(DomainError::InvalidPan(_))));
    assert!(validate_pan("ABCDE1234").is_err());
}
