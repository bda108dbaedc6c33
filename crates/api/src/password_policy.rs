// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for newly registered accounts.

use thiserror::Error;

/// Why a new password was refused. The first failing rule wins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Use at least {min_length} characters")]
    TooShort { min_length: usize },

    /// Classes are uppercase, lowercase, digit and symbol.
    #[error(
        "Mix at least {required} kinds of character (uppercase, lowercase, digit, symbol); this one has {found}"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// `field` is `"email"` or `"name"`.
    #[error("The password cannot be the same as your {field}")]
    MatchesForbiddenField { field: String },

    #[error("The two passwords entered differ")]
    ConfirmationMismatch,
}

/// Rules applied at registration and password change.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    /// How many of the four character classes must appear.
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

impl PasswordPolicy {
    /// Checks `password` against the policy. It must equal `confirmation`
    /// and, ignoring case, differ from the account's `email` and `name`.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = Self::calculate_complexity(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let lowered: String = password.to_lowercase();
        [("email", email), ("name", name)]
            .into_iter()
            .find(|(_, value)| lowered == value.trim().to_lowercase())
            .map_or(Ok(()), |(field, _)| {
                Err(PasswordPolicyError::MatchesForbiddenField {
                    field: field.to_owned(),
                })
            })
    }

    /// Counts the character classes present: uppercase, lowercase, digit
    /// and symbol.
    pub(crate) fn calculate_complexity(password: &str) -> usize {
        let classes: [fn(&char) -> bool; 4] = [
            char::is_ascii_uppercase,
            char::is_ascii_lowercase,
            char::is_ascii_digit,
            |c: &char| !c.is_alphanumeric() && !c.is_whitespace(),
        ];
        classes
            .iter()
            .filter(|class| password.chars().any(|c| class(&c)))
            .count()
    }
}
