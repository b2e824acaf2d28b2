//! Client-side registration checks. Failures here never reach the network.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PasswordIssue {
    #[error("Password must be at least 8 characters long")]
    TooShort,
    #[error("Password must contain at least one letter")]
    MissingLetter,
    #[error("Password must contain at least one digit")]
    MissingDigit,
    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error(transparent)]
    Password(#[from] PasswordIssue),
}

/// Every policy issue with `password`, in display order.
#[must_use]
pub fn password_issues(password: &str) -> Vec<PasswordIssue> {
    let mut issues = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        issues.push(PasswordIssue::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        issues.push(PasswordIssue::MissingLetter);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push(PasswordIssue::MissingDigit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        issues.push(PasswordIssue::MissingSpecial);
    }
    issues
}

/// Registration form input as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// First problem found, checked in the order the form presents them.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::Missing("Username"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::Missing("Email"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        match password_issues(&self.password).first() {
            Some(issue) => Err((*issue).into()),
            None => Ok(()),
        }
    }
}
