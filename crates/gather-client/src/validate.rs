//! Pre-submit form validation. Everything here runs before any network
//! call; a failing rule blocks submission entirely.

use gather_types::api::RegisterRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Raw registration form state, exactly as typed.
#[derive(Debug, Default, Clone)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Run every rule in the order the form reports them; the first
    /// failure blocks submission. On success the request body carries the
    /// cleaned values: trimmed names, lowercased email, digits-only phone.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        let email = self.email.trim().to_lowercase();
        if !email_looks_valid(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        let phone_digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        if phone_digits.len() < 10 {
            return Err(ValidationError::InvalidPhone);
        }

        if self.password.len() < 6 {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            phone: phone_digits,
            password: self.password.clone(),
        })
    }
}

/// Same bar the form set: something before `@`, and a dot with something
/// on both sides after it. Real validation is the backend's job.
fn email_looks_valid(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}
