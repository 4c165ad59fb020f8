//! Client-side form validation.
//!
//! Each form holds the raw field text as typed and validates into the wire
//! payload, or every field error found. Nothing here touches the network.

use crate::types::{
    FiduciarySignup, ForgotPasswordRequest, GuardianDetails, LoginRequest, OrganizationOnboarding, PasswordChange,
    ProfileOnboarding, ProfileUpdate, ResetPasswordRequest, UserSignup,
};

pub const MIN_PASSWORD_LEN: usize = 8;
/// Individuals younger than this must name a guardian at signup.
pub const ADULT_AGE: u32 = 18;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Form field name as rendered (camelCase, matching the payload).
    pub field: &'static str,
    pub message: &'static str,
}

/// First error reported for `field`.
pub fn error_for(errors: &[FieldError], field: &str) -> Option<&'static str> {
    errors.iter().find(|e| e.field == field).map(|e| e.message)
}

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn require(&mut self, field: &'static str, value: &str, message: &'static str) {
        self.min_len(field, value, 1, message);
    }

    fn min_len(&mut self, field: &'static str, value: &str, min: usize, message: &'static str) {
        if value.trim().chars().count() < min {
            self.fail(field, message);
        }
    }

    fn email(&mut self, field: &'static str, value: &str, message: &'static str) {
        if !is_valid_email(value) {
            self.fail(field, message);
        }
    }

    fn optional_email(&mut self, field: &'static str, value: &str, message: &'static str) {
        if !value.trim().is_empty() {
            self.email(field, value, message);
        }
    }

    fn password(&mut self, field: &'static str, value: &str) {
        if value.chars().count() < MIN_PASSWORD_LEN {
            self.fail(field, "Password must be at least 8 characters");
        }
    }

    fn confirmation(&mut self, password: &str, confirm: &str) {
        if password != confirm {
            self.fail("confirmPassword", "Passwords don't match");
        }
    }

    fn age(&mut self, field: &'static str, value: &str, max: u32) -> Option<u32> {
        let Ok(age) = value.trim().parse::<u32>() else {
            self.fail(field, "Age is required");
            return None;
        };
        if age < 1 {
            self.fail(field, "Age is required");
            return None;
        }
        if age > max {
            self.fail(field, "Invalid age");
            return None;
        }
        Some(age)
    }

    fn finish<T>(self, payload: impl FnOnce() -> T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() { Ok(payload()) } else { Err(self.errors) }
    }
}

/// `local@domain.tld` with no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Absolute `http`/`https` URL with a host.
pub fn is_web_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()))
}

fn trimmed(value: &str) -> String {
    value.trim().to_owned()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

// =============================================================
// Auth forms
// =============================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, Vec<FieldError>> {
        let mut check = Checker::default();
        check.email("email", &self.email, "Please enter a valid email address");
        check.password("password", &self.password);
        check.finish(|| LoginRequest { email: trimmed(&self.email), password: self.password.clone() })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserSignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub password: String,
    pub confirm_password: String,
    pub guardian_name: String,
    pub guardian_email: String,
    pub relationship: String,
}

impl UserSignupForm {
    /// Whether the entered age requires the guardian step.
    pub fn is_minor(&self) -> bool {
        self.age.trim().parse::<u32>().is_ok_and(|age| (1..ADULT_AGE).contains(&age))
    }

    pub fn validate(&self) -> Result<UserSignup, Vec<FieldError>> {
        let mut check = Checker::default();
        check.require("firstName", &self.first_name, "First name is required");
        check.require("lastName", &self.last_name, "Last name is required");
        check.email("email", &self.email, "Please enter a valid email address");
        let age = check.age("age", &self.age, 150);
        check.password("password", &self.password);
        check.confirmation(&self.password, &self.confirm_password);

        let minor = age.is_some_and(|a| a < ADULT_AGE);
        if minor {
            check.require("guardianName", &self.guardian_name, "Guardian name is required");
            check.email("guardianEmail", &self.guardian_email, "Please enter a valid email address");
            check.require("relationship", &self.relationship, "Relationship is required");
        }

        check.finish(|| UserSignup {
            first_name: trimmed(&self.first_name),
            last_name: trimmed(&self.last_name),
            email: trimmed(&self.email),
            phone: optional(&self.phone),
            age: age.unwrap_or_default(),
            password: self.password.clone(),
            guardian: minor.then(|| GuardianDetails {
                guardian_name: trimmed(&self.guardian_name),
                guardian_email: trimmed(&self.guardian_email),
                relationship: trimmed(&self.relationship),
            }),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiduciarySignupForm {
    pub organization_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl FiduciarySignupForm {
    pub fn validate(&self) -> Result<FiduciarySignup, Vec<FieldError>> {
        let mut check = Checker::default();
        check.min_len("organizationName", &self.organization_name, 2, "Organization name is required");
        check.require("name", &self.name, "Name is required");
        check.email("email", &self.email, "Please enter a valid email address");
        check.password("password", &self.password);
        check.confirmation(&self.password, &self.confirm_password);
        check.finish(|| FiduciarySignup {
            organization_name: trimmed(&self.organization_name),
            name: trimmed(&self.name),
            email: trimmed(&self.email),
            phone: optional(&self.phone),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<ForgotPasswordRequest, Vec<FieldError>> {
        let mut check = Checker::default();
        check.email("email", &self.email, "Please enter a valid email address");
        check.finish(|| ForgotPasswordRequest { email: trimmed(&self.email) })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    /// Reset token from the emailed link.
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<ResetPasswordRequest, Vec<FieldError>> {
        let mut check = Checker::default();
        check.require("token", &self.token, "This password reset link is invalid or has expired");
        check.password("password", &self.password);
        check.confirmation(&self.password, &self.confirm_password);
        check.finish(|| ResetPasswordRequest { token: trimmed(&self.token), password: self.password.clone() })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<PasswordChange, Vec<FieldError>> {
        let mut check = Checker::default();
        if self.current_password.is_empty() {
            check.fail("currentPassword", "Current password is required");
        }
        check.password("newPassword", &self.new_password);
        check.confirmation(&self.new_password, &self.confirm_password);
        check.finish(|| PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

// =============================================================
// Onboarding and profile forms
// =============================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrganizationForm {
    pub organization_name: String,
    pub industry: String,
    pub company_size: String,
    pub tax_id: String,
    pub website: String,
    pub address: String,
    pub country: String,
}

impl OrganizationForm {
    pub fn validate(&self) -> Result<OrganizationOnboarding, Vec<FieldError>> {
        let mut check = Checker::default();
        check.min_len("organizationName", &self.organization_name, 2, "Organization name is required");
        check.require("industry", &self.industry, "Industry is required");
        check.require("companySize", &self.company_size, "Company size is required");
        if !self.website.trim().is_empty() && !is_web_url(&self.website) {
            check.fail("website", "Invalid URL");
        }
        check.min_len("address", &self.address, 5, "Address is required");
        check.require("country", &self.country, "Country is required");
        check.finish(|| OrganizationOnboarding {
            organization_name: trimmed(&self.organization_name),
            industry: trimmed(&self.industry),
            company_size: trimmed(&self.company_size),
            tax_id: optional(&self.tax_id),
            website: optional(&self.website),
            address: trimmed(&self.address),
            country: trimmed(&self.country),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub age: String,
    pub location: String,
    pub guardian_email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileOnboarding, Vec<FieldError>> {
        let mut check = Checker::default();
        let age = check.age("age", &self.age, 120);
        check.min_len("location", &self.location, 2, "Location is required");
        check.optional_email("guardianEmail", &self.guardian_email, "Invalid email");
        check.finish(|| ProfileOnboarding {
            age: age.unwrap_or_default(),
            location: trimmed(&self.location),
            guardian_email: optional(&self.guardian_email),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileEditForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ProfileEditForm {
    pub fn validate(&self) -> Result<ProfileUpdate, Vec<FieldError>> {
        let mut check = Checker::default();
        check.min_len("name", &self.name, 2, "Name must be at least 2 characters");
        check.email("email", &self.email, "Invalid email address");
        check.finish(|| ProfileUpdate {
            name: trimmed(&self.name),
            email: trimmed(&self.email),
            phone: optional(&self.phone),
        })
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
