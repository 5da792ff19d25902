use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{ApiError, FieldErrors},
    model::{AttendanceCreate, EmployeeCreate},
};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

const MAX_EMPLOYEE_ID_LEN: usize = 50;
const MAX_TEXT_LEN: usize = 100;

/// Checks run on a create payload before it is sent.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

impl Validate for EmployeeCreate {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        required(&mut errors, "employee_id", "Employee ID", &self.employee_id, MAX_EMPLOYEE_ID_LEN);
        required(&mut errors, "full_name", "Full name", &self.full_name, MAX_TEXT_LEN);
        required(&mut errors, "department", "Department", &self.department, MAX_TEXT_LEN);

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Email is required".to_string());
        } else if !EMAIL_PATTERN.is_match(email) {
            errors.insert("email", "Invalid email format".to_string());
        }

        finish(errors)
    }
}

impl Validate for AttendanceCreate {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "employee_id", "Employee ID", &self.employee_id, MAX_EMPLOYEE_ID_LEN);
        finish(errors)
    }
}

fn required(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str, max_len: usize) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if value.chars().count() > max_len {
        errors.insert(field, format!("{label} must be at most {max_len} characters"));
    }
}

fn finish(errors: FieldErrors) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(errors))
    }
}
