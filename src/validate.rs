// SPDX-License-Identifier: MIT

//! Client-side form validation: checks that run before any network call.
//!
//! A failing form yields [`AppError::Validation`] with per-field
//! messages; the request is never sent.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, FieldError};

/// Email/password sign-in form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[validate(custom(function = "password_complexity"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(url(message = "Photo must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Run a form's derived checks, converting failures to
/// [`AppError::Validation`].
pub fn check<T: Validate>(form: &T) -> Result<(), AppError> {
    form.validate().map_err(into_app_error)
}

/// Sign-up needs a cross-field check the derive cannot express: the
/// confirmation must match the password.
pub fn check_sign_up(form: &SignUpForm) -> Result<(), AppError> {
    let mut fields = match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect_fields(&errors),
    };

    if form.password != form.confirm_password {
        fields.push(FieldError {
            field: "confirm_password".to_string(),
            message: "Passwords do not match".to_string(),
        });
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// The password reset form has a single required field.
pub fn check_reset_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "Email is required".to_string(),
        }]));
    }
    Ok(())
}

/// Ordered list fields must carry at least one non-empty entry.
pub fn non_empty_entries(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().all(|item| item.trim().is_empty()) {
        return Err(rule_error(
            "non_empty_entries",
            "At least one entry is required",
        ));
    }
    Ok(())
}

/// Password rule: at least 6 characters with at least one uppercase and
/// one lowercase letter.
fn password_complexity(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(rule_error(
            "password_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(rule_error(
            "password_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }

    if password.chars().count() < 6 {
        return Err(rule_error(
            "password_length",
            "Password must be at least 6 characters long",
        ));
    }

    Ok(())
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn into_app_error(errors: ValidationErrors) -> AppError {
    AppError::Validation(collect_fields(&errors))
}

fn collect_fields(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                field: field.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect();

    // field_errors() iterates a map; sort for stable reporting
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}
