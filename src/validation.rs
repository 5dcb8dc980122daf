use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{ValidateEmail, ValidateUrl};

use crate::models::{
    CareerApplication, CareerFormRequest, ContactFormRequest, ContactSubmission, CourseFields,
    CourseUpsertRequest, Credentials, LoginRequest, PriceInput,
};

// Permissive international format: optional country code, separators, parentheses.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$").unwrap()
});

/// `field` names the JSON payload key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn violation(field: &'static str, message: &'static str) -> FieldError {
    FieldError { field, message }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn trimmed_or_absent(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(violation("email", "Email is required"));
    }
    if !email.validate_email() {
        errors.push(violation("email", "Invalid email format"));
    }
}

fn check_phone(phone: &str, errors: &mut Vec<FieldError>) {
    if phone.is_empty() {
        errors.push(violation("phone", "Phone is required"));
    }
    if !PHONE_PATTERN.is_match(phone) {
        errors.push(violation("phone", "Invalid phone number"));
    }
}

/// Runs every rule; an empty required field reports both of its messages.
pub fn validate_contact(req: ContactFormRequest) -> Result<ContactSubmission, Vec<FieldError>> {
    let name = trimmed(req.name);
    let email = trimmed(req.email).to_lowercase();
    let phone = trimmed(req.phone);
    let interest = trimmed_or_absent(req.interest);
    let message = trimmed(req.message);

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(violation("name", "Name is required"));
    }
    if name.chars().count() < 2 || name.chars().count() > 100 {
        errors.push(violation("name", "Name must be between 2 and 100 characters"));
    }
    check_email(&email, &mut errors);
    check_phone(&phone, &mut errors);
    if let Some(interest) = &interest {
        if interest.chars().count() > 200 {
            errors.push(violation("interest", "Interest must be less than 200 characters"));
        }
    }
    if message.is_empty() {
        errors.push(violation("message", "Message is required"));
    }
    if message.chars().count() < 10 || message.chars().count() > 2000 {
        errors.push(violation("message", "Message must be between 10 and 2000 characters"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ContactSubmission {
        name,
        email,
        phone,
        interest,
        message,
    })
}

pub fn validate_career(req: CareerFormRequest) -> Result<CareerApplication, Vec<FieldError>> {
    let full_name = trimmed(req.full_name);
    let email = trimmed(req.email).to_lowercase();
    let phone = trimmed(req.phone);
    let position = trimmed(req.position);
    let resume_link = trimmed_or_absent(req.resume_link);
    let cover_letter = trimmed_or_absent(req.cover_letter);

    let mut errors = Vec::new();
    if full_name.is_empty() {
        errors.push(violation("fullName", "Full name is required"));
    }
    if full_name.chars().count() < 2 || full_name.chars().count() > 100 {
        errors.push(violation(
            "fullName",
            "Full name must be between 2 and 100 characters",
        ));
    }
    check_email(&email, &mut errors);
    check_phone(&phone, &mut errors);
    if position.is_empty() {
        errors.push(violation("position", "Position is required"));
    }
    if position.chars().count() > 200 {
        errors.push(violation("position", "Position must be less than 200 characters"));
    }
    if let Some(link) = &resume_link {
        if !link.validate_url() {
            errors.push(violation("resumeLink", "Invalid URL format"));
        }
    }
    if let Some(cover_letter) = &cover_letter {
        if cover_letter.chars().count() > 5000 {
            errors.push(violation(
                "coverLetter",
                "Cover letter must be less than 5000 characters",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(CareerApplication {
        full_name,
        email,
        phone,
        position,
        resume_link,
        cover_letter,
    })
}

pub fn validate_course(req: CourseUpsertRequest) -> Result<CourseFields, Vec<FieldError>> {
    let title = trimmed(req.title);
    let description = trimmed(req.description);

    let mut errors = Vec::new();
    if title.is_empty() {
        errors.push(violation("title", "Title is required"));
    }
    if title.chars().count() < 3 || title.chars().count() > 255 {
        errors.push(violation("title", "Title must be between 3 and 255 characters"));
    }
    if description.is_empty() {
        errors.push(violation("description", "Description is required"));
    }
    if description.chars().count() < 10 || description.chars().count() > 5000 {
        errors.push(violation(
            "description",
            "Description must be between 10 and 5000 characters",
        ));
    }

    let price = match req.price {
        None => None,
        Some(PriceInput::Number(value)) => {
            if value >= 0.0 {
                Some(value)
            } else {
                errors.push(violation("price", "Price must be a positive number"));
                None
            }
        }
        Some(PriceInput::Text(raw)) => match raw.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(value) if value >= 0.0 => Some(value),
                _ => {
                    errors.push(violation("price", "Price must be a positive number"));
                    None
                }
            },
        },
    };

    let status = match trimmed_or_absent(req.status) {
        None => "visible".to_string(),
        Some(status) => {
            if status != "visible" && status != "hidden" {
                errors.push(violation("status", "Status must be either visible or hidden"));
            }
            status
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(CourseFields {
        title,
        description,
        price,
        status,
    })
}

/// Passwords are checked as sent; only the username is trimmed.
pub fn validate_login(req: LoginRequest) -> Result<Credentials, Vec<FieldError>> {
    let username = trimmed(req.username);
    let password = req.password.unwrap_or_default();

    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push(violation("username", "Username is required"));
    }
    if username.chars().count() < 3 || username.chars().count() > 100 {
        errors.push(violation(
            "username",
            "Username must be between 3 and 100 characters",
        ));
    }
    if password.is_empty() {
        errors.push(violation("password", "Password is required"));
    }
    if password.chars().count() < 3 {
        errors.push(violation("password", "Password must be at least 3 characters"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Credentials { username, password })
}
