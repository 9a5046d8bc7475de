//! Field validators used with `#[validate(custom(function = ...))]`

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Ethiopian taxpayer identification numbers are ten digits.
static TIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{10}$").unwrap_or_else(|e| panic!("invalid TIN pattern: {}", e))
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$")
        .unwrap_or_else(|e| panic!("invalid phone pattern: {}", e))
});

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// TIN: exactly ten digits
pub fn validate_tin(value: &str) -> Result<(), ValidationError> {
    if TIN_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(failure("tin", "TIN must be exactly 10 digits"))
    }
}

/// Phone: digits with optional leading `+`, spaces or dashes
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(failure("phone", "phone number is not valid"))
    }
}

/// Rejects empty or whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("blank", "must not be blank"))
    } else {
        Ok(())
    }
}
