use crate::models::{InputKind, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Dot-separated labels of at most 63 characters, no leading/trailing hyphen
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid domain regex")
});

/// Email address check on already-trimmed input
pub fn is_email(input: &str) -> bool {
    EMAIL_PATTERN.is_match(input)
}

/// Domain grammar check.
///
/// A bare label such as `localhost` matches too; [`classify`] additionally
/// requires a dot.
pub fn is_domain(input: &str) -> bool {
    DOMAIN_PATTERN.is_match(input)
}

/// Classify raw input. Total: anything that is neither an email nor a dotted
/// domain is natural language.
pub fn classify(input: &str) -> InputKind {
    let trimmed = input.trim();

    if is_email(trimmed) {
        return InputKind::Email;
    }

    if is_domain(trimmed) && trimmed.contains('.') {
        return InputKind::Domain;
    }

    InputKind::NaturalLanguage
}

/// Validation report for the direct endpoint; input is trimmed and lowercased
pub fn validate(input: &str) -> ValidationResult {
    let normalized = input.trim().to_lowercase();
    let is_email = is_email(&normalized);
    let is_domain = is_domain(&normalized);

    let kind = if is_email {
        "email"
    } else if is_domain {
        "domain"
    } else {
        "invalid"
    };

    ValidationResult {
        input_data: normalized,
        is_email,
        is_domain,
        is_valid: is_email || is_domain,
        kind: kind.to_string(),
    }
}
